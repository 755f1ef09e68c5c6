use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// The authenticated user. No identity at all means a guest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub role: Role,
    pub id: String,
}

impl Identity {
    pub fn new(role: Role, id: &str) -> Self {
        Identity {
            role,
            id: id.to_string(),
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

/// Static login entry. The password is compared in plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub role: Role,
    pub id: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn new(role: Role, id: &str, password: &str) -> Self {
        CredentialRecord {
            role,
            id: id.to_string(),
            password: password.to_string(),
        }
    }
}

// Keeps passwords out of logs and panic messages.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("role", &self.role)
            .field("id", &self.id)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_serializes_to_persisted_layout() {
        let identity = Identity::new(Role::Student, "alice");
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(json, r#"{"role":"student","id":"alice"}"#);
    }

    #[test]
    fn role_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<Role>("\"admin\"");
        assert!(parsed.is_err());
        assert_eq!(Role::parse(" Teacher "), Some(Role::Teacher));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn credential_debug_hides_password() {
        let record = CredentialRecord::new(Role::Teacher, "vikas sir", "vikas123");
        let debug = format!("{:?}", record);
        assert!(debug.contains("vikas sir"));
        assert!(!debug.contains("vikas123"));
    }
}
