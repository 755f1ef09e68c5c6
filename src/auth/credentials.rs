use crate::models::domain::{CredentialRecord, Identity, Role};

const BUILTIN_TEACHER_ID: &str = "vikas sir";
const BUILTIN_TEACHER_PASSWORD: &str = "vikas123";
const BUILTIN_STUDENT_ID: &str = "priyanshu";
const BUILTIN_STUDENT_PASSWORD: &str = "21221079";

/// Fixed list of logins, loaded once at startup. This is not a security
/// boundary: passwords are plaintext and there is no rate limiting.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    records: Vec<CredentialRecord>,
}

impl CredentialStore {
    pub fn new(records: Vec<CredentialRecord>) -> Self {
        Self { records }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_credentials())
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Role must match exactly, the id ignores case, the password does not.
    /// The returned identity carries the id as configured, not as typed.
    pub fn authenticate(&self, role: Role, id: &str, password: &str) -> Option<Identity> {
        let wanted = id.to_lowercase();
        self.records
            .iter()
            .find(|r| r.role == role && r.id.to_lowercase() == wanted && r.password == password)
            .map(|r| Identity::new(r.role, &r.id))
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn builtin_credentials() -> Vec<CredentialRecord> {
    vec![
        CredentialRecord::new(Role::Teacher, BUILTIN_TEACHER_ID, BUILTIN_TEACHER_PASSWORD),
        CredentialRecord::new(Role::Student, BUILTIN_STUDENT_ID, BUILTIN_STUDENT_PASSWORD),
    ]
}

/// Parses `role:id:password` entries separated by `;`. The password is the
/// remainder after the second colon. Malformed entries are skipped.
pub fn parse_credentials(entries: &str) -> Vec<CredentialRecord> {
    entries
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let role = parts.next().and_then(Role::parse);
            let id = parts.next().map(str::trim).filter(|id| !id.is_empty());
            let password = parts.next().filter(|pw| !pw.is_empty());
            match (role, id, password) {
                (Some(role), Some(id), Some(password)) => {
                    Some(CredentialRecord::new(role, id, password))
                }
                _ => {
                    let shown = entry.split(':').take(2).collect::<Vec<_>>().join(":");
                    log::warn!("Skipping malformed credential entry '{}'", shown);
                    None
                }
            }
        })
        .collect()
}
