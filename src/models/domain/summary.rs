use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Summary {
    #[serde(rename = "summary")]
    pub main_text: String,
    #[serde(
        rename = "sectionSummaries",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub section_text: Option<String>,
}

impl Summary {
    pub fn new(main_text: &str) -> Self {
        Summary {
            main_text: main_text.to_string(),
            section_text: None,
        }
    }

    pub fn with_sections(mut self, section_text: &str) -> Self {
        self.section_text = Some(section_text.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_text_is_optional_on_the_wire() {
        let json = serde_json::to_string(&Summary::new("Main")).unwrap();
        assert_eq!(json, r#"{"summary":"Main"}"#);

        let parsed: Summary =
            serde_json::from_str(r#"{"summary":"Main","sectionSummaries":"S1"}"#).unwrap();
        assert_eq!(parsed.section_text.as_deref(), Some("S1"));
    }
}
