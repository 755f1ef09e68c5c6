use serde::{Deserialize, Serialize};

use crate::models::domain::{Quiz, Summary};

/// Document names starting with this mark topic-generated quizzes.
pub const CUSTOM_QUIZ_PREFIX: &str = "Custom Quiz: ";

/// What a teacher publishes for students. There is a single global slot for
/// it, so the last publisher wins regardless of which teacher that was.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub quiz: Quiz,
    pub summary: Summary,
    pub document_name: String,
}

impl Bundle {
    pub fn new(document_name: &str, summary: Summary, quiz: Quiz) -> Self {
        Bundle {
            quiz,
            summary,
            document_name: document_name.to_string(),
        }
    }

    pub fn custom(topic: &str, summary: Summary, quiz: Quiz) -> Self {
        Bundle::new(&format!("{}{}", CUSTOM_QUIZ_PREFIX, topic.trim()), summary, quiz)
    }

    pub fn is_custom_quiz(&self) -> bool {
        self.document_name
            .to_lowercase()
            .starts_with(&CUSTOM_QUIZ_PREFIX.trim_end().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Question;

    #[test]
    fn bundle_uses_persisted_layout() {
        let bundle = Bundle::new(
            "Chapter 1",
            Summary::new("Numbers"),
            Quiz::new(vec![Question::new("2+2?", &["3", "4", "5", "6"], "4", "Arithmetic")]),
        );
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["documentName"], "Chapter 1");
        assert_eq!(json["summary"]["summary"], "Numbers");
        assert_eq!(json["quiz"]["questions"][0]["answer"], "4");
    }

    #[test]
    fn custom_prefix_is_detected_case_insensitively() {
        let custom = Bundle::custom("  Volcanoes ", Summary::default(), Quiz::default());
        assert_eq!(custom.document_name, "Custom Quiz: Volcanoes");
        assert!(custom.is_custom_quiz());

        let lower = Bundle::new("custom quiz: rivers", Summary::default(), Quiz::default());
        assert!(lower.is_custom_quiz());

        let plain = Bundle::new("notes.pdf", Summary::default(), Quiz::default());
        assert!(!plain.is_custom_quiz());
    }
}
