use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

impl Flashcard {
    pub fn new(term: &str, definition: &str) -> Self {
        Flashcard {
            term: term.to_string(),
            definition: definition.to_string(),
        }
    }
}
