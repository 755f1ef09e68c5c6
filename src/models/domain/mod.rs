pub mod attempt;
pub mod flashcard;
pub mod identity;
pub mod publication;
pub mod quiz;
pub mod summary;
pub use attempt::AttemptRecord;
pub use flashcard::Flashcard;
pub use identity::{CredentialRecord, Identity, Role};
pub use publication::Bundle;
pub use quiz::{Question, Quiz};
pub use summary::Summary;
