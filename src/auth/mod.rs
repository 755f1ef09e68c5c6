pub mod credentials;
pub mod policy;

pub use credentials::{builtin_credentials, parse_credentials, CredentialStore};
pub use policy::{
    can_edit_content, can_publish, can_submit_quiz, quiz_mode_for, require_editor,
    require_student, require_teacher, visible_publication,
};
