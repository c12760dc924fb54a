pub mod documents;
pub mod health;
pub mod users;

pub use documents::{analyze_document, delete_document, get_document, get_document_history};
pub use health::health_check;
pub use users::register_user;
