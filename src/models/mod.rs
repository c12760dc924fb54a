pub mod document;
pub mod user;

pub use document::{Document, DocumentStatus};
pub use user::User;
