pub mod documents;
pub mod users;

pub use documents::{AnalyzeDocumentResponse, DocumentResponse};
pub use users::{RegisterUserRequest, UserResponse};
