pub mod error;
pub mod form;
pub mod messages;
pub mod session;

pub use error::{AppError, Result};
pub use form::{ActiveEditor, ResourceFormController, SubmitOutcome, Submission};
pub use session::AppSession;
