/// Fixed-delay retry helper
pub mod retry;
/// Parsing user input into a repository source
pub mod source;

pub use retry::{with_retry, RetryPolicy};
pub use source::{normalize_user_input_path, RepoSource};
