/// Fetching the repository to a local checkout
pub mod acquire;
/// Walking and classifying the checkout
pub mod classify;

pub use acquire::{repo_name_from_source, RepositoryAcquirer};
pub use classify::{
    classify_repository, Dependencies, FileCategory, FileRecord, RepositoryDescriptor,
    MAX_FILE_SIZE,
};
