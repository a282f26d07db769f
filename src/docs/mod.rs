/// Generated document containers
pub mod bundle;
/// Prompt-per-document generation
pub mod generator;

pub use bundle::{DocumentationBundle, OrderedDocs};
pub use generator::DocumentationGenerator;
