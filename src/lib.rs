#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! llamadocgen - repository documentation generated by a language model
//!
//! The library clones a repository, classifies its files, asks a
//! completion endpoint to describe its entry points, workflows and outputs,
//! and writes the resulting markdown into a browsable tree.
//!
//! ## Stages
//! - Acquire: `git clone` into a deterministic local path
//! - Classify: file categories, entry points, dependency manifests
//! - Analyze: entry points, workflows, scaling, bottlenecks, outputs
//! - Generate: one prompt per document
//! - Publish: markdown tree with index pages, mirrored into the repository
//!
//! ## Usage
//! ```rust,ignore
//! use llamadocgen::{Config, DocumentationPipeline, ModelClient, RepoSource, RepositoryAcquirer};
//!
//! async fn example() -> llamadocgen::Result<()> {
//!     let config = Config::default();
//!     let client = ModelClient::openai(&config.model, "sk-...", config.retry.policy())?;
//!     let acquirer = RepositoryAcquirer::new(
//!         RepoSource::parse("https://github.com/owner/project"),
//!         &config.paths.repos_dir,
//!         false,
//!     );
//!     let summary = DocumentationPipeline::new(acquirer, client, &config.paths.output_dir)
//!         .run()
//!         .await?;
//!     println!("{} documents", summary.documents);
//!     Ok(())
//! }
//! ```

/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Logging configuration and the per-run logging context
pub mod logging;
/// Utilities (source parsing, path normalization, retry helpers)
pub mod utils;
/// Completion endpoint client
pub mod llm;
/// Repository acquisition and file classification
pub mod repository;
/// Model-driven workflow and output analysis
pub mod analysis;
/// Prompt templates
pub mod prompts;
/// Documentation generation
pub mod docs;
/// Writing the documentation tree
pub mod publish;
/// Stage orchestration
pub mod pipeline;
/// Offline model backends for tests and dry runs
pub mod testing;
/// Spinner and summary output
pub mod ui;

// Re-export common types
pub use analysis::{AnalysisOutcome, OutputAnalysis, OutputAnalyzer, WorkflowAnalysis, WorkflowAnalyzer};
pub use config::Config;
pub use docs::{DocumentationBundle, DocumentationGenerator, OrderedDocs};
pub use error::{DocError, Result};
pub use llm::{CompletionBackend, CompletionRequest, ModelClient, OpenAiBackend};
pub use logging::RunLog;
pub use pipeline::{DocumentationPipeline, RunSummary};
pub use publish::{sanitize_filename, DocumentationPublisher, PublishReport};
pub use repository::{classify_repository, RepositoryAcquirer, RepositoryDescriptor};
pub use utils::{RepoSource, RetryPolicy};
