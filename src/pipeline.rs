//! End-to-end run: acquire, classify, analyze, generate, publish.
//!
//! Stages run strictly one after another and share a single
//! [`ModelClient`] and [`RunLog`].

use crate::analysis::{OutputAnalyzer, WorkflowAnalyzer};
use crate::docs::DocumentationGenerator;
use crate::error::{DocError, Result};
use crate::llm::ModelClient;
use crate::logging::{RunLog, RunWarning};
use crate::publish::DocumentationPublisher;
use crate::repository::{classify_repository, RepositoryAcquirer};
use crate::ui;
use indicatif::ProgressBar;
use std::future::Future;
use std::path::PathBuf;

const COMPONENT: &str = "pipeline";

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Run identifier used in the log
    pub run_id: String,
    /// Root of the generated tree
    pub output_dir: PathBuf,
    /// Local checkout that was documented
    pub repo_path: PathBuf,
    /// Markdown documents generated, index pages excluded
    pub documents: usize,
    /// Workflow documents
    pub workflow_docs: usize,
    /// Output-type documents
    pub output_docs: usize,
    /// Per-source-file documents
    pub code_docs: usize,
    /// Files written below the output directory
    pub files_written: usize,
    /// Whether the docs were copied into the checkout
    pub mirrored: bool,
    /// Items dropped or defaulted along the way
    pub warnings: Vec<RunWarning>,
}

/// Runs every stage for one repository
pub struct DocumentationPipeline {
    acquirer: RepositoryAcquirer,
    client: ModelClient,
    output_dir: PathBuf,
    run: RunLog,
    show_progress: bool,
}

impl DocumentationPipeline {
    /// Creates a pipeline writing into `output_dir`
    pub fn new(acquirer: RepositoryAcquirer, client: ModelClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            acquirer,
            client,
            output_dir: output_dir.into(),
            run: RunLog::new(),
            show_progress: false,
        }
    }

    /// Uses a caller-provided logging context
    pub fn with_run_log(mut self, run: RunLog) -> Self {
        self.run = run;
        self
    }

    /// Shows a terminal spinner while running
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Executes all stages. The first stage error is logged with the stage
    /// name and returned; nothing after it runs.
    pub async fn run(&self) -> Result<RunSummary> {
        let pb = if self.show_progress {
            ui::create_spinner("Starting")
        } else {
            ui::hidden_spinner()
        };

        let result = self.run_stages(&pb).await;
        match &result {
            Ok(_) => pb.finish_with_message("Done"),
            Err(_) => pb.abandon_with_message("Failed"),
        }
        result
    }

    async fn run_stages(&self, pb: &ProgressBar) -> Result<RunSummary> {
        let run = &self.run;
        run.info(COMPONENT, "Starting documentation generation");

        let repo_path = self
            .stage(pb, "Acquiring repository", self.acquirer.acquire(run))
            .await?;

        pb.set_message("Classifying files");
        let repo = classify_repository(&self.acquirer.repo_name(), &repo_path)
            .map_err(|e| self.failed("Classifying files", e))?;
        run.info(
            COMPONENT,
            format!(
                "Found {} files, {} entry points",
                repo.files.len(),
                repo.entry_points.len()
            ),
        );

        let workflows = self
            .stage(
                pb,
                "Analyzing workflows",
                WorkflowAnalyzer::new(self.client.clone()).analyze(&repo, run),
            )
            .await?;

        let outputs = self
            .stage(
                pb,
                "Analyzing outputs",
                OutputAnalyzer::new(self.client.clone()).analyze(&workflows, run),
            )
            .await?;

        let generator = DocumentationGenerator::new(self.client.clone(), &repo, &workflows, &outputs)
            .with_progress(pb.clone());
        let bundle = self
            .stage(pb, "Generating documentation", generator.generate(run))
            .await?;

        let publisher = DocumentationPublisher::new(&self.output_dir, &repo_path);
        let report = self
            .stage(pb, "Publishing documentation", publisher.publish(&bundle, run))
            .await?;

        run.info(COMPONENT, "Documentation generation completed successfully");

        Ok(RunSummary {
            run_id: run.run_id().to_string(),
            output_dir: self.output_dir.clone(),
            repo_path,
            documents: bundle.document_count(),
            workflow_docs: bundle.workflow_docs.len(),
            output_docs: bundle.output_docs.len(),
            code_docs: bundle.code_docs.len(),
            files_written: report.files_written,
            mirrored: report.mirrored,
            warnings: run.warnings(),
        })
    }

    async fn stage<T, F>(&self, pb: &ProgressBar, name: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        pb.set_message(name.to_string());
        self.run.debug(COMPONENT, format!("Stage: {}", name));
        fut.await.map_err(|e| self.failed(name, e))
    }

    fn failed(&self, stage: &str, e: DocError) -> DocError {
        self.run
            .error(COMPONENT, format!("Error in stage '{}': {}", stage, e));
        e
    }
}
