use super::bundle::{DocumentationBundle, OrderedDocs};
use crate::analysis::{OutputAnalysis, WorkflowAnalysis};
use crate::error::{DocError, Result};
use crate::llm::ModelClient;
use crate::logging::RunLog;
use crate::prompts::{self, to_prompt_json};
use crate::repository::RepositoryDescriptor;
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;

const COMPONENT: &str = "generator";

#[derive(Serialize)]
struct RepoSummary<'a> {
    name: &'a str,
    languages: BTreeMap<&'a str, usize>,
    entry_points: &'a [String],
    workflows: Vec<String>,
}

/// Produces every document of a run, one model query per document.
///
/// Replies are stored verbatim as markdown. Any failure aborts the whole
/// generation; no partial bundle is returned.
pub struct DocumentationGenerator<'a> {
    client: ModelClient,
    repo: &'a RepositoryDescriptor,
    workflows: &'a WorkflowAnalysis,
    outputs: &'a OutputAnalysis,
    progress: Option<ProgressBar>,
}

impl<'a> DocumentationGenerator<'a> {
    /// Creates a generator over the analysis results of one run
    pub fn new(
        client: ModelClient,
        repo: &'a RepositoryDescriptor,
        workflows: &'a WorkflowAnalysis,
        outputs: &'a OutputAnalysis,
    ) -> Self {
        Self {
            client,
            repo,
            workflows,
            outputs,
            progress: None,
        }
    }

    /// Reports progress messages on `pb`
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    /// Generates the full bundle
    pub async fn generate(&self, run: &RunLog) -> Result<DocumentationBundle> {
        run.info(
            COMPONENT,
            format!("Generating documentation for repository at {}", self.repo.path.display()),
        );

        match self.generate_all(run).await {
            Ok(bundle) => {
                run.info(
                    COMPONENT,
                    format!(
                        "Documentation generation complete: {} documents",
                        bundle.document_count()
                    ),
                );
                Ok(bundle)
            }
            Err(e) => {
                run.error(COMPONENT, format!("Error generating documentation: {}", e));
                Err(e)
            }
        }
    }

    async fn generate_all(&self, run: &RunLog) -> Result<DocumentationBundle> {
        let main_readme = self.main_readme(run).await?;
        let installation_guide = self.installation_guide(run).await?;
        let workflow_docs = self.workflow_docs(run).await?;
        let output_docs = self.output_docs(run).await?;
        let scaling_guide = self.scaling_guide(run).await?;
        let troubleshooting_guide = self.troubleshooting_guide(run).await?;
        let code_docs = self.code_docs(run).await?;

        Ok(DocumentationBundle {
            main_readme,
            installation_guide,
            scaling_guide,
            troubleshooting_guide,
            workflow_docs,
            output_docs,
            code_docs,
        })
    }

    async fn document(&self, name: &str, prompt: String) -> Result<String> {
        if let Some(pb) = &self.progress {
            pb.set_message(format!("Generating {}", name));
        }
        self.client
            .ask(&prompt)
            .await
            .map_err(|e| DocError::generation(name, e))
    }

    async fn main_readme(&self, run: &RunLog) -> Result<String> {
        run.info(COMPONENT, "Generating main README");
        let summary = RepoSummary {
            name: &self.repo.name,
            languages: self
                .repo
                .languages
                .iter()
                .map(|(label, count)| (label.as_str(), *count))
                .collect(),
            entry_points: &self.repo.entry_points,
            workflows: self.workflows.workflow_names(),
        };
        self.document("main README", prompts::main_readme(&to_prompt_json(&summary)))
            .await
    }

    async fn installation_guide(&self, run: &RunLog) -> Result<String> {
        run.info(COMPONENT, "Generating installation guide");
        let prompt = prompts::installation_guide(
            &self.repo.name,
            &to_prompt_json(&self.repo.dependencies),
        );
        self.document("installation guide", prompt).await
    }

    async fn workflow_docs(&self, run: &RunLog) -> Result<OrderedDocs> {
        run.info(COMPONENT, "Generating workflow documentation");
        let mut docs = OrderedDocs::new();
        for workflow in &self.workflows.workflows {
            let text = self
                .document(
                    &format!("workflow doc '{}'", workflow.workflow_name),
                    prompts::workflow_doc(&to_prompt_json(workflow)),
                )
                .await?;
            docs.insert(workflow.workflow_name.clone(), text);
        }
        Ok(docs)
    }

    async fn output_docs(&self, run: &RunLog) -> Result<OrderedDocs> {
        run.info(COMPONENT, "Generating output documentation");
        let mut docs = OrderedDocs::new();
        for (file_type, files) in self.outputs.by_type() {
            let text = self
                .document(
                    &format!("output doc '{}'", file_type),
                    prompts::output_doc(&file_type, &to_prompt_json(&files)),
                )
                .await?;
            docs.insert(file_type, text);
        }
        Ok(docs)
    }

    async fn scaling_guide(&self, run: &RunLog) -> Result<String> {
        run.info(COMPONENT, "Generating scaling guide");
        let prompt = prompts::scaling_guide(
            &self.repo.name,
            &to_prompt_json(&self.workflows.scaling.value_or_default()),
            &to_prompt_json(&self.workflows.bottlenecks.value_or_default()),
        );
        self.document("scaling guide", prompt).await
    }

    async fn troubleshooting_guide(&self, run: &RunLog) -> Result<String> {
        run.info(COMPONENT, "Generating troubleshooting guide");
        let prompt = prompts::troubleshooting_guide(
            &self.repo.name,
            &to_prompt_json(&self.workflows.failure_points()),
        );
        self.document("troubleshooting guide", prompt).await
    }

    async fn code_docs(&self, run: &RunLog) -> Result<OrderedDocs> {
        run.info(COMPONENT, "Generating code documentation");
        let mut docs = OrderedDocs::new();
        for record in self.repo.code_files() {
            let content = match tokio::fs::read(self.repo.path.join(&record.path)).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    run.warn(COMPONENT, format!("Skipping unreadable file {}: {}", record.path, e));
                    continue;
                }
            };
            let text = self
                .document(
                    &format!("code doc '{}'", record.path),
                    prompts::code_doc(&record.path, record.category.label(), &content),
                )
                .await?;
            docs.insert(record.path.clone(), text);
        }
        Ok(docs)
    }
}
