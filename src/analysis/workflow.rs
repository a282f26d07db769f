use super::lenient;
use super::AnalysisOutcome;
use crate::error::Result;
use crate::llm::ModelClient;
use crate::logging::RunLog;
use crate::prompts;
use crate::repository::{FileCategory, RepositoryDescriptor};
use serde::{Deserialize, Serialize};

const COMPONENT: &str = "workflow";

const ENTRY_POINT_HINTS: &[&str] = &["main", "run", "app"];

/// A source file loaded for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the repository root
    pub path: String,
    /// Category from the classifier
    pub category: FileCategory,
    /// Full content, lossily decoded
    pub content: String,
}

/// The model's judgement about one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPointCandidate {
    /// File the judgement is about
    #[serde(default)]
    pub path: String,
    /// Whether the file is executed directly
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_entry_point: bool,
    /// Name of the main routine, if any
    #[serde(default, deserialize_with = "lenient::text")]
    pub main_function: String,
    /// Whether the file takes command-line arguments
    #[serde(default, deserialize_with = "lenient::flag")]
    pub accepts_arguments: bool,
    /// What the entry point does
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    /// Inputs it expects
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub expected_inputs: Vec<String>,
    /// Outputs it produces
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub expected_outputs: Vec<String>,
}

/// One step of a workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// 1-based position as reported by the model
    #[serde(default, deserialize_with = "lenient::number")]
    pub step_number: u32,
    /// Step name
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// What the step does
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    /// Function or class responsible
    #[serde(default, deserialize_with = "lenient::text")]
    pub code_reference: String,
    /// Inputs consumed
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub inputs: Vec<String>,
    /// Outputs produced
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub outputs: Vec<String>,
    /// Common causes of failure
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub potential_failures: Vec<String>,
}

/// A workflow decomposed from one accepted entry point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDescription {
    /// Display name; also the key of the workflow document
    #[serde(default, deserialize_with = "lenient::text")]
    pub workflow_name: String,
    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    /// How the steps connect
    #[serde(default, deserialize_with = "lenient::text")]
    pub execution_flow: String,
    /// Runtime estimate
    #[serde(default, deserialize_with = "lenient::text")]
    pub estimated_runtime: String,
    /// Memory, CPU and disk needs
    #[serde(default, deserialize_with = "lenient::text")]
    pub resource_requirements: String,
    /// Entry point the workflow was derived from
    #[serde(default)]
    pub entry_point: String,
}

/// A suggested way around a scaling limit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workaround {
    /// The limit addressed
    #[serde(default, deserialize_with = "lenient::text")]
    pub limitation: String,
    /// What to do about it
    #[serde(default, deserialize_with = "lenient::text")]
    pub workaround: String,
    /// easy / medium / hard
    #[serde(default, deserialize_with = "lenient::text")]
    pub implementation_difficulty: String,
}

/// Scaling limits across all workflows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalingAssessment {
    /// Limits on input size
    #[serde(default, deserialize_with = "lenient::text")]
    pub data_size_limitations: String,
    /// Limits on memory
    #[serde(default, deserialize_with = "lenient::text")]
    pub memory_limitations: String,
    /// Limits on runtime
    #[serde(default, deserialize_with = "lenient::text")]
    pub processing_time_limitations: String,
    /// Suggested workarounds
    #[serde(default)]
    pub suggested_workarounds: Vec<Workaround>,
}

/// One performance bottleneck
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    /// Step or function
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    /// What the bottleneck is
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    /// Effect on overall performance
    #[serde(default, deserialize_with = "lenient::text")]
    pub impact: String,
    /// Possible fixes
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub potential_solutions: Vec<String>,
}

/// Everything the inferrer produced
#[derive(Debug, Clone, Default)]
pub struct WorkflowAnalysis {
    /// Files the model accepted as entry points, in candidate order
    pub entry_points: Vec<EntryPointCandidate>,
    /// One workflow per accepted entry point whose reply parsed
    pub workflows: Vec<WorkflowDescription>,
    /// Scaling assessment; defaulted when skipped
    pub scaling: AnalysisOutcome<ScalingAssessment>,
    /// Bottleneck list; defaulted when skipped
    pub bottlenecks: AnalysisOutcome<Vec<Bottleneck>>,
    /// Candidates the model judged not to be entry points
    pub rejected: Vec<String>,
    /// Labels of replies that could not be parsed
    pub unparsed: Vec<String>,
}

impl WorkflowAnalysis {
    /// Every step's failure causes, flattened in workflow/step order
    pub fn failure_points(&self) -> Vec<String> {
        self.workflows
            .iter()
            .flat_map(|w| w.steps.iter())
            .flat_map(|s| s.potential_failures.iter().cloned())
            .collect()
    }

    /// Names of all workflows, in order
    pub fn workflow_names(&self) -> Vec<String> {
        self.workflows.iter().map(|w| w.workflow_name.clone()).collect()
    }
}

/// Infers entry points and workflows by querying the model one file at a time
pub struct WorkflowAnalyzer {
    client: ModelClient,
}

impl WorkflowAnalyzer {
    /// Creates an analyzer using `client` for every query
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Runs the full analysis over the repository's source files.
    ///
    /// Unparseable replies are recorded and skipped. A model call that
    /// still fails after its retries aborts the analysis.
    pub async fn analyze(&self, repo: &RepositoryDescriptor, run: &RunLog) -> Result<WorkflowAnalysis> {
        run.info(
            COMPONENT,
            format!("Analyzing workflow for repository at {}", repo.path.display()),
        );

        let files = load_source_files(repo, run);
        let mut analysis = WorkflowAnalysis::default();

        self.analyze_entry_points(&files, &mut analysis, run).await?;
        self.analyze_workflows(&files, &mut analysis, run).await?;

        if analysis.workflows.is_empty() {
            run.debug(COMPONENT, "No workflows found, skipping scaling and bottleneck analysis");
        } else {
            let workflows_json = prompts::to_prompt_json(&analysis.workflows);

            let reply = self.client.ask(&prompts::scaling_limitations(&workflows_json)).await?;
            analysis.scaling = AnalysisOutcome::from_reply(&reply);
            if !analysis.scaling.is_parsed() {
                run.warn(COMPONENT, "Could not parse LLM response for scaling limitations analysis");
                analysis.unparsed.push("scaling limitations".to_string());
            }

            let reply = self.client.ask(&prompts::bottlenecks(&workflows_json)).await?;
            analysis.bottlenecks = AnalysisOutcome::from_reply(&reply);
            if !analysis.bottlenecks.is_parsed() {
                run.warn(COMPONENT, "Could not parse LLM response for bottlenecks analysis");
                analysis.unparsed.push("bottlenecks".to_string());
            }
        }

        run.info(
            COMPONENT,
            format!(
                "Workflow analysis complete. Found {} workflows.",
                analysis.workflows.len()
            ),
        );
        Ok(analysis)
    }

    async fn analyze_entry_points(
        &self,
        files: &[SourceFile],
        analysis: &mut WorkflowAnalysis,
        run: &RunLog,
    ) -> Result<()> {
        for file in select_candidates(files) {
            let reply = self
                .client
                .ask(&prompts::entry_point(&file.path, &file.content))
                .await?;

            match AnalysisOutcome::<EntryPointCandidate>::from_reply(&reply) {
                AnalysisOutcome::Parsed(mut candidate) if candidate.is_entry_point => {
                    candidate.path = file.path.clone();
                    analysis.entry_points.push(candidate);
                }
                AnalysisOutcome::Parsed(_) => analysis.rejected.push(file.path.clone()),
                AnalysisOutcome::Unparsed { reason, .. } => {
                    run.warn(
                        COMPONENT,
                        format!(
                            "Could not parse LLM response for entry point analysis: {} ({})",
                            file.path, reason
                        ),
                    );
                    analysis.unparsed.push(file.path.clone());
                }
            }
        }
        Ok(())
    }

    async fn analyze_workflows(
        &self,
        files: &[SourceFile],
        analysis: &mut WorkflowAnalysis,
        run: &RunLog,
    ) -> Result<()> {
        for entry_point in &analysis.entry_points {
            let Some(file) = files.iter().find(|f| f.path == entry_point.path) else {
                continue;
            };

            let reply = self
                .client
                .ask(&prompts::workflow(&file.path, &entry_point.description, &file.content))
                .await?;

            match AnalysisOutcome::<WorkflowDescription>::from_reply(&reply) {
                AnalysisOutcome::Parsed(mut workflow) => {
                    workflow.entry_point = entry_point.path.clone();
                    if workflow.workflow_name.trim().is_empty() {
                        workflow.workflow_name = entry_point.path.clone();
                    }
                    analysis.workflows.push(workflow);
                }
                AnalysisOutcome::Unparsed { reason, .. } => {
                    run.warn(
                        COMPONENT,
                        format!(
                            "Could not parse LLM response for workflow analysis: {} ({})",
                            entry_point.path, reason
                        ),
                    );
                    analysis.unparsed.push(format!("workflow {}", entry_point.path));
                }
            }
        }
        Ok(())
    }
}

/// Reads every code file of the descriptor; unreadable files are skipped
pub fn load_source_files(repo: &RepositoryDescriptor, run: &RunLog) -> Vec<SourceFile> {
    repo.code_files()
        .filter_map(|record| match std::fs::read(repo.path.join(&record.path)) {
            Ok(bytes) => Some(SourceFile {
                path: record.path.clone(),
                category: record.category,
                content: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            Err(e) => {
                run.warn(COMPONENT, format!("Skipping unreadable file {}: {}", record.path, e));
                None
            }
        })
        .collect()
}

/// Files whose path mentions main/run/app; every file when none does
pub fn select_candidates(files: &[SourceFile]) -> Vec<&SourceFile> {
    let hinted: Vec<&SourceFile> = files
        .iter()
        .filter(|f| {
            let lower = f.path.to_lowercase();
            ENTRY_POINT_HINTS.iter().any(|hint| lower.contains(hint))
        })
        .collect();

    if hinted.is_empty() {
        files.iter().collect()
    } else {
        hinted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str) -> SourceFile {
        SourceFile {
            path: path.into(),
            category: FileCategory::Python,
            content: String::new(),
        }
    }

    #[test]
    fn test_candidates_prefer_hinted_paths() {
        let files = vec![source("lib/util.py"), source("src/Main.py"), source("scripts/runner.sh")];
        let picked: Vec<&str> = select_candidates(&files).iter().map(|f| f.path.as_str()).collect();
        assert_eq!(picked, vec!["src/Main.py", "scripts/runner.sh"]);
    }

    #[test]
    fn test_source_files_cover_every_code_category() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join("engine.cc"), "int main() { return 0; }\n")?;
        std::fs::write(dir.path().join("run.sh"), "echo hi\n")?;
        std::fs::write(dir.path().join("notes.md"), "# notes\n")?;

        let repo = crate::repository::classify_repository("mixed", dir.path())?;
        let files = load_source_files(&repo, &RunLog::with_id("cc"));

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["engine.cc", "run.sh"]);
        assert_eq!(files[0].category, FileCategory::Cpp);
        Ok(())
    }

    #[test]
    fn test_candidates_fall_back_to_all() {
        let files = vec![source("lib/util.py"), source("lib/io.py")];
        assert_eq!(select_candidates(&files).len(), 2);
    }

    #[test]
    fn test_entry_point_reply_tolerates_missing_fields() {
        let outcome: AnalysisOutcome<EntryPointCandidate> =
            AnalysisOutcome::from_reply(r#"{"is_entry_point": true, "description": "runs it"}"#);
        let candidate = outcome.into_parsed().unwrap();
        assert!(candidate.is_entry_point);
        assert_eq!(candidate.description, "runs it");
        assert!(candidate.expected_inputs.is_empty());
    }

    #[test]
    fn test_failure_points_flatten_in_order() {
        let step = |failures: &[&str]| WorkflowStep {
            potential_failures: failures.iter().map(|s| s.to_string()).collect(),
            ..WorkflowStep::default()
        };
        let analysis = WorkflowAnalysis {
            workflows: vec![
                WorkflowDescription {
                    steps: vec![step(&["missing input"]), step(&["disk full", "timeout"])],
                    ..WorkflowDescription::default()
                },
                WorkflowDescription {
                    steps: vec![step(&["bad format"])],
                    ..WorkflowDescription::default()
                },
            ],
            ..WorkflowAnalysis::default()
        };
        assert_eq!(
            analysis.failure_points(),
            vec!["missing input", "disk full", "timeout", "bad format"]
        );
    }

    #[test]
    fn test_bottleneck_list_parses() {
        let reply = r#"[{"location": "load", "description": "reads all rows", "impact": "high", "potential_solutions": ["stream"]}]"#;
        let outcome: AnalysisOutcome<Vec<Bottleneck>> = AnalysisOutcome::from_reply(reply);
        assert_eq!(outcome.value_or_default().len(), 1);
    }
}
