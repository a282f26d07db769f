use super::lenient;
use super::workflow::WorkflowAnalysis;
use super::AnalysisOutcome;
use crate::error::Result;
use crate::llm::ModelClient;
use crate::logging::RunLog;
use crate::prompts;
use serde::{Deserialize, Serialize};

const COMPONENT: &str = "outputs";

/// Label for output files the model gave no type for
pub const UNKNOWN_FILE_TYPE: &str = "unknown";

/// One kind of file a workflow writes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputFile {
    /// Type label used to group documentation
    #[serde(default, deserialize_with = "lenient::text")]
    pub file_type: String,
    /// File name or glob
    #[serde(default, deserialize_with = "lenient::text")]
    pub name_pattern: String,
    /// What the file contains
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    /// Workflow or step that writes it
    #[serde(default, deserialize_with = "lenient::text")]
    pub produced_by: String,
    /// Columns or fields, when structured
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub fields: Vec<String>,
}

/// Output files across all workflows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputAnalysis {
    /// Files in the order the model listed them
    #[serde(default)]
    pub files: Vec<OutputFile>,
}

impl OutputAnalysis {
    /// Files grouped by type label, groups in first-seen order
    pub fn by_type(&self) -> Vec<(String, Vec<&OutputFile>)> {
        let mut groups: Vec<(String, Vec<&OutputFile>)> = Vec::new();
        for file in &self.files {
            let label = if file.file_type.trim().is_empty() {
                UNKNOWN_FILE_TYPE
            } else {
                file.file_type.as_str()
            };
            match groups.iter_mut().find(|(name, _)| name == label) {
                Some((_, files)) => files.push(file),
                None => groups.push((label.to_string(), vec![file])),
            }
        }
        groups
    }
}

#[derive(Serialize)]
struct DeclaredOutputs<'a> {
    workflow: &'a str,
    entry_point: &'a str,
    entry_point_outputs: &'a [String],
    step_outputs: Vec<&'a String>,
}

/// Asks the model which files the discovered workflows write
pub struct OutputAnalyzer {
    client: ModelClient,
}

impl OutputAnalyzer {
    /// Creates an analyzer using `client`
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// One aggregate query over the declared outputs; empty when there are
    /// no workflows or the reply does not parse.
    pub async fn analyze(&self, workflows: &WorkflowAnalysis, run: &RunLog) -> Result<OutputAnalysis> {
        if workflows.workflows.is_empty() {
            run.debug(COMPONENT, "No workflows found, skipping output analysis");
            return Ok(OutputAnalysis::default());
        }

        run.info(COMPONENT, "Analyzing workflow outputs");

        let declared: Vec<DeclaredOutputs<'_>> = workflows
            .workflows
            .iter()
            .map(|w| DeclaredOutputs {
                workflow: &w.workflow_name,
                entry_point: &w.entry_point,
                entry_point_outputs: workflows
                    .entry_points
                    .iter()
                    .find(|e| e.path == w.entry_point)
                    .map(|e| e.expected_outputs.as_slice())
                    .unwrap_or(&[]),
                step_outputs: w.steps.iter().flat_map(|s| s.outputs.iter()).collect(),
            })
            .collect();

        let reply = self
            .client
            .ask(&prompts::output_files(&prompts::to_prompt_json(&declared)))
            .await?;

        match AnalysisOutcome::<OutputAnalysis>::from_reply(&reply) {
            AnalysisOutcome::Parsed(analysis) => {
                run.info(
                    COMPONENT,
                    format!("Output analysis complete. Found {} output files.", analysis.files.len()),
                );
                Ok(analysis)
            }
            AnalysisOutcome::Unparsed { reason, .. } => {
                run.warn(
                    COMPONENT,
                    format!("Could not parse LLM response for output analysis ({})", reason),
                );
                Ok(OutputAnalysis::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(file_type: &str, name: &str) -> OutputFile {
        OutputFile {
            file_type: file_type.into(),
            name_pattern: name.into(),
            ..OutputFile::default()
        }
    }

    #[test]
    fn test_group_by_type_first_seen_order() {
        let analysis = OutputAnalysis {
            files: vec![
                file("csv", "counts.csv"),
                file("", "mystery.bin"),
                file("pdf", "report.pdf"),
                file("csv", "summary.csv"),
            ],
        };
        let groups = analysis.by_type();
        let labels: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["csv", "unknown", "pdf"]);
        assert_eq!(groups[0].1.len(), 2);
    }
}
