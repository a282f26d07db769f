#![allow(dead_code)]

use llamadocgen::testing::ScriptedBackend;
use llamadocgen::{DocumentationPipeline, RepoSource, RepositoryAcquirer, RunLog};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ENTRY_PROMPT: &str = "determine if it's an entry point";
pub const WORKFLOW_PROMPT: &str = "identify a complete workflow";
pub const SCALING_PROMPT: &str = "identify scaling limitations";
pub const BOTTLENECK_PROMPT: &str = "identify potential bottlenecks";
pub const OUTPUTS_PROMPT: &str = "together with the outputs each step";
pub const README_PROMPT: &str = "README.md file for the following repository";
pub const INSTALL_PROMPT: &str = "installation guide for the following repository";

pub const ENTRY_REPLY: &str = r#"{
    "is_entry_point": true,
    "main_function": "main",
    "accepts_arguments": true,
    "description": "Runs the import",
    "expected_inputs": ["input.csv"],
    "expected_outputs": ["counts.csv"]
}"#;

pub const WORKFLOW_REPLY: &str = r#"```json
{
    "workflow_name": "Data Import",
    "steps": [
        {
            "step_number": 1,
            "name": "Load",
            "description": "Reads the input table",
            "code_reference": "load",
            "inputs": ["input.csv"],
            "outputs": ["counts.csv"],
            "potential_failures": ["missing input file"]
        }
    ],
    "execution_flow": "load then write",
    "estimated_runtime": "seconds",
    "resource_requirements": "1 GB RAM"
}
```"#;

pub const SCALING_REPLY: &str = r#"{
    "data_size_limitations": "fits in memory",
    "memory_limitations": "1 GB",
    "processing_time_limitations": "linear",
    "suggested_workarounds": []
}"#;

pub const BOTTLENECK_REPLY: &str = r#"[{"location": "Load", "description": "single threaded", "impact": "slow", "potential_solutions": ["chunking"]}]"#;

pub const OUTPUTS_REPLY: &str = r#"{"files": [{"file_type": "csv", "name_pattern": "counts.csv", "description": "Counts", "produced_by": "Data Import", "fields": ["gene", "count"]}]}"#;

/// Scratch area holding a repos dir with one checkout and an output dir
pub struct Workspace {
    pub dir: TempDir,
    pub name: String,
}

impl Workspace {
    pub fn new(name: &str, files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let ws = Self {
            dir,
            name: name.to_string(),
        };
        for (path, content) in files {
            ws.write(path, content.as_bytes());
        }
        ws
    }

    pub fn write(&self, relative: &str, content: &[u8]) {
        let path = self.repo_path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.dir.path().join("repos")
    }

    pub fn repo_path(&self) -> PathBuf {
        self.repos_dir().join(&self.name)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn acquirer(&self) -> RepositoryAcquirer {
        let source = RepoSource::parse(&format!("https://example.com/owner/{}.git", self.name));
        RepositoryAcquirer::new(source, self.repos_dir(), true)
    }

    pub fn pipeline(&self, backend: &ScriptedBackend, output_dir: &Path) -> DocumentationPipeline {
        DocumentationPipeline::new(self.acquirer(), backend.client(), output_dir)
            .with_run_log(RunLog::with_id("test"))
    }
}

/// Backend answering every analysis prompt with well-formed JSON and every
/// documentation prompt with fixed markdown
pub fn happy_backend() -> ScriptedBackend {
    ScriptedBackend::new("# Generated\n\nDocument body.\n")
        .reply(ENTRY_PROMPT, ENTRY_REPLY)
        .reply(WORKFLOW_PROMPT, WORKFLOW_REPLY)
        .reply(SCALING_PROMPT, SCALING_REPLY)
        .reply(BOTTLENECK_PROMPT, BOTTLENECK_REPLY)
        .reply(OUTPUTS_PROMPT, OUTPUTS_REPLY)
}

/// Every file below `root` as (relative path, bytes), sorted by path
pub fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            (rel, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}
