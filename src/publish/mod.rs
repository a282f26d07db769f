//! Writes a [`DocumentationBundle`] to disk and mirrors it into the
//! analyzed repository.

/// Index page rendering and file name sanitizing
pub mod index;

pub use index::sanitize_filename;

use crate::docs::{DocumentationBundle, OrderedDocs};
use crate::error::{DocError, Result};
use crate::logging::RunLog;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

const COMPONENT: &str = "publisher";

/// What a publish run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Files written below the output directory
    pub files_written: usize,
    /// Whether the docs were copied into the repository
    pub mirrored: bool,
}

/// Materializes the output layout:
///
/// ```text
/// <output_dir>/README.md
/// <output_dir>/docs/{installation,scaling,troubleshooting,index}.md
/// <output_dir>/docs/workflows/<name>.md
/// <output_dir>/docs/outputs/<type>.md
/// <output_dir>/docs/code/<dir>/<file>.md
/// ```
pub struct DocumentationPublisher {
    output_dir: PathBuf,
    repo_path: PathBuf,
    docs_dir: PathBuf,
}

impl DocumentationPublisher {
    /// Creates a publisher writing to `output_dir` and mirroring into `repo_path`
    pub fn new(output_dir: impl Into<PathBuf>, repo_path: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let docs_dir = output_dir.join("docs");
        Self {
            output_dir,
            repo_path: repo_path.into(),
            docs_dir,
        }
    }

    /// Root of the generated tree
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every document and index page. Errors are logged and
    /// returned; files already written stay on disk.
    pub async fn publish(&self, bundle: &DocumentationBundle, run: &RunLog) -> Result<PublishReport> {
        run.info(
            COMPONENT,
            format!("Publishing documentation to {}", self.output_dir.display()),
        );

        match self.publish_all(bundle, run).await {
            Ok(report) => {
                run.info(
                    COMPONENT,
                    format!(
                        "Documentation published successfully to {} ({} files)",
                        self.output_dir.display(),
                        report.files_written
                    ),
                );
                Ok(report)
            }
            Err(e) => {
                run.error(COMPONENT, format!("Error publishing documentation: {}", e));
                Err(e)
            }
        }
    }

    async fn publish_all(&self, bundle: &DocumentationBundle, run: &RunLog) -> Result<PublishReport> {
        let workflows_dir = self.docs_dir.join("workflows");
        let outputs_dir = self.docs_dir.join("outputs");
        let code_dir = self.docs_dir.join("code");

        for dir in [&self.output_dir, &self.docs_dir, &code_dir, &workflows_dir, &outputs_dir] {
            create_dir(dir).await?;
        }

        let mut written = 0;
        let fixed = [
            (self.output_dir.join("README.md"), &bundle.main_readme),
            (self.docs_dir.join("installation.md"), &bundle.installation_guide),
            (self.docs_dir.join("scaling.md"), &bundle.scaling_guide),
            (self.docs_dir.join("troubleshooting.md"), &bundle.troubleshooting_guide),
        ];
        for (path, text) in fixed {
            write_file(&path, text).await?;
            written += 1;
        }

        written += write_section(&workflows_dir, &bundle.workflow_docs).await?;
        written += write_section(&outputs_dir, &bundle.output_docs).await?;

        for (path, text) in bundle.code_docs.iter() {
            let target = code_dir.join(index::code_doc_path(path));
            if let Some(parent) = target.parent() {
                create_dir(parent).await?;
            }
            write_file(&target, text).await?;
            written += 1;
        }

        write_file(&self.docs_dir.join("index.md"), &index::main_index(bundle)).await?;
        write_file(
            &workflows_dir.join("index.md"),
            &index::workflow_index(&bundle.workflow_docs),
        )
        .await?;
        write_file(
            &outputs_dir.join("index.md"),
            &index::output_index(&bundle.output_docs),
        )
        .await?;
        written += 3;

        let mirrored = if fs::try_exists(&self.repo_path).await.unwrap_or(false) {
            self.mirror(run).await?;
            true
        } else {
            run.debug(
                COMPONENT,
                format!(
                    "Repository path {} does not exist, skipping mirror",
                    self.repo_path.display()
                ),
            );
            false
        };

        Ok(PublishReport {
            files_written: written,
            mirrored,
        })
    }

    /// Copies `docs/` into the repository and overwrites its README
    async fn mirror(&self, run: &RunLog) -> Result<()> {
        let repo_docs = self.repo_path.join("docs");
        run.info(
            COMPONENT,
            format!("Copying documentation into {}", repo_docs.display()),
        );
        create_dir(&repo_docs).await?;

        let readme = self.repo_path.join("README.md");
        fs::copy(self.output_dir.join("README.md"), &readme)
            .await
            .map_err(|e| DocError::publish(&readme, e))?;

        for entry in WalkDir::new(&self.docs_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.docs_dir)
                .map_err(|e| DocError::Message(e.to_string()))?;
            let target = repo_docs.join(relative);
            if let Some(parent) = target.parent() {
                create_dir(parent).await?;
            }
            fs::copy(entry.path(), &target)
                .await
                .map_err(|e| DocError::publish(&target, e))?;
        }
        Ok(())
    }
}

async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| DocError::publish(path, e))
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .await
        .map_err(|e| DocError::publish(path, e))
}

async fn write_section(dir: &Path, docs: &OrderedDocs) -> Result<usize> {
    for (name, text) in docs.iter() {
        let path = dir.join(format!("{}.md", sanitize_filename(name)));
        write_file(&path, text).await?;
    }
    Ok(docs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_counts_files() {
        let out = TempDir::new().unwrap();
        let mut bundle = DocumentationBundle::default();
        bundle.workflow_docs.insert("run", "w");
        bundle.code_docs.insert("pkg/mod.py", "c");

        let publisher = DocumentationPublisher::new(out.path(), out.path().join("missing"));
        let report = publisher.publish(&bundle, &RunLog::with_id("test")).await.unwrap();

        assert_eq!(report.files_written, 4 + 1 + 1 + 3);
        assert!(!report.mirrored);
        assert!(out.path().join("docs/code/pkg/mod.py.md").is_file());
    }

    #[tokio::test]
    async fn test_write_error_names_path() {
        let out = TempDir::new().unwrap();
        let blocker = out.path().join("blocked");
        std::fs::write(&blocker, "not a directory").unwrap();

        let publisher = DocumentationPublisher::new(&blocker, out.path().join("missing"));
        let err = publisher
            .publish(&DocumentationBundle::default(), &RunLog::with_id("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocError::Publish { .. }));
    }
}
