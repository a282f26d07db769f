use crate::error::{DocError, Result};
use crate::logging::RunLog;
use crate::utils::source::RepoSource;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;

const COMPONENT: &str = "acquire";

/// Derives the checkout directory name from a clone source: the final
/// path segment with any `.git` suffix removed.
pub fn repo_name_from_source(source: &str) -> String {
    let trimmed = source.trim().trim_end_matches(['/', '\\']);
    let last = trimmed
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or(trimmed);
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repository".to_string()
    } else {
        name.to_string()
    }
}

/// Fetches a repository into `<repos_dir>/<name>` with `git clone`
#[derive(Debug, Clone)]
pub struct RepositoryAcquirer {
    source: RepoSource,
    repos_dir: PathBuf,
    skip_clone: bool,
    git: PathBuf,
}

impl RepositoryAcquirer {
    /// Creates an acquirer for `source`, cloning under `repos_dir`
    pub fn new(source: RepoSource, repos_dir: impl Into<PathBuf>, skip_clone: bool) -> Self {
        Self {
            source,
            repos_dir: repos_dir.into(),
            skip_clone,
            git: PathBuf::from("git"),
        }
    }

    /// Uses a different `git` executable
    pub fn with_git(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = git.into();
        self
    }

    /// Repository name derived from the source
    pub fn repo_name(&self) -> String {
        repo_name_from_source(&self.source.clone_arg())
    }

    /// Where the checkout lives
    pub fn repo_path(&self) -> PathBuf {
        self.repos_dir.join(self.repo_name())
    }

    /// Checkout path, refused unless it is a direct child of `repos_dir`.
    ///
    /// Sources ending in `.` or `..` would otherwise resolve outside the
    /// repos directory, which `acquire` then removes before cloning.
    pub fn checkout_path(&self) -> Result<PathBuf> {
        let name = self.repo_name();
        let path = self.repos_dir.join(&name);
        let mut components = Path::new(&name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || path.parent() != Some(self.repos_dir.as_path()) {
            return Err(DocError::Clone(format!(
                "cannot derive a checkout directory from '{}'",
                self.source
            )));
        }
        Ok(path)
    }

    /// Clones the repository, or reuses an existing checkout when
    /// `skip_clone` is set. An existing directory is otherwise replaced.
    pub async fn acquire(&self, run: &RunLog) -> Result<PathBuf> {
        let repo_path = match self.checkout_path() {
            Ok(path) => path,
            Err(e) => {
                run.error(COMPONENT, format!("Error cloning repository: {}", e));
                return Err(e);
            }
        };

        if self.skip_clone && repo_path.exists() {
            run.info(
                COMPONENT,
                format!("Using existing repository at {}", repo_path.display()),
            );
            return Ok(repo_path);
        }

        run.info(
            COMPONENT,
            format!("Cloning repository {} to {}", self.source, repo_path.display()),
        );

        match self.clone_into(&repo_path).await {
            Ok(()) => {
                run.info(
                    COMPONENT,
                    format!("Repository cloned successfully to {}", repo_path.display()),
                );
                Ok(repo_path)
            }
            Err(e) => {
                run.error(COMPONENT, format!("Error cloning repository: {}", e));
                Err(e)
            }
        }
    }

    async fn clone_into(&self, repo_path: &Path) -> Result<()> {
        if repo_path.exists() {
            fs::remove_dir_all(repo_path).await?;
        }
        if let Some(parent) = repo_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let output = Command::new(&self.git)
            .arg("clone")
            .arg(self.source.clone_arg())
            .arg(repo_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DocError::Clone(format!("failed to launch {}: {}", self.git.display(), e)))?;

        if !output.status.success() {
            return Err(DocError::Clone(format!(
                "git clone exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_repo_name_from_source() {
        assert_eq!(repo_name_from_source("https://github.com/owner/analysis.git"), "analysis");
        assert_eq!(repo_name_from_source("https://github.com/owner/analysis/"), "analysis");
        assert_eq!(repo_name_from_source("git@github.com:owner/tool.git"), "tool");
        assert_eq!(repo_name_from_source("/srv/git/project"), "project");
        assert_eq!(repo_name_from_source("plain"), "plain");
    }

    #[tokio::test]
    async fn test_skip_clone_reuses_existing_checkout() -> Result<()> {
        let repos = TempDir::new()?;
        let existing = repos.path().join("demo");
        std::fs::create_dir_all(&existing)?;
        std::fs::write(existing.join("marker"), "keep")?;

        let acquirer = RepositoryAcquirer::new(
            RepoSource::Remote("https://example.invalid/owner/demo.git".into()),
            repos.path(),
            true,
        )
        .with_git("/definitely/not/git");

        let path = acquirer.acquire(&RunLog::with_id("t")).await?;
        assert_eq!(path, existing);
        assert!(existing.join("marker").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_dot_segments_never_leave_repos_dir() -> Result<()> {
        let root = TempDir::new()?;
        let repos = root.path().join("repos");
        std::fs::create_dir_all(&repos)?;
        let sentinel = root.path().join("sentinel");
        std::fs::write(&sentinel, "keep")?;

        for source in ["..", "/srv/project/.", "./"] {
            let acquirer = RepositoryAcquirer::new(RepoSource::Local(source.into()), &repos, false)
                .with_git("/definitely/not/git");

            let result = acquirer.acquire(&RunLog::with_id("t")).await;
            assert!(matches!(result, Err(DocError::Clone(_))), "source {:?}", source);
        }

        assert!(sentinel.exists());
        assert!(repos.is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_git_binary_is_clone_error() -> Result<()> {
        let repos = TempDir::new()?;
        let acquirer = RepositoryAcquirer::new(
            RepoSource::Remote("https://example.invalid/owner/demo.git".into()),
            repos.path(),
            false,
        )
        .with_git("/definitely/not/git");

        let result = acquirer.acquire(&RunLog::with_id("t")).await;
        assert!(matches!(result, Err(DocError::Clone(_))));
        Ok(())
    }
}
