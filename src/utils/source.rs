use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Where a repository is acquired from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    /// A clone URL (`https://`, `ssh://`, `git@host:owner/repo`, ...)
    Remote(String),
    /// A repository already on the local filesystem
    Local(PathBuf),
}

impl RepoSource {
    /// Classifies user input as a remote URL or a local path.
    ///
    /// Input is trimmed and surrounding quotes are removed first.
    pub fn parse(input: &str) -> Self {
        let trimmed = strip_quotes(input.trim());
        if is_scp_like(trimmed) {
            return Self::Remote(trimmed.to_string());
        }
        match Url::parse(trimmed) {
            // a single-letter scheme is a Windows drive, not a URL
            Ok(url) if url.scheme().len() > 1 && url.scheme() != "file" => {
                Self::Remote(trimmed.to_string())
            }
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .unwrap_or_else(|_| Self::Local(normalize_user_input_path(trimmed))),
            _ => Self::Local(normalize_user_input_path(trimmed)),
        }
    }

    /// The string handed to `git clone`
    pub fn clone_arg(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.to_string_lossy().to_string(),
        }
    }
}

impl fmt::Display for RepoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clone_arg())
    }
}

/// Normalize a user-provided local path string into a PathBuf.
///
/// - Trims leading/trailing whitespace
/// - Strips surrounding single or double quotes if present
/// - Expands a leading '~' to the HOME directory when possible
pub fn normalize_user_input_path(input: &str) -> PathBuf {
    let unquoted = strip_quotes(input.trim());

    if let Some(rest) = unquoted.strip_prefix('~') {
        if let Some(home) = std::env::var_os("HOME") {
            let mut buf = PathBuf::from(home);
            let rest = rest.trim_start_matches('/');
            if !rest.is_empty() {
                buf.push(rest);
            }
            return buf;
        }
    }

    PathBuf::from(unquoted)
}

fn strip_quotes(s: &str) -> &str {
    let quoted = s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')));
    if quoted {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

// git@github.com:owner/repo.git
fn is_scp_like(s: &str) -> bool {
    match (s.find('@'), s.find(':')) {
        (Some(at), Some(colon)) => at < colon && !s[..colon].contains('/'),
        _ => false,
    }
}
