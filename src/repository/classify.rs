use crate::error::{DocError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files larger than this are left out of the descriptor
pub const MAX_FILE_SIZE: u64 = 1_000_000;

/// How much of a file is read when deciding whether it is text
pub const BINARY_SNIFF_BYTES: usize = 1024;

const VCS_DIR: &str = ".git";

const ENTRY_POINT_NAMES: &[&str] = &["main.py", "run.py", "app.py", "setup.py"];

/// Coarse language/category label for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    /// `.py`
    #[serde(rename = "python")]
    Python,
    /// `.r`, `.rmd`
    #[serde(rename = "r")]
    R,
    /// `.sh`, `.bash`
    #[serde(rename = "shell")]
    Shell,
    /// `.c`, `.cpp`, `.cc`, `.h`, `.hpp`
    #[serde(rename = "c++")]
    Cpp,
    /// `.java`
    #[serde(rename = "java")]
    Java,
    /// `.js`, `.ts`
    #[serde(rename = "javascript")]
    JavaScript,
    /// `.md`, `.markdown`
    #[serde(rename = "markdown")]
    Markdown,
    /// `.json`
    #[serde(rename = "json")]
    Json,
    /// `.yml`, `.yaml`
    #[serde(rename = "yaml")]
    Yaml,
    /// `.txt`
    #[serde(rename = "text")]
    Text,
    /// `.csv`, `.tsv`
    #[serde(rename = "data")]
    Data,
    /// Anything else
    #[serde(rename = "other")]
    Other,
}

impl FileCategory {
    /// Classifies a file name by its extension, case-insensitively
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    /// Classifies a bare extension (without the dot)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" => Self::Python,
            "r" | "rmd" => Self::R,
            "sh" | "bash" => Self::Shell,
            "c" | "cpp" | "cc" | "h" | "hpp" => Self::Cpp,
            "java" => Self::Java,
            "js" | "ts" => Self::JavaScript,
            "md" | "markdown" => Self::Markdown,
            "json" => Self::Json,
            "yml" | "yaml" => Self::Yaml,
            "txt" => Self::Text,
            "csv" | "tsv" => Self::Data,
            _ => Self::Other,
        }
    }

    /// Label used in prompts and summaries
    pub fn label(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::R => "r",
            Self::Shell => "shell",
            Self::Cpp => "c++",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Text => "text",
            Self::Data => "data",
            Self::Other => "other",
        }
    }

    /// Source-language categories that get per-file documentation
    pub fn is_code(self) -> bool {
        matches!(
            self,
            Self::Python | Self::R | Self::Shell | Self::Cpp | Self::Java | Self::JavaScript
        )
    }

    /// Categories a file under `bin/` must have to count as an entry point
    fn is_script(self) -> bool {
        matches!(self, Self::Python | Self::R | Self::Shell)
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One text file kept by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    /// Extension-derived category
    pub category: FileCategory,
    /// Size in bytes
    pub size: u64,
}

/// Declared dependencies per ecosystem, in a fixed order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Lines from `requirements.txt`
    pub python: Vec<String>,
    /// `Imports:` entries from an R `DESCRIPTION` file
    pub r: Vec<String>,
    /// Never populated; kept so prompts show the ecosystem
    pub system: Vec<String>,
}

/// Everything the classifier learned about a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name
    pub name: String,
    /// Local checkout
    pub path: PathBuf,
    /// Kept files, sorted by relative path
    pub files: Vec<FileRecord>,
    /// Category label to file count, in first-seen order
    pub languages: Vec<(String, usize)>,
    /// Name-pattern entry point candidates
    pub entry_points: Vec<String>,
    /// Declared dependencies
    pub dependencies: Dependencies,
}

impl RepositoryDescriptor {
    /// Files whose category gets per-file documentation
    pub fn code_files(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().filter(|f| f.category.is_code())
    }

    /// Count for a category label, zero when absent
    pub fn language_count(&self, label: &str) -> usize {
        self.languages
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Walks `root` and builds the repository descriptor.
///
/// Skips the `.git` directory, files over [`MAX_FILE_SIZE`] and files whose
/// first kilobyte is not valid UTF-8. Fails if `root` does not exist.
pub fn classify_repository(name: &str, root: &Path) -> Result<RepositoryDescriptor> {
    info!("Analyzing repository structure at {}", root.display());

    if !root.is_dir() {
        return Err(DocError::IO(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("repository path does not exist: {}", root.display()),
        )));
    }

    let mut files = Vec::new();
    let mut languages: Vec<(String, usize)> = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == VCS_DIR));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let size = entry.metadata()?.len();
        if size > MAX_FILE_SIZE {
            info!("Skipping oversized file: {}", entry.path().display());
            continue;
        }
        if is_binary_file(entry.path())? {
            info!("Skipping binary file: {}", entry.path().display());
            continue;
        }

        let rel_path = relative_path(root, entry.path());
        let category = FileCategory::from_path(entry.path());

        match languages.iter_mut().find(|(label, _)| label == category.label()) {
            Some((_, count)) => *count += 1,
            None => languages.push((category.label().to_string(), 1)),
        }

        files.push(FileRecord {
            path: rel_path,
            category,
            size,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    let entry_points = identify_entry_points(&files);
    let dependencies = identify_dependencies(root)?;

    info!("Repository analysis complete. Found {} files.", files.len());

    Ok(RepositoryDescriptor {
        name: name.to_string(),
        path: root.to_path_buf(),
        files,
        languages,
        entry_points,
        dependencies,
    })
}

/// Heuristic text check: the first [`BINARY_SNIFF_BYTES`] must decode as UTF-8.
///
/// A multi-byte character cut off at that limit still counts as text.
pub fn is_binary_file(path: &Path) -> Result<bool> {
    let mut buf = Vec::with_capacity(BINARY_SNIFF_BYTES);
    File::open(path)?
        .take(BINARY_SNIFF_BYTES as u64)
        .read_to_end(&mut buf)?;

    Ok(match std::str::from_utf8(&buf) {
        Ok(_) => false,
        Err(e) => e.error_len().is_some() || buf.len() < BINARY_SNIFF_BYTES,
    })
}

/// Name-pattern entry points: conventional script names anywhere, or
/// python/r/shell files under a top-level `bin/`.
pub fn identify_entry_points(files: &[FileRecord]) -> Vec<String> {
    files
        .iter()
        .filter(|file| {
            ENTRY_POINT_NAMES.iter().any(|name| file.path.ends_with(name))
                || (file.path.starts_with("bin/") && file.category.is_script())
        })
        .map(|file| file.path.clone())
        .collect()
}

/// Reads `requirements.txt` and an R `DESCRIPTION` file from the root
pub fn identify_dependencies(root: &Path) -> Result<Dependencies> {
    let mut deps = Dependencies::default();

    let requirements = root.join("requirements.txt");
    if requirements.is_file() {
        deps.python = parse_requirements(&fs::read_to_string(&requirements)?);
    }

    let description = root.join("DESCRIPTION");
    if description.is_file() {
        match fs::read_to_string(&description) {
            Ok(content) => deps.r = parse_description_imports(&content),
            Err(e) => warn!("Could not read {}: {}", description.display(), e),
        }
    }

    Ok(deps)
}

/// Non-blank, non-comment lines, trimmed, otherwise verbatim
pub fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Entries of the `Imports:` field, up to the first blank line.
///
/// Only the text before the first comma on each line is kept.
pub fn parse_description_imports(content: &str) -> Vec<String> {
    let Some((_, after)) = content.split_once("Imports:") else {
        return Vec::new();
    };
    // the first line holds whatever follows `Imports:` and may be empty
    let mut lines = after.lines();
    let first = lines.next().unwrap_or_default();

    std::iter::once(first)
        .chain(lines.take_while(|line| !line.trim().is_empty()))
        .filter_map(|line| line.trim().split(',').next())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_category_table() {
        let cases = [
            ("a.py", FileCategory::Python),
            ("a.R", FileCategory::R),
            ("a.Rmd", FileCategory::R),
            ("a.sh", FileCategory::Shell),
            ("a.bash", FileCategory::Shell),
            ("a.cc", FileCategory::Cpp),
            ("a.HPP", FileCategory::Cpp),
            ("a.java", FileCategory::Java),
            ("a.ts", FileCategory::JavaScript),
            ("a.markdown", FileCategory::Markdown),
            ("a.json", FileCategory::Json),
            ("a.yml", FileCategory::Yaml),
            ("a.txt", FileCategory::Text),
            ("a.tsv", FileCategory::Data),
            ("a.rs", FileCategory::Other),
            ("Makefile", FileCategory::Other),
        ];
        for (name, expected) in cases {
            assert_eq!(FileCategory::from_path(Path::new(name)), expected, "{}", name);
        }
    }

    #[test]
    fn test_category_serializes_as_label() {
        assert_eq!(serde_json::to_string(&FileCategory::Cpp).unwrap(), "\"c++\"");
        assert_eq!(FileCategory::JavaScript.to_string(), "javascript");
    }

    #[test]
    fn test_requirements_parsing() {
        let parsed = parse_requirements("# pinned\nnumpy>=1.20\n\n  pandas  \n#scipy\n");
        assert_eq!(parsed, vec!["numpy>=1.20", "pandas"]);
    }

    #[test]
    fn test_description_imports() {
        let content = "Package: demo\nImports:\n    dplyr (>= 1.0),\n    ggplot2,\n    tidyr\n\nSuggests: testthat\n";
        assert_eq!(
            parse_description_imports(content),
            vec!["dplyr (>= 1.0)", "ggplot2", "tidyr"]
        );
        assert!(parse_description_imports("Package: demo\n").is_empty());
    }

    #[test]
    fn test_description_imports_crlf() {
        let content = "Imports:\r\n    dplyr,\r\n    tidyr\r\n\r\nLicense: MIT\r\nAuthor: someone\r\n";
        assert_eq!(parse_description_imports(content), vec!["dplyr", "tidyr"]);
    }

    #[test]
    fn test_description_imports_inline_and_empty() {
        assert_eq!(parse_description_imports("Imports: stats, utils\n\nLicense: MIT\n"), vec!["stats"]);
        assert!(parse_description_imports("Imports:\n\nLicense: MIT\n").is_empty());
    }

    #[test]
    fn test_entry_point_heuristic() {
        let record = |path: &str| FileRecord {
            path: path.into(),
            category: FileCategory::from_path(Path::new(path)),
            size: 1,
        };
        let files = vec![
            record("src/main.py"),
            record("bin/run_all.sh"),
            record("bin/tool.java"),
            record("setup.py"),
            record("lib/util.py"),
            record("tools/bin/x.py"),
        ];
        assert_eq!(
            identify_entry_points(&files),
            vec!["src/main.py", "bin/run_all.sh", "setup.py"]
        );
    }

    #[test]
    fn test_binary_detection() -> Result<()> {
        let dir = TempDir::new()?;
        let text = dir.path().join("text.txt");
        fs::write(&text, "plain text")?;
        let binary = dir.path().join("blob.bin");
        fs::write(&binary, [0x89, b'P', b'N', b'G', 0xff, 0xfe, 0x00])?;

        // a two-byte character straddling the read limit
        let straddle = dir.path().join("straddle.txt");
        let mut content = "a".repeat(BINARY_SNIFF_BYTES - 1).into_bytes();
        content.extend_from_slice("é".as_bytes());
        fs::write(&straddle, content)?;

        assert!(!is_binary_file(&text)?);
        assert!(is_binary_file(&binary)?);
        assert!(!is_binary_file(&straddle)?);
        Ok(())
    }

    #[test]
    fn test_missing_root_fails() {
        let result = classify_repository("ghost", Path::new("/no/such/repository/root"));
        assert!(matches!(result, Err(DocError::IO(_))));
    }

    #[test]
    fn test_language_counts_first_seen_order() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("a.py"), "print(1)")?;
        fs::write(dir.path().join("b.md"), "# b")?;
        fs::write(dir.path().join("c.py"), "print(2)")?;

        let repo = classify_repository("demo", dir.path())?;
        assert_eq!(
            repo.languages,
            vec![("python".to_string(), 2), ("markdown".to_string(), 1)]
        );
        assert_eq!(repo.language_count("python"), 2);
        assert_eq!(repo.language_count("java"), 0);
        Ok(())
    }
}
