//! Markdown index pages linking the generated documents.

use crate::docs::{DocumentationBundle, OrderedDocs};

/// Replaces space, `/`, `\` and `:` with `_`; other characters pass through
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}

/// Splits a `/`-separated source path into directory and file name
pub fn split_code_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => ("", path),
    }
}

/// Relative location of a code document below the code-docs root
pub fn code_doc_path(path: &str) -> String {
    let (dir, file) = split_code_path(path);
    if dir.is_empty() {
        format!("{}.md", sanitize_filename(file))
    } else {
        format!("{}/{}.md", dir, sanitize_filename(file))
    }
}

fn link_list(docs: &OrderedDocs, prefix: &str) -> String {
    docs.keys()
        .map(|name| format!("- [{}]({}{}.md)", name, prefix, sanitize_filename(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_list(docs: &OrderedDocs) -> String {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for path in docs.keys() {
        let (dir, _) = split_code_path(path);
        match groups.iter_mut().find(|(d, _)| *d == dir) {
            Some((_, paths)) => paths.push(path),
            None => groups.push((dir, vec![path])),
        }
    }

    let mut lines = Vec::new();
    for (dir, paths) in groups {
        lines.push(format!("### {}", if dir.is_empty() { "Root" } else { dir }));
        for path in paths {
            let (_, file) = split_code_path(path);
            lines.push(format!("- [{}](code/{})", file, code_doc_path(path)));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// `docs/index.md`
pub fn main_index(bundle: &DocumentationBundle) -> String {
    format!(
        "# Documentation Index

## Installation and Setup
- [Installation Guide](installation.md)

## Workflows
{}

## Output Files
{}

## Advanced Topics
- [Scaling Guide](scaling.md)
- [Troubleshooting Guide](troubleshooting.md)

## Code Documentation
{}
",
        link_list(&bundle.workflow_docs, "workflows/"),
        link_list(&bundle.output_docs, "outputs/"),
        code_list(&bundle.code_docs)
    )
}

/// `docs/workflows/index.md`
pub fn workflow_index(docs: &OrderedDocs) -> String {
    format!("# Workflow Documentation\n\n{}\n", link_list(docs, ""))
}

/// `docs/outputs/index.md`
pub fn output_index(docs: &OrderedDocs) -> String {
    format!("# Output Files Documentation\n\n{}\n", link_list(docs, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Data Import"), "Data_Import");
        assert_eq!(sanitize_filename("Data Import "), "Data_Import_");
        assert_eq!(sanitize_filename(r"a/b\c:d"), "a_b_c_d");
        assert_eq!(sanitize_filename("keep*?<>"), "keep*?<>");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["Data Import", "x: y/z", "__", "plain"] {
            let once = sanitize_filename(name);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn test_code_doc_path() {
        assert_eq!(code_doc_path("main.py"), "main.py.md");
        assert_eq!(code_doc_path("src/my file.py"), "src/my_file.py.md");
    }

    #[test]
    fn test_section_index_links_are_relative() {
        let docs: OrderedDocs = [("Zeta run", "z"), ("Alpha", "a")].into_iter().collect();
        assert_eq!(
            workflow_index(&docs),
            "# Workflow Documentation\n\n- [Zeta run](Zeta_run.md)\n- [Alpha](Alpha.md)\n"
        );
    }

    #[test]
    fn test_main_index_groups_code_by_directory() {
        let mut bundle = DocumentationBundle::default();
        bundle.code_docs.insert("src/a.py", "");
        bundle.code_docs.insert("main.py", "");
        bundle.code_docs.insert("src/b.py", "");

        let index = main_index(&bundle);
        let code_section = index
            .split("## Code Documentation\n")
            .nth(1)
            .unwrap_or_default();
        assert_eq!(
            code_section,
            "### src\n- [a.py](code/src/a.py.md)\n- [b.py](code/src/b.py.md)\n\n### Root\n- [main.py](code/main.py.md)\n\n"
        );
    }
}
