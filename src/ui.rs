//! Terminal presentation: progress spinner and the end-of-run summary.

use crate::pipeline::RunSummary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Creates a ticking spinner showing `message`
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Spinner that draws nothing, for quiet runs and tests
pub fn hidden_spinner() -> ProgressBar {
    ProgressBar::hidden()
}

/// Prints the colored run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Documentation generated successfully".bright_green().bold());
    println!(
        "  {} {}",
        "Output:".bright_white().bold(),
        summary.output_dir.display()
    );
    println!(
        "  {} {} ({} workflows, {} output types, {} code files)",
        "Documents:".bright_white().bold(),
        summary.documents,
        summary.workflow_docs,
        summary.output_docs,
        summary.code_docs
    );
    println!(
        "  {} {}",
        "Files written:".bright_white().bold(),
        summary.files_written
    );
    if summary.mirrored {
        println!("  {}", "Copied into the repository docs/ folder".bright_blue());
    }
    if summary.warnings.is_empty() {
        println!("  {} 0", "Warnings:".bright_white().bold());
    } else {
        println!(
            "  {} {}",
            "Warnings:".bright_yellow().bold(),
            summary.warnings.len()
        );
        for warning in &summary.warnings {
            println!("    {} [{}] {}", "-".yellow(), warning.component, warning.message);
        }
    }
}

/// Prints a fatal error to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".bright_red().bold(), message);
}
