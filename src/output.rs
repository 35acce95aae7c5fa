//! CLI output formatting.
//!
//! Pure formatting functions kept apart from pipeline logic, so tests can
//! assert on lines without capturing stdout.

use crate::pipeline::RunResult;

/// Format a completed run as display lines.
pub fn format_run_result(result: &RunResult) -> Vec<String> {
    let mut lines = vec![format!("Prompt: {}", result.prompt.text)];
    if let Some(url) = &result.prompt.provenance_url {
        lines.push(format!("Source: {url}"));
    }
    lines.push(format!("Identifier: {}", result.identifier));
    lines.push(format!(
        "Raw:       {}",
        result.artifacts.raw_image_path.display()
    ));
    lines.push(format!(
        "Annotated: {}",
        result.artifacts.overlaid_image_path.display()
    ));
    lines.push(format!(
        "Sidecar:   {}",
        result.artifacts.sidecar_text_path.display()
    ));
    lines.push(format!(
        "Alias:     {}",
        result.artifacts.latest_alias_path.display()
    ));
    lines
}

/// Print a completed run to stdout.
pub fn print_run_result(result: &RunResult) {
    for line in format_run_result(result) {
        println!("{line}");
    }
}
