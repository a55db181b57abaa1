//! Terminal rendering of conversion results.

use webpify_core::output::output_file_name;
use webpify_core::{format_savings, format_size, FileItem, FileState, SessionStats};

/// One line describing an item's outcome.
pub fn item_line(item: &FileItem) -> String {
    let name = item.source().name();
    match item.state() {
        FileState::Done(output) => {
            let saving = if output.saved_bytes() > 0 {
                format!(
                    "{}% smaller",
                    format_savings(output.original_size, output.converted_size)
                )
            } else {
                "no saving".to_string()
            };
            format!(
                "{} -> {}  {} -> {} ({})",
                name,
                output_file_name(name, output.format),
                format_size(output.original_size),
                format_size(output.converted_size),
                saving
            )
        }
        FileState::Error(failure) => format!("{}: {}", name, failure.reason),
        FileState::Pending | FileState::Converting => format!("{}: not converted", name),
    }
}

/// Totals across the session.
pub fn summary_line(stats: &SessionStats) -> String {
    let mut line = format!("{} of {} converted", stats.done, stats.total);
    if stats.failed > 0 {
        line.push_str(&format!(", {} failed", stats.failed));
    }
    if stats.pending > 0 {
        line.push_str(&format!(", {} not converted", stats.pending));
    }
    if stats.saved_bytes() > 0 {
        line.push_str(&format!(", saved {}", format_size(stats.saved_bytes() as u64)));
    }
    line
}
