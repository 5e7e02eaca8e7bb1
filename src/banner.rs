//! Banner and separator rendering for launcher output.

use crate::manifest::WorkflowDescriptor;
use owo_colors::OwoColorize;

const WORDMARK: [&str; 3] = [
    "┌─┐┌┬┐┌─┐┬  ┬┬─┐┬ ┬┌┐┌",
    "├─┤│││├─┘│  │├┬┘│ ││││",
    "┴ ┴┴ ┴┴  ┴─┘┴┴└─└─┘┘└┘",
];

/// Render the pipeline banner: wordmark plus name and version line.
pub fn logo(descriptor: &WorkflowDescriptor, monochrome: bool) -> String {
    let mut out = String::from("\n");
    for line in WORDMARK {
        if monochrome {
            out.push_str(&format!("  {}\n", line));
        } else {
            out.push_str(&format!("  {}\n", line.cyan()));
        }
    }
    if monochrome {
        out.push_str(&format!(
            "  {} {}\n",
            descriptor.name,
            descriptor.version_string()
        ));
    } else {
        out.push_str(&format!(
            "  {} {}\n",
            descriptor.name.green().bold(),
            descriptor.version_string().dimmed()
        ));
    }
    out
}

/// Separator line printed after help and summary text.
pub fn dashed_line(monochrome: bool) -> String {
    let line = "-".repeat(70);
    if monochrome {
        line
    } else {
        format!("{}", line.dimmed())
    }
}
