//! Terminal colorization for command output
//!
//! Applies ANSI escape codes to reports and diagram text using crossterm.

use crossterm::style::{Color, Stylize};

/// Colorize a validation or extraction report
///
/// - Pass marks and PASSED status lines: Green
/// - Fail marks and FAILED status lines: Red
/// - Upper-case section headings: Cyan
/// - Everything else: Default (terminal color)
pub fn colorize_report(input: &str) -> String {
    let mut lines = Vec::new();
    for line in input.lines() {
        let is_status =
            line.starts_with("STATUS:") || line.starts_with("Workflow implementation validation");
        let colored = if is_status {
            if line.contains("PASSED") || line.contains("passed") {
                format!("{}", line.with(Color::Green).bold())
            } else {
                format!("{}", line.with(Color::Red).bold())
            }
        } else if is_heading(line) {
            format!("{}", line.with(Color::Cyan))
        } else {
            colorize_marks(line)
        };
        lines.push(colored);
    }
    finish(input, lines)
}

/// Colorize diagram text
///
/// - Arrows: Yellow
/// - `[*]` pseudo-states: Green
/// - `(manual)` markers: Magenta
pub fn colorize_diagram(input: &str) -> String {
    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            line.replace("-->", &format!("{}", "-->".with(Color::Yellow)))
                .replace("[*]", &format!("{}", "[*]".with(Color::Green)))
                .replace("(manual)", &format!("{}", "(manual)".with(Color::Magenta)))
        })
        .collect();
    finish(input, lines)
}

/// Colorize a warning line for stderr
pub fn colorize_warning(input: &str) -> String {
    format!("{}", input.with(Color::Yellow))
}

fn colorize_marks(line: &str) -> String {
    let mut result = String::with_capacity(line.len() * 2);
    for c in line.chars() {
        match c {
            '✓' => result.push_str(&format!("{}", c.to_string().with(Color::Green))),
            '✗' => result.push_str(&format!("{}", c.to_string().with(Color::Red))),
            _ => result.push(c),
        }
    }
    result
}

/// Lines such as `MISSING PROCESSORS (2)` or `VALIDATION SUMMARY`
fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    let title = trimmed.split(" (").next().unwrap_or(trimmed);
    let letters: Vec<char> = title.chars().filter(|c| c.is_alphabetic()).collect();
    !trimmed.starts_with('•')
        && !trimmed.starts_with('-')
        && letters.len() > 2
        && letters.iter().all(|c| c.is_uppercase())
}

fn finish(input: &str, lines: Vec<String>) -> String {
    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_report_marks() {
        let output = colorize_report("STATUS: VALIDATION FAILED\n  ✗ MissingProcessor\n  ✓ Present\n");
        assert!(output.contains("\x1b["));
        assert!(output.contains("MissingProcessor"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_headings() {
        assert!(is_heading("MISSING PROCESSORS (2)"));
        assert!(is_heading("EXTRA CRITERIA (1) - kept, not required"));
        assert!(!is_heading("• Missing processors: 1"));
        assert!(!is_heading("  - UserProcessor.java"));
    }

    #[test]
    fn test_colorize_diagram_keeps_text() {
        let output = colorize_diagram("a --> a : chat (manual) /agent");
        assert!(output.contains("chat"));
        assert!(output.contains("/agent"));
        assert!(!output.ends_with('\n'));
    }
}
