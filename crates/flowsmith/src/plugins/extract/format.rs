//! Text renderings of an extraction result

use std::fmt::{self, Write};
use std::str::FromStr;

use super::extractor::ExtractionResult;

const RULE_WIDTH: usize = 50;

/// Report layout for [`ExtractionResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Bare bullet lists under two headings
    #[default]
    List,
    /// Totals followed by the lists
    Summary,
    /// Totals plus the implementation file each component needs
    Detailed,
}

impl OutputFormat {
    pub fn variants() -> &'static [&'static str] {
        &["list", "summary", "detailed"]
    }

    /// Render a result; `extension` names implementation files in the detailed layout
    pub fn render(&self, result: &ExtractionResult, extension: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = match self {
            OutputFormat::List => write_list(&mut out, result),
            OutputFormat::Summary => write_summary(&mut out, result),
            OutputFormat::Detailed => write_detailed(&mut out, result, extension),
        };
        out
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(OutputFormat::List),
            "summary" => Ok(OutputFormat::Summary),
            "detailed" => Ok(OutputFormat::Detailed),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats are: {}",
                s,
                Self::variants().join(", ")
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::List => write!(f, "list"),
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Detailed => write!(f, "detailed"),
        }
    }
}

fn write_names<'a>(
    out: &mut String,
    names: impl IntoIterator<Item = &'a String>,
) -> fmt::Result {
    for name in names {
        writeln!(out, "- {}", name)?;
    }
    Ok(())
}

fn write_list(out: &mut String, result: &ExtractionResult) -> fmt::Result {
    writeln!(out, "**PROCESSORS:**")?;
    write_names(out, &result.processors)?;
    writeln!(out)?;
    writeln!(out, "**CRITERIA:**")?;
    write_names(out, &result.criteria)
}

fn write_summary(out: &mut String, result: &ExtractionResult) -> fmt::Result {
    writeln!(out, "WORKFLOW COMPONENT EXTRACTION SUMMARY")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    writeln!(out, "• Total Processors Required: {}", result.processors.len())?;
    writeln!(out, "• Total Criteria Required: {}", result.criteria.len())?;
    writeln!(out)?;
    write_list(out, result)
}

fn write_detailed(out: &mut String, result: &ExtractionResult, extension: &str) -> fmt::Result {
    let extension = extension.trim_start_matches('.');
    writeln!(out, "WORKFLOW COMPONENT EXTRACTION ANALYSIS")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    writeln!(out, "EXTRACTION SUMMARY")?;
    writeln!(out, "• Documents scanned: {}", result.documents)?;
    writeln!(out, "• Processors identified: {}", result.processors.len())?;
    writeln!(out, "• Criteria identified: {}", result.criteria.len())?;
    writeln!(out, "• Total components to generate: {}", result.component_count())?;

    for (heading, names) in [
        ("PROCESSORS TO GENERATE", &result.processors),
        ("CRITERIA TO GENERATE", &result.criteria),
    ] {
        if names.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{} ({})", heading, names.len())?;
        for name in names {
            writeln!(out, "  - {}.{}", name, extension)?;
        }
    }

    if !result.skipped.is_empty() {
        writeln!(out)?;
        writeln!(out, "SKIPPED FILES ({})", result.skipped.len())?;
        for path in &result.skipped {
            writeln!(out, "  - {}", path.display())?;
        }
    }
    Ok(())
}
