//! Cross-reference report and its renderings

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::plugins::extract::ExtractionResult;

const RULE_WIDTH: usize = 50;
const KEPT: &str = " - kept, not required";

/// Required versus implemented components
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CrossReferenceReport {
    pub required_processors: BTreeSet<String>,
    pub required_criteria: BTreeSet<String>,
    pub implemented_processors: BTreeSet<String>,
    pub implemented_criteria: BTreeSet<String>,
    pub missing_processors: BTreeSet<String>,
    pub missing_criteria: BTreeSet<String>,
    /// Implemented but never referenced; informational only
    pub extra_processors: BTreeSet<String>,
    pub extra_criteria: BTreeSet<String>,
    pub passed: bool,
}

impl CrossReferenceReport {
    /// Diff required names against implemented names
    pub fn compute(
        required: &ExtractionResult,
        implemented_processors: BTreeSet<String>,
        implemented_criteria: BTreeSet<String>,
    ) -> Self {
        let missing_processors = difference(&required.processors, &implemented_processors);
        let missing_criteria = difference(&required.criteria, &implemented_criteria);
        let extra_processors = difference(&implemented_processors, &required.processors);
        let extra_criteria = difference(&implemented_criteria, &required.criteria);
        let passed = missing_processors.is_empty() && missing_criteria.is_empty();

        Self {
            required_processors: required.processors.clone(),
            required_criteria: required.criteria.clone(),
            implemented_processors,
            implemented_criteria,
            missing_processors,
            missing_criteria,
            extra_processors,
            extra_criteria,
            passed,
        }
    }

    pub fn total_required(&self) -> usize {
        self.required_processors.len() + self.required_criteria.len()
    }

    pub fn total_missing(&self) -> usize {
        self.missing_processors.len() + self.missing_criteria.len()
    }

    pub fn has_extras(&self) -> bool {
        !self.extra_processors.is_empty() || !self.extra_criteria.is_empty()
    }

    /// Full report: counts, status, missing and extra lists, per-name marks
    pub fn render_detailed(&self) -> String {
        Detailed(self).to_string()
    }

    /// Short pass/fail message with totals, missing names and kept extras
    pub fn render_brief(&self) -> String {
        Brief(self).to_string()
    }

    fn write_detailed(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "WORKFLOW PROCESSOR VALIDATION REPORT")?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out)?;
        writeln!(out, "VALIDATION SUMMARY")?;
        writeln!(out, "• Workflow processors required: {}", self.required_processors.len())?;
        writeln!(out, "• Workflow criteria required: {}", self.required_criteria.len())?;
        writeln!(out, "• Processors implemented: {}", self.implemented_processors.len())?;
        writeln!(out, "• Criteria implemented: {}", self.implemented_criteria.len())?;
        writeln!(out, "• Missing processors: {}", self.missing_processors.len())?;
        writeln!(out, "• Missing criteria: {}", self.missing_criteria.len())?;
        writeln!(out, "• Total required: {}", self.total_required())?;
        writeln!(out, "• Total missing: {}", self.total_missing())?;
        writeln!(out)?;
        writeln!(
            out,
            "STATUS: {}",
            if self.passed {
                "VALIDATION PASSED"
            } else {
                "VALIDATION FAILED"
            }
        )?;

        section(out, "MISSING PROCESSORS", "", &self.missing_processors, "✗")?;
        section(out, "MISSING CRITERIA", "", &self.missing_criteria, "✗")?;
        section(out, "EXTRA PROCESSORS", KEPT, &self.extra_processors, "•")?;
        section(out, "EXTRA CRITERIA", KEPT, &self.extra_criteria, "•")?;

        for (heading, required, missing) in [
            ("ALL WORKFLOW PROCESSORS", &self.required_processors, &self.missing_processors),
            ("ALL WORKFLOW CRITERIA", &self.required_criteria, &self.missing_criteria),
        ] {
            if required.is_empty() {
                continue;
            }
            writeln!(out)?;
            writeln!(out, "{} ({})", heading, required.len())?;
            for name in required {
                let mark = if missing.contains(name) { "✗" } else { "✓" };
                writeln!(out, "  {} {}", mark, name)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "RECOMMENDATIONS")?;
        if self.passed {
            writeln!(out, "  • All workflow components are implemented.")?;
        } else {
            if !self.missing_processors.is_empty() {
                writeln!(
                    out,
                    "  • Implement the {} missing processor(s) listed above.",
                    self.missing_processors.len()
                )?;
            }
            if !self.missing_criteria.is_empty() {
                writeln!(
                    out,
                    "  • Implement the {} missing criteria listed above.",
                    self.missing_criteria.len()
                )?;
            }
        }
        if self.has_extras() {
            writeln!(
                out,
                "  • Extra components are kept; remove them only if they are truly unused."
            )?;
        }
        Ok(())
    }

    fn write_brief(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            writeln!(
                out,
                "Workflow implementation validation passed! All required processors and criteria are implemented."
            )?;
        } else {
            writeln!(out, "Workflow implementation validation failed:")?;
            if !self.missing_processors.is_empty() {
                writeln!(out, "• Missing processors: {}", join(&self.missing_processors))?;
            }
            if !self.missing_criteria.is_empty() {
                writeln!(out, "• Missing criteria: {}", join(&self.missing_criteria))?;
            }
        }
        writeln!(
            out,
            "Total required: {}, total missing: {}",
            self.total_required(),
            self.total_missing()
        )?;

        if self.has_extras() {
            writeln!(out)?;
            writeln!(out, "Additional components found{}:", KEPT)?;
            if !self.extra_processors.is_empty() {
                writeln!(
                    out,
                    "• Extra processors found (keeping them): {}",
                    join(&self.extra_processors)
                )?;
            }
            if !self.extra_criteria.is_empty() {
                writeln!(
                    out,
                    "• Extra criteria found (keeping them): {}",
                    join(&self.extra_criteria)
                )?;
            }
        }
        Ok(())
    }
}

struct Detailed<'a>(&'a CrossReferenceReport);

impl fmt::Display for Detailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_detailed(f)
    }
}

struct Brief<'a>(&'a CrossReferenceReport);

impl fmt::Display for Brief<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_brief(f)
    }
}

fn difference(left: &BTreeSet<String>, right: &BTreeSet<String>) -> BTreeSet<String> {
    left.difference(right).cloned().collect()
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn section(
    out: &mut fmt::Formatter<'_>,
    heading: &str,
    suffix: &str,
    names: &BTreeSet<String>,
    mark: &str,
) -> fmt::Result {
    if names.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{} ({}){}", heading, names.len(), suffix)?;
    for name in names {
        writeln!(out, "  {} {}", mark, name)?;
    }
    Ok(())
}
