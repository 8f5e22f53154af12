//!
//! MD022: Headings should be surrounded by blank lines.

use crate::document::{DocumentIndex, HeadingInfo};
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

const DEFAULT_LINES: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD022BlanksAroundHeadings;

impl MD022BlanksAroundHeadings {
    fn blanks_above(doc: &DocumentIndex, line: usize) -> usize {
        let mut count = 0;
        let mut n = line;
        while n > 1 && doc.is_blank(n - 1) {
            count += 1;
            n -= 1;
        }
        count
    }

    fn blanks_below(doc: &DocumentIndex, line: usize) -> usize {
        let mut count = 0;
        let mut n = line;
        while n < doc.line_count() && doc.is_blank(n + 1) {
            count += 1;
            n += 1;
        }
        count
    }

    /// Blank lines still needed (above, below) for `heading`. A document
    /// edge or front matter boundary satisfies the requirement.
    fn missing_sides(
        doc: &DocumentIndex,
        config: &RuleConfiguration,
        heading: &HeadingInfo,
    ) -> (usize, usize) {
        let lines_above = config.usize_value("lines_above", DEFAULT_LINES);
        let lines_below = config.usize_value("lines_below", DEFAULT_LINES);
        let missing_above = if heading.line == 1 || doc.in_front_matter(heading.line - 1) {
            0
        } else {
            lines_above.saturating_sub(Self::blanks_above(doc, heading.line))
        };
        let missing_below = if heading.end_line >= doc.line_count() {
            0
        } else {
            lines_below.saturating_sub(Self::blanks_below(doc, heading.end_line))
        };
        (missing_above, missing_below)
    }
}

impl Rule for MD022BlanksAroundHeadings {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD022",
            alias: "blanks-around-headings",
            description: "Headings should be surrounded by blank lines",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md022.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let mut violations = Vec::new();
        for heading in doc.headings() {
            let (missing_above, missing_below) = Self::missing_sides(doc, config, heading);
            if missing_above == 0 && missing_below == 0 {
                continue;
            }
            violations.push(Violation {
                rule_id: "MD022",
                line: heading.line,
                column_start: heading.marker_column,
                column_end: heading.marker_column + doc.line(heading.line).chars().count(),
                message: "Headings should be surrounded by blank lines".to_string(),
                severity: config.severity,
                fix_description: Some("Insert blank lines around heading".to_string()),
            });
        }
        Ok(violations)
    }

    fn fix(
        &self,
        doc: &DocumentIndex,
        config: &RuleConfiguration,
        violation: &Violation,
    ) -> Option<FixPlan> {
        let heading = doc.headings().iter().find(|h| h.line == violation.line)?;
        let (missing_above, missing_below) = Self::missing_sides(doc, config, heading);
        let above = (missing_above > 0)
            .then(|| TextEdit::insert_blank_lines_before(doc, heading.line, missing_above));
        let below = (missing_below > 0)
            .then(|| TextEdit::insert_blank_lines_before(doc, heading.end_line + 1, missing_below));
        match (above, below) {
            (Some(above), Some(below)) => Some(FixPlan::Surround { above, below }),
            (Some(edit), None) | (None, Some(edit)) => Some(FixPlan::Single(edit)),
            (None, None) => None,
        }
    }
}
