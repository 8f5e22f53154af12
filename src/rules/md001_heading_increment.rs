//!
//! MD001: Heading levels should only increment by one level at a time.

use crate::document::{DocumentIndex, HeadingStyle};
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD001HeadingIncrement;

impl MD001HeadingIncrement {
    /// (found, expected) levels for the heading at `line`, walking the
    /// document's heading sequence from the top.
    fn levels_at(doc: &DocumentIndex, line: usize) -> Option<(usize, usize)> {
        let mut previous: Option<usize> = None;
        for heading in doc.headings() {
            if heading.line == line {
                let expected = match previous {
                    Some(p) if heading.level > p + 1 => p + 1,
                    _ => heading.level,
                };
                return Some((heading.level, expected));
            }
            previous = Some(heading.level);
        }
        None
    }
}

impl Rule for MD001HeadingIncrement {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD001",
            alias: "heading-increment",
            description: "Heading levels should only increment by one level at a time",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md001.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let mut violations = Vec::new();
        let mut previous: Option<usize> = None;
        for heading in doc.headings() {
            if let Some(p) = previous
                && heading.level > p + 1
            {
                violations.push(Violation {
                    rule_id: "MD001",
                    line: heading.line,
                    column_start: heading.marker_column,
                    column_end: heading.marker_column + heading.level,
                    message: format!("Expected heading level {}, found level {}", p + 1, heading.level),
                    severity: config.severity,
                    fix_description: (heading.style == HeadingStyle::Atx)
                        .then(|| "Adjust heading level".to_string()),
                });
            }
            previous = Some(heading.level);
        }
        Ok(violations)
    }

    fn fix(
        &self,
        doc: &DocumentIndex,
        _config: &RuleConfiguration,
        violation: &Violation,
    ) -> Option<FixPlan> {
        let heading = doc.headings().iter().find(|h| h.line == violation.line)?;
        if heading.style != HeadingStyle::Atx {
            return None;
        }
        let (found, expected) = Self::levels_at(doc, violation.line)?;
        if found == expected {
            return None;
        }
        let anchor = doc.line_offset(violation.line)? + heading.marker_column - 1;
        Some(FixPlan::Single(TextEdit::replace(
            anchor,
            found,
            "#".repeat(expected),
        )))
    }
}
