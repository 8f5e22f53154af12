//!
//! MD012: No more than `maximum` consecutive blank lines.

use crate::document::DocumentIndex;
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

const DEFAULT_MAXIMUM: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD012MultipleBlanks;

impl MD012MultipleBlanks {
    fn counts_as_blank(doc: &DocumentIndex, line: usize) -> bool {
        doc.is_blank(line) && !doc.in_code_block(line) && !doc.in_front_matter(line)
    }

    /// Inclusive line range of the blank run containing `line`.
    fn run_around(doc: &DocumentIndex, line: usize) -> Option<(usize, usize)> {
        if !Self::counts_as_blank(doc, line) {
            return None;
        }
        let mut start = line;
        while start > 1 && Self::counts_as_blank(doc, start - 1) {
            start -= 1;
        }
        let mut end = line;
        while end < doc.line_count() && Self::counts_as_blank(doc, end + 1) {
            end += 1;
        }
        Some((start, end))
    }
}

impl Rule for MD012MultipleBlanks {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD012",
            alias: "no-multiple-blanks",
            description: "Multiple consecutive blank lines",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md012.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let maximum = config.usize_value("maximum", DEFAULT_MAXIMUM).max(1);
        let mut violations = Vec::new();
        let mut line = 1;
        while line <= doc.line_count() {
            let Some((start, end)) = Self::run_around(doc, line) else {
                line += 1;
                continue;
            };
            let run = end - start + 1;
            if run > maximum {
                violations.push(Violation {
                    rule_id: "MD012",
                    line: start + maximum,
                    column_start: 1,
                    column_end: 1,
                    message: format!("Multiple consecutive blank lines (found {run}; expected {maximum})"),
                    severity: config.severity,
                    fix_description: Some("Remove surplus blank lines".to_string()),
                });
            }
            line = end + 1;
        }
        Ok(violations)
    }

    fn fix(
        &self,
        doc: &DocumentIndex,
        config: &RuleConfiguration,
        violation: &Violation,
    ) -> Option<FixPlan> {
        let maximum = config.usize_value("maximum", DEFAULT_MAXIMUM).max(1);
        let (start, end) = Self::run_around(doc, violation.line)?;
        if end - start + 1 <= maximum {
            return None;
        }
        let anchor = doc.line_offset(start + maximum)?;
        let stop = doc
            .line_offset(end + 1)
            .unwrap_or(doc.content().len());
        Some(FixPlan::Single(TextEdit::delete(anchor, stop - anchor)))
    }
}
