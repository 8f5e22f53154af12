//!
//! MD032: Lists should be surrounded by blank lines.

use crate::document::{DocumentIndex, ListBlockInfo};
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD032BlanksAroundLists;

impl MD032BlanksAroundLists {
    fn missing_sides(doc: &DocumentIndex, block: &ListBlockInfo) -> (bool, bool) {
        let missing_above = block.start_line > 1
            && !doc.is_blank(block.start_line - 1)
            && !doc.in_front_matter(block.start_line - 1);
        let missing_below =
            block.end_line < doc.line_count() && !doc.is_blank(block.end_line + 1);
        (missing_above, missing_below)
    }
}

impl Rule for MD032BlanksAroundLists {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD032",
            alias: "blanks-around-lists",
            description: "Lists should be surrounded by blank lines",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md032.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let mut violations = Vec::new();
        for block in doc.list_blocks() {
            let (missing_above, missing_below) = Self::missing_sides(doc, block);
            if !missing_above && !missing_below {
                continue;
            }
            let line = if missing_above {
                block.start_line
            } else {
                block.end_line
            };
            violations.push(Violation {
                rule_id: "MD032",
                line,
                column_start: 1,
                column_end: doc.line(line).chars().count() + 1,
                message: "Lists should be surrounded by blank lines".to_string(),
                severity: config.severity,
                fix_description: Some("Insert blank lines around list".to_string()),
            });
        }
        Ok(violations)
    }

    fn fix(
        &self,
        doc: &DocumentIndex,
        _config: &RuleConfiguration,
        violation: &Violation,
    ) -> Option<FixPlan> {
        let block = doc
            .list_blocks()
            .iter()
            .find(|b| b.start_line == violation.line || b.end_line == violation.line)?;
        let (missing_above, missing_below) = Self::missing_sides(doc, block);
        let above = missing_above
            .then(|| TextEdit::insert_blank_lines_before(doc, block.start_line, 1));
        let below = missing_below
            .then(|| TextEdit::insert_blank_lines_before(doc, block.end_line + 1, 1));
        match (above, below) {
            (Some(above), Some(below)) => Some(FixPlan::Surround { above, below }),
            (Some(edit), None) | (None, Some(edit)) => Some(FixPlan::Single(edit)),
            (None, None) => None,
        }
    }
}
