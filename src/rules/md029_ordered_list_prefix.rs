//!
//! MD029: Ordered list item prefix.
//!
//! Styles: `one` (all 1), `zero` (all 0), `ordered` (incrementing), and
//! the default `one_or_ordered`, which auto-detects per list. The
//! historical detection threshold is preserved: a list reads as ordered
//! exactly when its second item's ordinal is the first's plus one.

use crate::document::{DocumentIndex, ListBlockInfo};
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListStyle {
    One,
    Zero,
    Ordered,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MD029OrderedListPrefix;

impl MD029OrderedListPrefix {
    fn resolve_style(config: &RuleConfiguration, block: &ListBlockInfo) -> ListStyle {
        match config.str_value("style", "one_or_ordered").as_str() {
            "one" => ListStyle::One,
            "zero" => ListStyle::Zero,
            "ordered" => ListStyle::Ordered,
            _ => {
                let first = block.items.first().and_then(|i| i.ordinal);
                let second = block.items.get(1).and_then(|i| i.ordinal);
                match (first, second) {
                    (Some(f), Some(s)) if s == f + 1 => ListStyle::Ordered,
                    _ => ListStyle::One,
                }
            }
        }
    }

    fn expected_ordinal(style: ListStyle, block: &ListBlockInfo, index: usize) -> u64 {
        match style {
            ListStyle::One => 1,
            ListStyle::Zero => 0,
            ListStyle::Ordered => {
                // Ordered lists may start at 0 or 1; anything else
                // renumbers from 1.
                let start = match block.items.first().and_then(|i| i.ordinal) {
                    Some(o @ (0 | 1)) => o,
                    _ => 1,
                };
                start + index as u64
            }
        }
    }
}

impl Rule for MD029OrderedListPrefix {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD029",
            alias: "ol-prefix",
            description: "Ordered list item prefix",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md029.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let mut violations = Vec::new();
        for block in doc.list_blocks() {
            if !block.ordered {
                continue;
            }
            let style = Self::resolve_style(config, block);
            for (index, item) in block.items.iter().enumerate() {
                let Some(ordinal) = item.ordinal else {
                    continue;
                };
                let expected = Self::expected_ordinal(style, block, index);
                if ordinal != expected {
                    violations.push(Violation {
                        rule_id: "MD029",
                        line: item.line,
                        column_start: item.marker_column,
                        column_end: item.marker_column + item.marker_len,
                        message: format!(
                            "Ordered list item prefix [Expected: {expected}; Actual: {ordinal}]"
                        ),
                        severity: config.severity,
                        fix_description: Some("Renumber list item".to_string()),
                    });
                }
            }
        }
        Ok(violations)
    }

    fn fix(
        &self,
        doc: &DocumentIndex,
        config: &RuleConfiguration,
        violation: &Violation,
    ) -> Option<FixPlan> {
        let block = doc
            .list_blocks()
            .iter()
            .find(|b| b.ordered && b.items.iter().any(|i| i.line == violation.line))?;
        let (index, item) = block
            .items
            .iter()
            .enumerate()
            .find(|(_, i)| i.line == violation.line)?;
        let ordinal = item.ordinal?;
        let style = Self::resolve_style(config, block);
        let expected = Self::expected_ordinal(style, block, index);
        if ordinal == expected {
            return None;
        }
        let anchor = doc.line_offset(item.line)? + item.marker_column - 1;
        let digits = item.marker_len - 1;
        Some(FixPlan::Single(TextEdit::replace(
            anchor,
            digits,
            expected.to_string(),
        )))
    }
}
