//!
//! MD010: Hard tabs should be replaced with spaces.

use crate::document::DocumentIndex;
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

const DEFAULT_SPACES_PER_TAB: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD010HardTabs;

impl MD010HardTabs {
    fn line_applies(doc: &DocumentIndex, config: &RuleConfiguration, line: usize) -> bool {
        let code_blocks = config.bool_value("code_blocks", true);
        (code_blocks || !doc.in_code_block(line)) && doc.line(line).contains('\t')
    }
}

impl Rule for MD010HardTabs {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD010",
            alias: "no-hard-tabs",
            description: "Hard tabs should be replaced with spaces",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md010.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let mut violations = Vec::new();
        for line in 1..=doc.line_count() {
            if !Self::line_applies(doc, config, line) {
                continue;
            }
            let text = doc.line(line);
            let tab_count = text.matches('\t').count();
            let first = text.chars().position(|c| c == '\t').unwrap_or(0);
            violations.push(Violation {
                rule_id: "MD010",
                line,
                column_start: first + 1,
                column_end: first + 2,
                message: if tab_count == 1 {
                    "Hard tab found".to_string()
                } else {
                    format!("{tab_count} hard tabs found")
                },
                severity: config.severity,
                fix_description: Some("Replace hard tabs with spaces".to_string()),
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
        if !Self::line_applies(doc, config, violation.line) {
            return None;
        }
        let spaces = config.usize_value("spaces_per_tab", DEFAULT_SPACES_PER_TAB);
        let text = doc.line(violation.line);
        let anchor = doc.line_offset(violation.line)?;
        Some(FixPlan::Single(TextEdit::replace(
            anchor,
            text.len(),
            text.replace('\t', &" ".repeat(spaces.max(1))),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(content: &str) -> Vec<Violation> {
        let doc = DocumentIndex::new(content);
        let config = RuleConfiguration::with_defaults(Severity::Warning);
        MD010HardTabs.check(&doc, &config).unwrap()
    }

    #[test]
    fn test_no_tabs() {
        assert!(check("    indented with spaces\n").is_empty());
    }

    #[test]
    fn test_tab_flagged_at_column() {
        let violations = check("a\tb\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column_start, 2);
        assert_eq!(violations[0].message, "Hard tab found");
    }

    #[test]
    fn test_multiple_tabs_single_violation_per_line() {
        let violations = check("\ta\tb\n\tc\n");
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].message, "2 hard tabs found");
    }

    #[test]
    fn test_code_blocks_excluded_when_configured() {
        let content = "```\n\tindented\n```\n";
        assert_eq!(check(content).len(), 1);
        let mut params = indexmap::IndexMap::new();
        params.insert("code_blocks".to_string(), "false".to_string());
        let config = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        let doc = DocumentIndex::new(content);
        assert!(MD010HardTabs.check(&doc, &config).unwrap().is_empty());
    }

    #[test]
    fn test_fix_replaces_tabs() {
        let content = "a\tb\tc\n";
        let doc = DocumentIndex::new(content);
        let mut params = indexmap::IndexMap::new();
        params.insert("spaces_per_tab".to_string(), "4".to_string());
        let config = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        let rule = MD010HardTabs;
        let violations = rule.check(&doc, &config).unwrap();
        let FixPlan::Single(edit) = rule.fix(&doc, &config, &violations[0]).unwrap() else {
            panic!("expected single edit");
        };
        assert_eq!(edit.new_text, "a    b    c");
    }
}
