//!
//! MD009: Trailing spaces should be removed.
//!
//! `br_spaces` trailing spaces are tolerated as a hard line break; the
//! historical threshold is preserved: values below 2 disallow line-break
//! spaces entirely.

use crate::document::DocumentIndex;
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

const DEFAULT_BR_SPACES: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD009TrailingSpaces;

impl MD009TrailingSpaces {
    fn br_spaces(config: &RuleConfiguration) -> usize {
        let br = config.usize_value("br_spaces", DEFAULT_BR_SPACES);
        if br < 2 { 0 } else { br }
    }

    fn trailing_spaces(line: &str) -> usize {
        line.chars().rev().take_while(|&c| c == ' ').count()
    }

    /// Trailing spaces on `line` that are not an allowed line break.
    fn offending_spaces(doc: &DocumentIndex, config: &RuleConfiguration, line: usize) -> usize {
        let text = doc.line(line);
        let trailing = Self::trailing_spaces(text);
        if trailing == 0 {
            return 0;
        }
        let strict = config.bool_value("strict", false);
        if !strict && doc.in_code_block(line) {
            return 0;
        }
        let br = Self::br_spaces(config);
        // A final line followed by a newline still counts as having a
        // following line for line-break purposes.
        let is_last = line == doc.line_count() && !doc.content().ends_with('\n');
        if !strict && br > 0 && !is_last && trailing == br {
            return 0;
        }
        trailing
    }
}

impl Rule for MD009TrailingSpaces {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD009",
            alias: "no-trailing-spaces",
            description: "Trailing spaces should be removed",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md009.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let mut violations = Vec::new();
        for line in 1..=doc.line_count() {
            let trailing = Self::offending_spaces(doc, config, line);
            if trailing == 0 {
                continue;
            }
            let chars = doc.line(line).chars().count();
            violations.push(Violation {
                rule_id: "MD009",
                line,
                column_start: chars - trailing + 1,
                column_end: chars + 1,
                message: if trailing == 1 {
                    "Trailing space found".to_string()
                } else {
                    format!("{trailing} trailing spaces found")
                },
                severity: config.severity,
                fix_description: Some("Remove trailing spaces".to_string()),
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
        let trailing = Self::offending_spaces(doc, config, violation.line);
        if trailing == 0 {
            return None;
        }
        let text = doc.line(violation.line);
        let anchor = doc.line_offset(violation.line)? + text.len() - trailing;
        Some(FixPlan::Single(TextEdit::delete(anchor, trailing)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_with(content: &str, config: &RuleConfiguration) -> Vec<Violation> {
        let doc = DocumentIndex::new(content);
        MD009TrailingSpaces.check(&doc, config).unwrap()
    }

    fn check(content: &str) -> Vec<Violation> {
        check_with(content, &RuleConfiguration::with_defaults(Severity::Warning))
    }

    #[test]
    fn test_no_trailing_spaces() {
        assert!(check("line one\nline two\n").is_empty());
    }

    #[test]
    fn test_trailing_spaces_flagged_with_columns() {
        let violations = check("abc   \n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 1);
        assert_eq!(violations[0].column_start, 4);
        assert_eq!(violations[0].column_end, 7);
    }

    #[test]
    fn test_two_spaces_allowed_as_line_break() {
        assert!(check("hard break  \nnext line\n").is_empty());
        // One or three spaces are never a break.
        assert_eq!(check("one \nnext\n").len(), 1);
        assert_eq!(check("three   \nnext\n").len(), 1);
    }

    #[test]
    fn test_last_line_break_not_allowed() {
        assert_eq!(check("text  ").len(), 1);
    }

    #[test]
    fn test_br_spaces_below_two_behaves_as_zero() {
        let config = RuleConfiguration::resolve(Some("1"), None, Severity::Warning);
        // br_spaces of 1 disallows line-break spaces entirely, so even a
        // single trailing space is flagged.
        assert_eq!(check_with("one \nnext\n", &config).len(), 1);
        assert_eq!(check_with("two  \nnext\n", &config).len(), 1);
    }

    #[test]
    fn test_code_blocks_skipped_unless_strict() {
        let content = "```\ncode  \n```\n";
        assert!(check(content).is_empty());
        let mut params = indexmap::IndexMap::new();
        params.insert("strict".to_string(), "true".to_string());
        let config = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        assert_eq!(check_with(content, &config).len(), 1);
    }

    #[test]
    fn test_strict_flags_line_breaks_too() {
        let mut params = indexmap::IndexMap::new();
        params.insert("strict".to_string(), "true".to_string());
        let config = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        assert_eq!(check_with("break  \nnext\n", &config).len(), 1);
    }

    #[test]
    fn test_fix_deletes_trailing_spaces() {
        let content = "abc  \ndef   \n";
        let doc = DocumentIndex::new(content);
        let config = RuleConfiguration::with_defaults(Severity::Warning);
        let rule = MD009TrailingSpaces;
        let violations = rule.check(&doc, &config).unwrap();
        // The two-space run on line 1 is a valid break; the three-space
        // run on line 2 is not.
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 2);
        let plan = rule.fix(&doc, &config, &violations[0]).unwrap();
        let FixPlan::Single(edit) = plan else {
            panic!("expected single edit");
        };
        assert_eq!(edit.anchor, 9);
        assert_eq!(edit.length, 3);
    }

    #[test]
    fn test_fix_on_clean_line_is_none() {
        let doc = DocumentIndex::new("clean\n");
        let config = RuleConfiguration::with_defaults(Severity::Warning);
        let violation = Violation {
            rule_id: "MD009",
            line: 1,
            column_start: 1,
            column_end: 1,
            message: String::new(),
            severity: Severity::Warning,
            fix_description: None,
        };
        assert!(MD009TrailingSpaces.fix(&doc, &config, &violation).is_none());
    }
}
