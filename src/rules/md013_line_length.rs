//!
//! MD013: Line length.
//!
//! Measures display width rather than byte length so wide characters
//! count the way they render.

use unicode_width::UnicodeWidthStr;

use crate::document::DocumentIndex;
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

const DEFAULT_LINE_LENGTH: usize = 80;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD013LineLength;

impl Rule for MD013LineLength {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD013",
            alias: "line-length",
            description: "Line length",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md013.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let limit = config.usize_value("line_length", DEFAULT_LINE_LENGTH);
        let include_code = config.bool_value("code_blocks", true);
        let include_headings = config.bool_value("headings", true);
        let heading_lines: std::collections::HashSet<usize> = doc
            .headings()
            .iter()
            .flat_map(|h| h.line..=h.end_line)
            .collect();

        let mut violations = Vec::new();
        for line in 1..=doc.line_count() {
            if doc.in_front_matter(line) {
                continue;
            }
            if !include_code && doc.in_code_block(line) {
                continue;
            }
            if !include_headings && heading_lines.contains(&line) {
                continue;
            }
            let width = doc.line(line).width();
            if width > limit {
                violations.push(Violation {
                    rule_id: "MD013",
                    line,
                    column_start: limit + 1,
                    column_end: width + 1,
                    message: format!("Line length [Expected: {limit}; Actual: {width}]"),
                    severity: config.severity,
                    fix_description: None,
                });
            }
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_with(content: &str, config: &RuleConfiguration) -> Vec<Violation> {
        let doc = DocumentIndex::new(content);
        MD013LineLength.check(&doc, config).unwrap()
    }

    fn check(content: &str) -> Vec<Violation> {
        check_with(content, &RuleConfiguration::with_defaults(Severity::Warning))
    }

    #[test]
    fn test_short_lines_pass() {
        assert!(check("short\nlines\n").is_empty());
    }

    #[test]
    fn test_long_line_flagged() {
        let long = "x".repeat(95);
        let violations = check(&long);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column_start, 81);
        assert_eq!(violations[0].column_end, 96);
        assert_eq!(violations[0].message, "Line length [Expected: 80; Actual: 95]");
    }

    #[test]
    fn test_scalar_and_named_configuration_agree() {
        let long = "x".repeat(100);
        // MD013: 120
        let scalar = RuleConfiguration::resolve(Some("120"), None, Severity::Warning);
        assert!(check_with(&long, &scalar).is_empty());
        // MD013: {line_length: 120}
        let mut params = indexmap::IndexMap::new();
        params.insert("line_length".to_string(), "120".to_string());
        let named = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        assert!(check_with(&long, &named).is_empty());
    }

    #[test]
    fn test_code_blocks_excluded_when_configured() {
        let long = "x".repeat(95);
        let content = format!("```\n{long}\n```\n");
        assert_eq!(check(&content).len(), 1);
        let mut params = indexmap::IndexMap::new();
        params.insert("code_blocks".to_string(), "false".to_string());
        let config = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        assert!(check_with(&content, &config).is_empty());
    }

    #[test]
    fn test_headings_excluded_when_configured() {
        let content = format!("# {}\n", "x".repeat(95));
        assert_eq!(check(&content).len(), 1);
        let mut params = indexmap::IndexMap::new();
        params.insert("headings".to_string(), "false".to_string());
        let config = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        assert!(check_with(&content, &config).is_empty());
    }
}
