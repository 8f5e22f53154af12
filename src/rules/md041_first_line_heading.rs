//!
//! MD041: First line in a file should be a top-level heading.

use crate::document::DocumentIndex;
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

const DEFAULT_LEVEL: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD041FirstLineHeading;

impl MD041FirstLineHeading {
    /// First line carrying document content: blank lines, front matter,
    /// and comment-only lines don't count.
    fn first_content_line(doc: &DocumentIndex) -> Option<usize> {
        (1..=doc.line_count()).find(|&n| {
            if doc.is_blank(n) || doc.in_front_matter(n) {
                return false;
            }
            let trimmed = doc.line(n).trim();
            !(trimmed.starts_with("<!--") && trimmed.ends_with("-->"))
        })
    }
}

impl Rule for MD041FirstLineHeading {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD041",
            alias: "first-line-heading",
            description: "First line in a file should be a top-level heading",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md041.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let level = config.usize_value("level", DEFAULT_LEVEL);
        let Some(line) = Self::first_content_line(doc) else {
            return Ok(Vec::new());
        };
        let is_expected_heading = doc
            .headings()
            .iter()
            .any(|h| h.line == line && h.level == level);
        if is_expected_heading {
            return Ok(Vec::new());
        }
        Ok(vec![Violation {
            rule_id: "MD041",
            line,
            column_start: 1,
            column_end: doc.line(line).chars().count() + 1,
            message: "First line in a file should be a top-level heading".to_string(),
            severity: config.severity,
            fix_description: None,
        }])
    }
}
