//!
//! MD047: Files should end with a single newline character.

use crate::document::DocumentIndex;
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

#[derive(Debug, Clone, Copy, Default)]
pub struct MD047TrailingNewline;

impl MD047TrailingNewline {
    /// Number of trailing line terminators (`\n` or `\r\n`) and the byte
    /// offset where the run starts.
    fn trailing_newlines(content: &str) -> (usize, usize) {
        let bytes = content.as_bytes();
        let mut i = bytes.len();
        let mut count = 0;
        while i > 0 && bytes[i - 1] == b'\n' {
            i -= 1;
            if i > 0 && bytes[i - 1] == b'\r' {
                i -= 1;
            }
            count += 1;
        }
        (count, i)
    }
}

impl Rule for MD047TrailingNewline {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD047",
            alias: "single-trailing-newline",
            description: "Files should end with a single newline character",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md047.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let content = doc.content();
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let (count, _) = Self::trailing_newlines(content);
        if count == 1 {
            return Ok(Vec::new());
        }
        let line = doc.line_count().max(1);
        let column = doc.line(line).chars().count() + 1;
        Ok(vec![Violation {
            rule_id: "MD047",
            line,
            column_start: column,
            column_end: column,
            message: "Files should end with a single newline character".to_string(),
            severity: config.severity,
            fix_description: Some("Normalize trailing newline".to_string()),
        }])
    }

    fn fix(
        &self,
        doc: &DocumentIndex,
        _config: &RuleConfiguration,
        _violation: &Violation,
    ) -> Option<FixPlan> {
        let content = doc.content();
        if content.is_empty() {
            return None;
        }
        let (count, run_start) = Self::trailing_newlines(content);
        match count {
            0 => Some(FixPlan::Single(TextEdit::insert(content.len(), "\n"))),
            1 => None,
            _ => {
                // Keep the first terminator of the run, drop the rest.
                let keep = if content.as_bytes()[run_start] == b'\r' { 2 } else { 1 };
                let anchor = run_start + keep;
                Some(FixPlan::Single(TextEdit::delete(
                    anchor,
                    content.len() - anchor,
                )))
            }
        }
    }
}
