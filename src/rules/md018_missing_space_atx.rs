//!
//! MD018: No space after hash on ATX style heading.

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::DocumentIndex;
use crate::fix_engine::{FixPlan, TextEdit};
use crate::rule::{Rule, RuleDescriptor, RuleResult, Severity, Violation};
use crate::rule_config::RuleConfiguration;

lazy_static! {
    static ref MISSING_SPACE_ATX: Regex = Regex::new(r"^(\s{0,3})(#{1,6})([^#\s])").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MD018MissingSpaceAtx;

impl MD018MissingSpaceAtx {
    fn hash_run(doc: &DocumentIndex, line: usize) -> Option<(usize, usize)> {
        if doc.in_code_block(line) || doc.in_front_matter(line) {
            return None;
        }
        let caps = MISSING_SPACE_ATX.captures(doc.line(line))?;
        Some((caps[1].len(), caps[2].len()))
    }
}

impl Rule for MD018MissingSpaceAtx {
    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            id: "MD018",
            alias: "no-missing-space-atx",
            description: "No space after hash on atx style heading",
            doc_url: "https://github.com/DavidAnson/markdownlint/blob/main/doc/md018.md",
            default_severity: Severity::Warning,
        }
    }

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult {
        let mut violations = Vec::new();
        for line in 1..=doc.line_count() {
            let Some((indent, hashes)) = Self::hash_run(doc, line) else {
                continue;
            };
            violations.push(Violation {
                rule_id: "MD018",
                line,
                column_start: indent + 1,
                column_end: indent + hashes + 2,
                message: "No space after hash on atx style heading".to_string(),
                severity: config.severity,
                fix_description: Some("Insert space after hash".to_string()),
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
        let (indent, hashes) = Self::hash_run(doc, violation.line)?;
        let anchor = doc.line_offset(violation.line)? + indent + hashes;
        Some(FixPlan::Single(TextEdit::insert(anchor, " ")))
    }
}
