//!
//! This module defines the Rule trait and the value types rules produce:
//! violations, severities, and the per-rule descriptor that forms the
//! authoritative catalog entry for each rule.

use dyn_clone::DynClone;
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentIndex;
use crate::fix_engine::FixPlan;
use crate::rule_config::RuleConfiguration;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Parsing error: {0}")]
    ParsingError(String),
}

pub type RuleResult = Result<Vec<Violation>, RuleError>;

/// Reporting level for a violation.
///
/// `None` is the disabled marker used by configuration strings such as
/// `"false:none"`; a rule resolved to `None` never runs. `Silent`
/// violations are produced and fixable but carry no reporting weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
    Silent,
    None,
}

impl Severity {
    /// Parse a severity keyword, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "suggestion" => Some(Severity::Suggestion),
            "silent" => Some(Severity::Silent),
            "none" => Some(Severity::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
            Severity::Silent => "silent",
            Severity::None => "none",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding produced by a rule.
///
/// Line and column values are 1-based and always refer to the original,
/// unmodified text the analysis pass ran against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub rule_id: &'static str,
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
    pub message: String,
    pub severity: Severity,
    /// Human-readable description of the available fix, if the violation
    /// is auto-fixable.
    pub fix_description: Option<String>,
}

impl Violation {
    pub fn is_fixable(&self) -> bool {
        self.fix_description.is_some()
    }
}

/// Catalog entry for a rule: stable id, registered alias, one-line
/// description, documentation reference, and default severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    pub id: &'static str,
    pub alias: &'static str,
    pub description: &'static str,
    pub doc_url: &'static str,
    pub default_severity: Severity,
}

/// Contract for a pattern-detection rule.
///
/// `check` must be a pure function of its inputs: no side effects, no
/// shared mutable state between invocations. `fix` derives the edit for
/// one violation from the document alone, so re-running it against text
/// that already satisfies the rule yields `None`.
pub trait Rule: DynClone + Send + Sync {
    fn descriptor(&self) -> RuleDescriptor;

    fn check(&self, doc: &DocumentIndex, config: &RuleConfiguration) -> RuleResult;

    fn fix(
        &self,
        _doc: &DocumentIndex,
        _config: &RuleConfiguration,
        _violation: &Violation,
    ) -> Option<FixPlan> {
        None
    }

    fn id(&self) -> &'static str {
        self.descriptor().id
    }
}

dyn_clone::clone_trait_object!(Rule);
