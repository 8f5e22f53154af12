//! mdcheck is the analysis-and-fix engine of a markdown linter: it
//! interprets inline suppression directives, resolves weakly-typed rule
//! configuration, orchestrates an open set of pattern-detection rules,
//! and turns violations into position-safe, conflict-deduplicated
//! batches of text edits.
//!
//! ```
//! use mdcheck::analyze;
//!
//! let violations = analyze("# Title\n\nSome trailing spaces   \nhere\n");
//! assert!(violations.iter().any(|v| v.rule_id == "MD009"));
//! ```

pub mod analyzer;
pub mod document;
pub mod fix_engine;
pub mod rule;
pub mod rule_config;
pub mod rules;
pub mod settings;
pub mod suppression;

pub use analyzer::{Analyzer, CancelToken};
pub use document::{DocumentIndex, HeadingStyle, LineClassification};
pub use fix_engine::{Boundary, EditKind, FixBatch, FixBatchBuilder, FixError, FixPlan, TextEdit};
pub use rule::{Rule, RuleDescriptor, RuleError, RuleResult, Severity, Violation};
pub use rule_config::RuleConfiguration;
pub use rules::RuleRegistry;
pub use settings::{LayeredSettings, MemorySettings, SettingsProvider, SourceIdentity};
pub use suppression::{SuppressionMap, SuppressionProcessor};

use std::sync::Arc;

/// Analyze `content` with the built-in rules and no configured sources.
pub fn analyze(content: &str) -> Vec<Violation> {
    Analyzer::with_default_rules(Arc::new(MemorySettings::new())).analyze(
        content,
        None,
        &CancelToken::new(),
    )
}
