//!
//! Rule execution orchestration.
//!
//! An [`Analyzer`] is an explicitly constructed object owned by the
//! caller; there is no process-wide singleton. One `analyze` call is
//! stateless and safe to run on a worker thread: it builds the document
//! index and suppression map, runs each enabled rule in isolation,
//! filters the results through the suppression decisions, and returns a
//! deterministically ordered violation list. The configuration
//! resolution cache is the only long-lived state and is purely a
//! performance optimization; clearing it never changes results.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::document::DocumentIndex;
use crate::fix_engine::{FixBatch, FixBatchBuilder, FixError, TextEdit};
use crate::rule::{Rule, Violation};
use crate::rule_config::RuleConfiguration;
use crate::rules::RuleRegistry;
use crate::settings::{SettingsProvider, SourceIdentity};

/// Cooperative cancellation handle. Cancellation is checked between rule
/// invocations; a cancelled pass may finish the currently running rule
/// before stopping.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct Analyzer {
    registry: RuleRegistry,
    settings: Arc<dyn SettingsProvider>,
    config_cache: Mutex<HashMap<(SourceIdentity, &'static str), RuleConfiguration>>,
}

impl Analyzer {
    pub fn new(registry: RuleRegistry, settings: Arc<dyn SettingsProvider>) -> Self {
        Self {
            registry,
            settings,
            config_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_rules(settings: Arc<dyn SettingsProvider>) -> Self {
        Self::new(RuleRegistry::with_default_rules(), settings)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Drop all cached configuration resolutions. Must be called when a
    /// configuration source changes in place without changing identity.
    pub fn clear_config_cache(&self) {
        if let Ok(mut cache) = self.config_cache.lock() {
            log::debug!("clearing {} cached rule configurations", cache.len());
            cache.clear();
        }
    }

    /// Resolve the effective configuration for `rule`, cached by
    /// configuration-source identity.
    pub fn configuration_for(&self, rule: &dyn Rule) -> RuleConfiguration {
        let descriptor = rule.descriptor();
        let key = (self.settings.identity(), descriptor.id);
        if let Ok(cache) = self.config_cache.lock()
            && let Some(config) = cache.get(&key)
        {
            return config.clone();
        }
        let raw = self.settings.rule_value(descriptor.id);
        let parameters = self.settings.rule_parameters(descriptor.id);
        let config = RuleConfiguration::resolve(
            raw.as_deref(),
            parameters.as_ref(),
            descriptor.default_severity,
        );
        if let Ok(mut cache) = self.config_cache.lock() {
            cache.insert(key, config.clone());
        }
        config
    }

    /// Analysis entry point: ordered violations for `text`.
    pub fn analyze(&self, text: &str, source: Option<&Path>, cancel: &CancelToken) -> Vec<Violation> {
        if let Some(path) = source {
            log::debug!("analyzing {}", path.display());
        }
        let doc = DocumentIndex::new(text);
        self.analyze_document(&doc, cancel)
    }

    /// Run all enabled rules against an already-built index.
    pub fn analyze_document(&self, doc: &DocumentIndex, cancel: &CancelToken) -> Vec<Violation> {
        let suppression =
            crate::suppression::SuppressionProcessor::new(self.registry.alias_table()).process(doc);

        let mut violations = Vec::new();
        for rule in self.registry.rules() {
            if cancel.is_cancelled() {
                log::debug!("analysis cancelled");
                break;
            }
            let config = self.configuration_for(rule.as_ref());
            if !config.enabled {
                continue;
            }
            // One broken rule must not blind the rest of the pass.
            let id = rule.descriptor().id;
            match catch_unwind(AssertUnwindSafe(|| rule.check(doc, &config))) {
                Ok(Ok(found)) => {
                    violations.extend(
                        found
                            .into_iter()
                            .filter(|v| !suppression.is_suppressed(v.line, v.rule_id)),
                    );
                }
                Ok(Err(error)) => {
                    log::warn!("rule {id} failed: {error}");
                }
                Err(_) => {
                    log::warn!("rule {id} panicked; contributing no violations");
                }
            }
        }

        violations.sort_by(|a, b| {
            (a.line, a.column_start, a.rule_id).cmp(&(b.line, b.column_start, b.rule_id))
        });
        violations
    }

    /// Fix contract for a lone violation: the edit a host would apply.
    pub fn fix_violation(&self, doc: &DocumentIndex, violation: &Violation) -> Option<TextEdit> {
        let rule = self.registry.by_id(violation.rule_id)?;
        let config = self.configuration_for(rule);
        rule.fix(doc, &config, violation)
            .map(|plan| plan.primary_edit().clone())
    }

    /// Build one conflict-free, boundary-deduplicated batch for the given
    /// violation subset.
    pub fn build_fix_batch(&self, doc: &DocumentIndex, violations: &[Violation]) -> FixBatch {
        let mut builder = FixBatchBuilder::new();
        for violation in violations {
            let Some(rule) = self.registry.by_id(violation.rule_id) else {
                continue;
            };
            let config = self.configuration_for(rule);
            if let Some(plan) = rule.fix(doc, &config, violation) {
                builder.push_plan(plan);
            }
        }
        builder.build(doc.content().len())
    }

    /// Apply fixes for `violations` against `text` as one transaction.
    pub fn apply_fixes(&self, text: &str, violations: &[Violation]) -> Result<String, FixError> {
        let doc = DocumentIndex::new(text);
        let batch = self.build_fix_batch(&doc, violations);
        batch.apply_to(text)
    }

    /// Analyze and fix in one call: all auto-fixable violations, or only
    /// those of `rule_filter` when given.
    pub fn fix_all(&self, text: &str, rule_filter: Option<&str>) -> Result<String, FixError> {
        let violations: Vec<Violation> = self
            .analyze(text, None, &CancelToken::new())
            .into_iter()
            .filter(|v| v.is_fixable())
            .filter(|v| rule_filter.is_none_or(|id| v.rule_id.eq_ignore_ascii_case(id)))
            .collect();
        self.apply_fixes(text, &violations)
    }
}
