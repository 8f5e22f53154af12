//!
//! Per-rule configuration resolution.
//!
//! Raw configuration values are untyped strings of the form
//! `<value>[:<severity>]`, optionally overlaid with a named-parameter
//! map. The resolver turns one rule's raw sources into a typed
//! [`RuleConfiguration`]; typed getters fail closed to a caller-supplied
//! default instead of raising.

use indexmap::IndexMap;

use crate::rule::Severity;

/// Effective configuration for one rule in one analysis pass.
///
/// Rebuilt per rule per pass; never shared or mutated across rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfiguration {
    pub enabled: bool,
    pub severity: Severity,
    pub scalar_value: Option<String>,
    pub parameters: IndexMap<String, String>,
}

impl RuleConfiguration {
    /// Defaults for a rule with no configured sources.
    pub fn with_defaults(default_severity: Severity) -> Self {
        Self {
            enabled: true,
            severity: default_severity,
            scalar_value: None,
            parameters: IndexMap::new(),
        }
    }

    /// Resolve a raw value string and optional named parameters.
    ///
    /// Grammar: `<value>[:<severity>]` with severity in
    /// `{error, warning, suggestion, silent, none}` (case-insensitive).
    /// `none` disables the rule; the bare value `false` disables the rule
    /// regardless of any severity suffix.
    pub fn resolve(
        raw: Option<&str>,
        parameters: Option<&IndexMap<String, String>>,
        default_severity: Severity,
    ) -> Self {
        let mut config = Self::with_defaults(default_severity);
        if let Some(parameters) = parameters {
            config.parameters = parameters.clone();
        }
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return config;
        };
        let (value, suffix) = split_severity_suffix(raw);
        if let Some(severity) = suffix {
            config.severity = severity;
            if severity == Severity::None {
                config.enabled = false;
            }
        }
        if !value.is_empty() {
            if value.eq_ignore_ascii_case("false") {
                config.enabled = false;
            }
            config.scalar_value = Some(value.to_string());
        }
        config
    }

    /// Look up `key`: an explicit named parameter wins; the bare scalar
    /// value is the fallback when no named parameter exists. This lets a
    /// rule be configured either as `MD013: 120` or
    /// `MD013: {line_length: 120}`.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .map(String::as_str)
            .or(self.scalar_value.as_deref())
    }

    pub fn str_value(&self, key: &str, default: &str) -> String {
        self.value_of(key).unwrap_or(default).to_string()
    }

    pub fn int_value(&self, key: &str, default: i64) -> i64 {
        self.value_of(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn usize_value(&self, key: &str, default: usize) -> usize {
        self.value_of(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn bool_value(&self, key: &str, default: bool) -> bool {
        match self.value_of(key).map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }
}

/// Split a trailing `:<severity>` suffix off `raw`. Only the text after
/// the last colon is considered, so scalar values containing colons
/// survive unless they happen to end in a severity keyword.
fn split_severity_suffix(raw: &str) -> (&str, Option<Severity>) {
    if let Some(idx) = raw.rfind(':')
        && let Some(severity) = Severity::parse(&raw[idx + 1..])
    {
        return (raw[..idx].trim_end(), Some(severity));
    }
    (raw, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalar_with_severity_suffix() {
        let config = RuleConfiguration::resolve(Some("atx:error"), None, Severity::Warning);
        assert!(config.enabled);
        assert_eq!(config.severity, Severity::Error);
        assert_eq!(config.scalar_value.as_deref(), Some("atx"));
    }

    #[test]
    fn test_scalar_without_suffix_keeps_default_severity() {
        let config = RuleConfiguration::resolve(Some("120"), None, Severity::Warning);
        assert_eq!(config.severity, Severity::Warning);
        assert_eq!(config.scalar_value.as_deref(), Some("120"));
    }

    #[test]
    fn test_severity_none_disables() {
        let config = RuleConfiguration::resolve(Some("atx:none"), None, Severity::Warning);
        assert!(!config.enabled);
        assert_eq!(config.severity, Severity::None);
    }

    #[test]
    fn test_bare_false_disables_regardless_of_suffix() {
        let config = RuleConfiguration::resolve(Some("false:error"), None, Severity::Warning);
        assert!(!config.enabled);
        assert_eq!(config.severity, Severity::Error);

        let config = RuleConfiguration::resolve(Some("false"), None, Severity::Warning);
        assert!(!config.enabled);
    }

    #[test]
    fn test_severity_only_value() {
        let config = RuleConfiguration::resolve(Some(":suggestion"), None, Severity::Warning);
        assert!(config.enabled);
        assert_eq!(config.severity, Severity::Suggestion);
        assert_eq!(config.scalar_value, None);
    }

    #[test]
    fn test_value_containing_colon_survives() {
        let config = RuleConfiguration::resolve(Some("a:b"), None, Severity::Warning);
        assert_eq!(config.scalar_value.as_deref(), Some("a:b"));
        assert_eq!(config.severity, Severity::Warning);
    }

    #[test]
    fn test_absent_value_yields_defaults() {
        let config = RuleConfiguration::resolve(None, None, Severity::Suggestion);
        assert!(config.enabled);
        assert_eq!(config.severity, Severity::Suggestion);
        assert_eq!(config.scalar_value, None);
        assert!(config.parameters.is_empty());
    }

    #[test]
    fn test_named_parameter_beats_scalar() {
        let mut params = IndexMap::new();
        params.insert("line_length".to_string(), "100".to_string());
        let config = RuleConfiguration::resolve(Some("120"), Some(&params), Severity::Warning);
        assert_eq!(config.int_value("line_length", 80), 100);
    }

    #[test]
    fn test_scalar_is_fallback_for_any_key() {
        let config = RuleConfiguration::resolve(Some("120"), None, Severity::Warning);
        assert_eq!(config.int_value("line_length", 80), 120);
        assert_eq!(config.int_value("anything", 7), 120);
    }

    #[test]
    fn test_typed_getters_fail_closed() {
        let config = RuleConfiguration::resolve(Some("not-a-number"), None, Severity::Warning);
        assert_eq!(config.int_value("line_length", 80), 80);
        assert_eq!(config.usize_value("line_length", 80), 80);
        assert!(config.bool_value("strict", true));
        assert!(!config.bool_value("strict", false));
    }

    #[test]
    fn test_bool_getter_parses_case_insensitively() {
        let mut params = IndexMap::new();
        params.insert("strict".to_string(), "TRUE".to_string());
        let config = RuleConfiguration::resolve(None, Some(&params), Severity::Warning);
        assert!(config.bool_value("strict", false));
    }

    #[test]
    fn test_severity_suffix_case_insensitive() {
        let config = RuleConfiguration::resolve(Some("atx:ERROR"), None, Severity::Warning);
        assert_eq!(config.severity, Severity::Error);
    }
}
