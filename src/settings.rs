//!
//! Configuration-source collaborator contract.
//!
//! Discovery and loading of per-directory configuration files is out of
//! scope; a [`SettingsProvider`] simply hands out raw string values and
//! named-parameter maps per rule id, plus a stable [`SourceIdentity`]
//! the orchestrator can key its resolution cache on.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Identity of a configuration source: origin plus content version.
/// Two equal identities promise the same raw values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceIdentity {
    pub origin: String,
    pub version: u64,
}

impl SourceIdentity {
    pub fn new(origin: impl Into<String>, version: u64) -> Self {
        Self {
            origin: origin.into(),
            version,
        }
    }
}

/// Provider of raw, weakly-typed per-rule configuration.
pub trait SettingsProvider: Send + Sync {
    /// Raw `<value>[:<severity>]` string for `rule_id`, if configured.
    fn rule_value(&self, rule_id: &str) -> Option<String>;

    /// Named-parameter overlay for `rule_id`, if configured.
    fn rule_parameters(&self, rule_id: &str) -> Option<IndexMap<String, String>>;

    fn identity(&self) -> SourceIdentity;
}

/// In-memory settings, keyed by uppercased rule id.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    identity: SourceIdentity,
    values: HashMap<String, String>,
    parameters: HashMap<String, IndexMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: SourceIdentity) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub fn set_value(mut self, rule_id: &str, value: impl Into<String>) -> Self {
        self.values
            .insert(rule_id.to_ascii_uppercase(), value.into());
        self
    }

    pub fn set_parameter(
        mut self,
        rule_id: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.parameters
            .entry(rule_id.to_ascii_uppercase())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Bump the content version, invalidating cache entries keyed on the
    /// previous identity.
    pub fn bump_version(&mut self) {
        self.identity.version = self.identity.version.wrapping_add(1);
    }
}

impl SettingsProvider for MemorySettings {
    fn rule_value(&self, rule_id: &str) -> Option<String> {
        self.values.get(&rule_id.to_ascii_uppercase()).cloned()
    }

    fn rule_parameters(&self, rule_id: &str) -> Option<IndexMap<String, String>> {
        self.parameters.get(&rule_id.to_ascii_uppercase()).cloned()
    }

    fn identity(&self) -> SourceIdentity {
        self.identity.clone()
    }
}

/// Several providers merged by precedence: the first layer with a value
/// wins; parameter maps merge across layers with earlier layers winning
/// per key.
#[derive(Default)]
pub struct LayeredSettings {
    layers: Vec<Box<dyn SettingsProvider>>,
}

impl LayeredSettings {
    pub fn new(layers: Vec<Box<dyn SettingsProvider>>) -> Self {
        Self { layers }
    }

    pub fn push_layer(&mut self, layer: Box<dyn SettingsProvider>) {
        self.layers.push(layer);
    }
}

impl SettingsProvider for LayeredSettings {
    fn rule_value(&self, rule_id: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.rule_value(rule_id))
    }

    fn rule_parameters(&self, rule_id: &str) -> Option<IndexMap<String, String>> {
        let mut merged: Option<IndexMap<String, String>> = None;
        // Iterate lowest precedence first so higher layers overwrite.
        for layer in self.layers.iter().rev() {
            if let Some(parameters) = layer.rule_parameters(rule_id) {
                merged.get_or_insert_default().extend(parameters);
            }
        }
        merged
    }

    fn identity(&self) -> SourceIdentity {
        let mut origin = String::new();
        let mut version = 0u64;
        for layer in &self.layers {
            let identity = layer.identity();
            if !origin.is_empty() {
                origin.push(';');
            }
            origin.push_str(&identity.origin);
            version = version.wrapping_mul(31).wrapping_add(identity.version);
        }
        SourceIdentity { origin, version }
    }
}
