//!
//! Built-in rule catalog. The registry is the authoritative list of
//! rules for an analyzer instance; hosts may register additional rules
//! that implement the [`Rule`](crate::rule::Rule) contract.

mod md001_heading_increment;
mod md009_trailing_spaces;
mod md010_hard_tabs;
mod md012_multiple_blanks;
mod md013_line_length;
mod md018_missing_space_atx;
mod md022_blanks_around_headings;
mod md029_ordered_list_prefix;
mod md032_blanks_around_lists;
mod md041_first_line_heading;
mod md047_trailing_newline;

pub use md001_heading_increment::MD001HeadingIncrement;
pub use md009_trailing_spaces::MD009TrailingSpaces;
pub use md010_hard_tabs::MD010HardTabs;
pub use md012_multiple_blanks::MD012MultipleBlanks;
pub use md013_line_length::MD013LineLength;
pub use md018_missing_space_atx::MD018MissingSpaceAtx;
pub use md022_blanks_around_headings::MD022BlanksAroundHeadings;
pub use md029_ordered_list_prefix::MD029OrderedListPrefix;
pub use md032_blanks_around_lists::MD032BlanksAroundLists;
pub use md041_first_line_heading::MD041FirstLineHeading;
pub use md047_trailing_newline::MD047TrailingNewline;

use std::collections::HashMap;

use crate::rule::Rule;

/// Registered rule set for one analyzer. Registered once at
/// construction; descriptors are immutable afterward.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// The built-in rule set.
    pub fn with_default_rules() -> Self {
        Self::new(vec![
            Box::new(MD001HeadingIncrement),
            Box::new(MD009TrailingSpaces),
            Box::new(MD010HardTabs),
            Box::new(MD012MultipleBlanks),
            Box::new(MD013LineLength),
            Box::new(MD018MissingSpaceAtx),
            Box::new(MD022BlanksAroundHeadings),
            Box::new(MD029OrderedListPrefix),
            Box::new(MD032BlanksAroundLists),
            Box::new(MD041FirstLineHeading),
            Box::new(MD047TrailingNewline),
        ])
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by canonical id or alias, case-insensitively.
    pub fn by_id(&self, rule: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| {
                let descriptor = r.descriptor();
                descriptor.id.eq_ignore_ascii_case(rule) || descriptor.alias.eq_ignore_ascii_case(rule)
            })
            .map(|r| r.as_ref())
    }

    /// Lowercased id/alias to canonical id, for the suppression processor.
    pub fn alias_table(&self) -> HashMap<String, String> {
        let mut table = HashMap::new();
        for rule in &self.rules {
            let descriptor = rule.descriptor();
            table.insert(descriptor.id.to_ascii_lowercase(), descriptor.id.to_string());
            table.insert(descriptor.alias.to_ascii_lowercase(), descriptor.id.to_string());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_contents() {
        let registry = RuleRegistry::with_default_rules();
        assert_eq!(registry.len(), 11);
        assert!(registry.by_id("MD009").is_some());
        assert!(registry.by_id("md009").is_some());
        assert!(registry.by_id("no-trailing-spaces").is_some());
        assert!(registry.by_id("MD999").is_none());
    }

    #[test]
    fn test_descriptor_ids_are_unique() {
        let registry = RuleRegistry::with_default_rules();
        let mut ids: Vec<_> = registry.rules().iter().map(|r| r.descriptor().id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn test_alias_table_maps_both_names() {
        let table = RuleRegistry::with_default_rules().alias_table();
        assert_eq!(table.get("md001").map(String::as_str), Some("MD001"));
        assert_eq!(table.get("heading-increment").map(String::as_str), Some("MD001"));
        assert_eq!(table.get("line-length").map(String::as_str), Some("MD013"));
    }
}
