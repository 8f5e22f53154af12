//!
//! Inline suppression directive processing.
//!
//! Supports the markdownlint comment surface:
//! - `<!-- markdownlint-disable [ids] -->` / `<!-- markdownlint-enable [ids] -->`
//! - `<!-- markdownlint-disable-line [ids] -->`
//! - `<!-- markdownlint-disable-next-line [ids] -->`
//! - `<!-- markdownlint-disable-file [ids] -->`
//! - `<!-- markdownlint-configure-file {json} -->`
//! - `<!-- markdownlint-capture -->` / `<!-- markdownlint-restore -->`
//!
//! Directives are matched case-insensitively with tolerant interior
//! whitespace. Malformed directives are ignored silently. The processor
//! makes a single forward pass and returns an immutable [`SuppressionMap`];
//! it holds no state afterward.

use std::collections::{HashMap, HashSet};

use crate::document::DocumentIndex;

const MARKER: &str = "markdownlint-";

/// The set of rules excluded at some scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Exclusion {
    #[default]
    None,
    AllRules,
    /// Canonical rule ids.
    Named(HashSet<String>),
}

impl Exclusion {
    fn suppresses(&self, id: &str) -> bool {
        match self {
            Exclusion::None => false,
            Exclusion::AllRules => true,
            Exclusion::Named(ids) => ids.contains(id),
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Exclusion::AllRules)
    }

    /// Widen `self` to also cover everything `other` covers.
    fn merge(&mut self, other: Exclusion) {
        match (&mut *self, other) {
            (_, Exclusion::None) => {}
            (Exclusion::AllRules, _) => {}
            (_, Exclusion::AllRules) => *self = Exclusion::AllRules,
            (Exclusion::Named(mine), Exclusion::Named(theirs)) => mine.extend(theirs),
            (Exclusion::None, named) => *self = named,
        }
    }

    fn from_ids(ids: Vec<String>) -> Exclusion {
        if ids.is_empty() {
            Exclusion::AllRules
        } else {
            Exclusion::Named(ids.into_iter().collect())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveAction {
    Disable,
    Enable,
    DisableLine,
    DisableNextLine,
    DisableFile,
    ConfigureFile,
    Capture,
    Restore,
}

/// One parsed directive comment, ids already canonicalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub action: DirectiveAction,
    pub ids: Vec<String>,
    /// Raw JSON payload for `configure-file`.
    pub json: Option<String>,
}

/// Parse every directive comment on one line, in order of appearance.
/// `aliases` maps lowercased ids and alias names to canonical ids.
pub fn parse_directives(line: &str, aliases: &HashMap<String, String>) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find("<!--") {
        let after = &rest[open + 4..];
        let Some(close) = after.find("-->") else {
            break;
        };
        if let Some(directive) = parse_directive_body(&after[..close], aliases) {
            directives.push(directive);
        }
        rest = &after[close + 3..];
    }
    directives
}

fn parse_directive_body(body: &str, aliases: &HashMap<String, String>) -> Option<Directive> {
    let body = body.trim();
    let (head, tail) = match body.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (body, ""),
    };
    let head = head.to_ascii_lowercase();
    let action_name = head.strip_prefix(MARKER)?;
    let action = match action_name {
        "disable" => DirectiveAction::Disable,
        "enable" => DirectiveAction::Enable,
        "disable-line" => DirectiveAction::DisableLine,
        "disable-next-line" => DirectiveAction::DisableNextLine,
        "disable-file" => DirectiveAction::DisableFile,
        "configure-file" => DirectiveAction::ConfigureFile,
        "capture" => DirectiveAction::Capture,
        "restore" => DirectiveAction::Restore,
        _ => return None,
    };
    if action == DirectiveAction::ConfigureFile {
        return Some(Directive {
            action,
            ids: Vec::new(),
            json: Some(tail.to_string()),
        });
    }
    let ids = tail
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|token| canonicalize(token, aliases))
        .collect();
    Some(Directive {
        action,
        ids,
        json: None,
    })
}

fn canonicalize(token: &str, aliases: &HashMap<String, String>) -> String {
    let lower = token.to_ascii_lowercase();
    aliases
        .get(&lower)
        .cloned()
        .unwrap_or_else(|| token.to_ascii_uppercase())
}

/// Per-line, per-rule suppression decisions. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SuppressionMap {
    /// Exclusion in force at each line (index 0 = line 1), before
    /// line-specific directives.
    active_at_line: Vec<Exclusion>,
    /// `disable-line` / `disable-next-line` exclusions for single lines.
    line_only: HashMap<usize, Exclusion>,
    /// Applied to every line regardless of where the directive appeared.
    file_wide: Exclusion,
    aliases: HashMap<String, String>,
}

impl SuppressionMap {
    /// Is `rule` (canonical id or alias, case-insensitive) suppressed on
    /// 1-based `line`?
    pub fn is_suppressed(&self, line: usize, rule: &str) -> bool {
        let id = canonicalize(rule, &self.aliases);
        if self.file_wide.suppresses(&id) {
            return true;
        }
        if self
            .active_exclusion(line)
            .is_some_and(|e| e.suppresses(&id))
        {
            return true;
        }
        self.line_only.get(&line).is_some_and(|e| e.suppresses(&id))
    }

    /// Are all rules suppressed on `line`?
    pub fn is_all_suppressed(&self, line: usize) -> bool {
        self.file_wide.is_all()
            || self.active_exclusion(line).is_some_and(Exclusion::is_all)
            || self.line_only.get(&line).is_some_and(|e| e.is_all())
    }

    fn active_exclusion(&self, line: usize) -> Option<&Exclusion> {
        if line == 0 {
            return None;
        }
        self.active_at_line.get(line - 1)
    }
}

/// Internal interpreter state; exists only during [`SuppressionProcessor::process`].
#[derive(Debug, Default)]
struct SuppressionState {
    active: Exclusion,
    capture_stack: Vec<Exclusion>,
    file_wide: Exclusion,
    pending_next_line: Option<Exclusion>,
}

/// Single-pass interpreter for suppression directives.
pub struct SuppressionProcessor {
    aliases: HashMap<String, String>,
}

impl SuppressionProcessor {
    /// `aliases` maps lowercased ids and alias names to canonical ids;
    /// registries provide this table.
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    pub fn process(&self, doc: &DocumentIndex) -> SuppressionMap {
        let mut state = SuppressionState::default();
        let mut map = SuppressionMap {
            aliases: self.aliases.clone(),
            ..SuppressionMap::default()
        };

        for line in 1..=doc.line_count() {
            // State is snapshotted before this line's directives run, so
            // a directive never affects the line that carries it.
            map.active_at_line.push(state.active.clone());
            if let Some(pending) = state.pending_next_line.take() {
                map.line_only.entry(line).or_default().merge(pending);
            }
            // Directive comments are only recognized in regular text.
            if doc.in_code_block(line) || doc.in_front_matter(line) {
                continue;
            }
            for directive in parse_directives(doc.line(line), &self.aliases) {
                self.apply(directive, line, &mut state, &mut map);
            }
        }

        map.file_wide = state.file_wide;
        map
    }

    fn apply(
        &self,
        directive: Directive,
        line: usize,
        state: &mut SuppressionState,
        map: &mut SuppressionMap,
    ) {
        match directive.action {
            DirectiveAction::Disable => {
                if directive.ids.is_empty() {
                    state.active = Exclusion::AllRules;
                } else {
                    state
                        .active
                        .merge(Exclusion::Named(directive.ids.into_iter().collect()));
                }
            }
            DirectiveAction::Enable => {
                if directive.ids.is_empty() {
                    state.active = Exclusion::None;
                } else if let Exclusion::Named(ids) = &mut state.active {
                    for id in &directive.ids {
                        ids.remove(id);
                    }
                    if ids.is_empty() {
                        state.active = Exclusion::None;
                    }
                }
            }
            DirectiveAction::DisableLine => {
                map.line_only
                    .entry(line)
                    .or_default()
                    .merge(Exclusion::from_ids(directive.ids));
            }
            DirectiveAction::DisableNextLine => {
                // Takes effect on the following line if one exists; on the
                // last line the pending exclusion is simply never consumed.
                let exclusion = Exclusion::from_ids(directive.ids);
                if let Some(pending) = state.pending_next_line.as_mut() {
                    pending.merge(exclusion);
                } else {
                    state.pending_next_line = Some(exclusion);
                }
            }
            DirectiveAction::DisableFile => {
                state.file_wide.merge(Exclusion::from_ids(directive.ids));
            }
            DirectiveAction::ConfigureFile => {
                if let Some(exclusion) = self.configure_file_exclusion(directive.json.as_deref()) {
                    state.file_wide.merge(exclusion);
                }
            }
            DirectiveAction::Capture => {
                state.capture_stack.push(state.active.clone());
            }
            DirectiveAction::Restore => {
                // Restore with an empty stack is a full reset, not a no-op.
                state.active = state.capture_stack.pop().unwrap_or_default();
            }
        }
    }

    /// `configure-file` acts as `disable-file` restricted to the keys
    /// explicitly mapped to `false` in the JSON object. Malformed JSON is
    /// a malformed directive.
    fn configure_file_exclusion(&self, json: Option<&str>) -> Option<Exclusion> {
        let value: serde_json::Value = serde_json::from_str(json?).ok()?;
        let object = value.as_object()?;
        let disabled: HashSet<String> = object
            .iter()
            .filter(|(_, v)| matches!(v, serde_json::Value::Bool(false)))
            .map(|(k, _)| canonicalize(k, &self.aliases))
            .collect();
        if disabled.is_empty() {
            None
        } else {
            Some(Exclusion::Named(disabled))
        }
    }
}
