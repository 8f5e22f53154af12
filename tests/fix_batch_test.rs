use std::sync::Arc;

use mdcheck::{Analyzer, CancelToken, DocumentIndex, MemorySettings, Violation};
use pretty_assertions::assert_eq;

fn analyzer() -> Analyzer {
    Analyzer::with_default_rules(Arc::new(MemorySettings::new()))
}

fn analyze(analyzer: &Analyzer, content: &str) -> Vec<Violation> {
    analyzer.analyze(content, None, &CancelToken::new())
}

#[test]
fn test_competing_blank_line_insertions_produce_one_blank_line() {
    // "Blank line after heading" (MD022) and "blank line before list"
    // (MD032) target the same boundary; the batch inserts exactly one.
    let content = "intro\n\n# Heading\n- item\n\nend\n";
    let analyzer = analyzer();
    let fixed = analyzer.fix_all(content, None).unwrap();
    assert_eq!(fixed, "intro\n\n# Heading\n\n- item\n\nend\n");
}

#[test]
fn test_surround_with_one_side_claimed_still_applies_other_side() {
    // The list needs blanks on both sides; the heading above has already
    // claimed the shared boundary, the heading below claims the other
    // after the list's surround fix took it first.
    let content = "# H\n- item\n# H2\n";
    let analyzer = analyzer();
    let fixed = analyzer.fix_all(content, None).unwrap();
    assert_eq!(fixed, "# H\n\n- item\n\n# H2\n");
}

#[test]
fn test_fix_all_matches_sequential_single_fixes() {
    let content = "one   \ntwo\nthree    \nfour significant\nfive \n";
    let analyzer = analyzer();

    let batch_fixed = analyzer.fix_all(content, Some("MD009")).unwrap();

    // Apply single-violation fixes one at a time, re-analyzing after each
    // application so offsets always match the current snapshot.
    let mut sequential = content.to_string();
    loop {
        let violations: Vec<Violation> = analyze(&analyzer, &sequential)
            .into_iter()
            .filter(|v| v.rule_id == "MD009")
            .collect();
        let Some(violation) = violations.first() else {
            break;
        };
        let doc = DocumentIndex::new(&sequential);
        let edit = analyzer.fix_violation(&doc, violation).unwrap();
        let mut next = sequential.clone();
        next.replace_range(edit.anchor..edit.anchor + edit.length, &edit.new_text);
        sequential = next;
    }

    assert_eq!(batch_fixed, sequential);
}

#[test]
fn test_fixes_are_idempotent() {
    let content = "trailing   \nmore  here   \n\n\n\ntext\n";
    let analyzer = analyzer();
    let once = analyzer.fix_all(content, None).unwrap();
    let twice = analyzer.fix_all(&once, None).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_fixing_clean_text_is_identity() {
    let content = "# Title\n\nclean text\n\n- a\n- b\n";
    let analyzer = analyzer();
    assert_eq!(analyzer.fix_all(content, None).unwrap(), content);
}

#[test]
fn test_stale_batch_is_rejected_whole() {
    let content = "text   \n";
    let analyzer = analyzer();
    let doc = DocumentIndex::new(content);
    let violations = analyze(&analyzer, content);
    let batch = analyzer.build_fix_batch(&doc, &violations);
    assert!(!batch.is_empty());
    // The buffer moved on; nothing from the batch may be applied.
    assert!(batch.apply_to("text   \nchanged\n").is_err());
}

#[test]
fn test_rule_filtered_fix_leaves_other_violations() {
    let content = "text\tand   \n";
    let analyzer = analyzer();
    let fixed = analyzer.fix_all(content, Some("MD009")).unwrap();
    // Trailing spaces removed, the hard tab stays.
    assert_eq!(fixed, "text\tand\n");
}

#[test]
fn test_multiple_blank_runs_fixed_bottom_to_top() {
    let content = "a\n\n\nb\n\n\n\nc\n";
    let analyzer = analyzer();
    let fixed = analyzer.fix_all(content, Some("MD012")).unwrap();
    assert_eq!(fixed, "a\n\nb\n\nc\n");
}
