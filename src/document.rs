//!
//! Document line index: per-line classification (front matter, code
//! blocks, blank lines) plus structural element tables (headings, list
//! blocks, links, tables) sourced from the markdown parse tree.
//!
//! Built once per analysis pass and read-only afterward. Out-of-range
//! line queries return empty/neutral results rather than failing, since
//! rules frequently probe line N±1 near document boundaries.

use lazy_static::lazy_static;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

lazy_static! {
    static ref FRONT_MATTER_DELIMITER: Regex = Regex::new(r"^---\s*$").unwrap();
    static ref ORDERED_MARKER: Regex = Regex::new(r"^(\s*)(\d{1,9})([.)])").unwrap();
    static ref UNORDERED_MARKER: Regex = Regex::new(r"^(\s*)([-*+])").unwrap();
}

/// Structural flags for one line, computed once per document version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineClassification {
    pub in_front_matter: bool,
    pub in_code_block: bool,
    pub is_blank: bool,
    pub code_language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    Atx,
    Setext,
}

#[derive(Debug, Clone)]
pub struct HeadingInfo {
    /// 1-based line of the heading text.
    pub line: usize,
    /// Last line of the heading (the underline for setext headings).
    pub end_line: usize,
    pub level: usize,
    pub style: HeadingStyle,
    pub text: String,
    /// 1-based column of the first marker or text character.
    pub marker_column: usize,
}

#[derive(Debug, Clone)]
pub struct ListItemInfo {
    pub line: usize,
    /// Marker number for ordered items, `None` for unordered.
    pub ordinal: Option<u64>,
    /// 1-based column where the marker starts.
    pub marker_column: usize,
    /// Byte length of the marker (digits plus delimiter, or one bullet char).
    pub marker_len: usize,
}

#[derive(Debug, Clone)]
pub struct ListBlockInfo {
    pub start_line: usize,
    pub end_line: usize,
    pub ordered: bool,
    /// Top-level items only; nested list items belong to their own block scan.
    pub items: Vec<ListItemInfo>,
}

#[derive(Debug, Clone)]
pub struct CodeBlockInfo {
    pub start_line: usize,
    pub end_line: usize,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LinkInfo {
    pub line: usize,
    pub text: String,
    pub destination: String,
}

#[derive(Debug, Clone)]
pub struct TableInfo {
    pub start_line: usize,
    pub end_line: usize,
}

/// Read-only index over one snapshot of document text.
pub struct DocumentIndex<'a> {
    content: &'a str,
    /// Byte span of each line, excluding the newline and any trailing `\r`.
    line_spans: Vec<(usize, usize)>,
    classes: Vec<LineClassification>,
    headings: Vec<HeadingInfo>,
    list_blocks: Vec<ListBlockInfo>,
    code_blocks: Vec<CodeBlockInfo>,
    links: Vec<LinkInfo>,
    tables: Vec<TableInfo>,
}

impl<'a> DocumentIndex<'a> {
    pub fn new(content: &'a str) -> Self {
        let line_spans = compute_line_spans(content);
        let mut classes: Vec<LineClassification> = line_spans
            .iter()
            .map(|&(s, e)| LineClassification {
                is_blank: content[s..e].trim().is_empty(),
                ..LineClassification::default()
            })
            .collect();

        mark_front_matter(content, &line_spans, &mut classes);

        let mut index = Self {
            content,
            line_spans,
            classes,
            headings: Vec::new(),
            list_blocks: Vec::new(),
            code_blocks: Vec::new(),
            links: Vec::new(),
            tables: Vec::new(),
        };
        index.scan_elements();
        index
    }

    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_spans.len()
    }

    /// Text of the 1-based line `n`, or `""` when out of range.
    pub fn line(&self, n: usize) -> &'a str {
        match self.span(n) {
            Some((s, e)) => &self.content[s..e],
            None => "",
        }
    }

    /// Byte offset of the start of line `n`.
    pub fn line_offset(&self, n: usize) -> Option<usize> {
        self.span(n).map(|(s, _)| s)
    }

    /// Map a byte offset to 1-based (line, column).
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        if self.line_spans.is_empty() {
            return (1, 1);
        }
        let idx = self
            .line_spans
            .partition_point(|&(s, _)| s <= offset)
            .saturating_sub(1);
        let (start, _) = self.line_spans[idx];
        (idx + 1, offset.saturating_sub(start) + 1)
    }

    pub fn is_blank(&self, n: usize) -> bool {
        self.class(n).is_some_and(|c| c.is_blank)
    }

    pub fn in_code_block(&self, n: usize) -> bool {
        self.class(n).is_some_and(|c| c.in_code_block)
    }

    pub fn in_front_matter(&self, n: usize) -> bool {
        self.class(n).is_some_and(|c| c.in_front_matter)
    }

    pub fn code_language(&self, n: usize) -> Option<&str> {
        self.class(n).and_then(|c| c.code_language.as_deref())
    }

    pub fn classification(&self, n: usize) -> Option<&LineClassification> {
        self.class(n)
    }

    pub fn headings(&self) -> &[HeadingInfo] {
        &self.headings
    }

    pub fn list_blocks(&self) -> &[ListBlockInfo] {
        &self.list_blocks
    }

    pub fn code_blocks(&self) -> &[CodeBlockInfo] {
        &self.code_blocks
    }

    pub fn links(&self) -> &[LinkInfo] {
        &self.links
    }

    pub fn tables(&self) -> &[TableInfo] {
        &self.tables
    }

    fn span(&self, n: usize) -> Option<(usize, usize)> {
        if n == 0 {
            return None;
        }
        self.line_spans.get(n - 1).copied()
    }

    fn class(&self, n: usize) -> Option<&LineClassification> {
        if n == 0 {
            return None;
        }
        self.classes.get(n - 1)
    }

    fn line_of(&self, offset: usize) -> usize {
        self.offset_to_line_col(offset).0
    }

    /// Single pass over the parse tree filling element tables and
    /// code-block classification.
    fn scan_elements(&mut self) {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        let parser = Parser::new_ext(self.content, options);

        let mut current_heading: Option<HeadingInfo> = None;
        let mut current_link: Option<LinkInfo> = None;
        let mut current_list: Option<ListBlockInfo> = None;
        let mut list_depth = 0usize;

        for (event, range) in parser.into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    let line = self.line_of(range.start);
                    let end_line = self.line_of(range.end.saturating_sub(1).max(range.start));
                    let text = self.line(line);
                    let indent = text.len() - text.trim_start().len();
                    let style = if text.trim_start().starts_with('#') {
                        HeadingStyle::Atx
                    } else {
                        HeadingStyle::Setext
                    };
                    current_heading = Some(HeadingInfo {
                        line,
                        end_line,
                        level: level as usize,
                        style,
                        text: String::new(),
                        marker_column: indent + 1,
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(h) = current_heading.take() {
                        self.headings.push(h);
                    }
                }
                Event::Start(Tag::List(_)) => {
                    if list_depth == 0 {
                        let start_line = self.line_of(range.start);
                        let mut end_line =
                            self.line_of(range.end.saturating_sub(1).max(range.start));
                        while end_line > start_line && self.is_blank(end_line) {
                            end_line -= 1;
                        }
                        current_list = Some(ListBlockInfo {
                            start_line,
                            end_line,
                            ordered: false,
                            items: Vec::new(),
                        });
                    }
                    list_depth += 1;
                }
                Event::End(TagEnd::List(_)) => {
                    list_depth = list_depth.saturating_sub(1);
                    if list_depth == 0
                        && let Some(block) = current_list.take()
                    {
                        self.list_blocks.push(block);
                    }
                }
                Event::Start(Tag::Item) => {
                    if list_depth == 1
                        && let Some(block) = current_list.as_mut()
                    {
                        let line = self.line_of(range.start);
                        let text = &self.content
                            [self.line_spans[line - 1].0..self.line_spans[line - 1].1];
                        if let Some(caps) = ORDERED_MARKER.captures(text) {
                            block.ordered = true;
                            block.items.push(ListItemInfo {
                                line,
                                ordinal: caps[2].parse().ok(),
                                marker_column: caps[1].len() + 1,
                                marker_len: caps[2].len() + 1,
                            });
                        } else if let Some(caps) = UNORDERED_MARKER.captures(text) {
                            block.items.push(ListItemInfo {
                                line,
                                ordinal: None,
                                marker_column: caps[1].len() + 1,
                                marker_len: 1,
                            });
                        }
                    }
                }
                Event::Start(Tag::Link { dest_url, .. }) => {
                    current_link = Some(LinkInfo {
                        line: self.line_of(range.start),
                        text: String::new(),
                        destination: dest_url.to_string(),
                    });
                }
                Event::End(TagEnd::Link) => {
                    if let Some(link) = current_link.take() {
                        self.links.push(link);
                    }
                }
                Event::Start(Tag::Table(_)) => {
                    let start_line = self.line_of(range.start);
                    let end_line = self.line_of(range.end.saturating_sub(1).max(range.start));
                    self.tables.push(TableInfo {
                        start_line,
                        end_line,
                    });
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match &kind {
                        CodeBlockKind::Fenced(info) => info
                            .split([',', ' '])
                            .next()
                            .filter(|s| !s.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    let start_line = self.line_of(range.start);
                    let end_line = self.line_of(range.end.saturating_sub(1).max(range.start));
                    for n in start_line..=end_line {
                        if let Some(class) = self.classes.get_mut(n - 1) {
                            class.in_code_block = true;
                            class.code_language = language.clone();
                        }
                    }
                    self.code_blocks.push(CodeBlockInfo {
                        start_line,
                        end_line,
                        language,
                    });
                }
                Event::Text(t) | Event::Code(t) => {
                    if let Some(h) = current_heading.as_mut() {
                        h.text.push_str(&t);
                    }
                    if let Some(link) = current_link.as_mut() {
                        link.text.push_str(&t);
                    }
                }
                _ => {}
            }
        }
    }
}

fn compute_line_spans(content: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    for (idx, _) in content.match_indices('\n') {
        let mut end = idx;
        if end > start && content.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        spans.push((start, end));
        start = idx + 1;
    }
    if start < content.len() {
        spans.push((start, content.len()));
    }
    spans
}

/// Mark a `---`-delimited block starting on line 1 as front matter,
/// delimiters included. An unclosed block is not front matter.
fn mark_front_matter(
    content: &str,
    line_spans: &[(usize, usize)],
    classes: &mut [LineClassification],
) {
    let Some(&(s, e)) = line_spans.first() else {
        return;
    };
    if !FRONT_MATTER_DELIMITER.is_match(&content[s..e]) {
        return;
    }
    let close = line_spans
        .iter()
        .enumerate()
        .skip(1)
        .find(|&(_, &(s, e))| FRONT_MATTER_DELIMITER.is_match(&content[s..e]));
    if let Some((close_idx, _)) = close {
        for class in classes.iter_mut().take(close_idx + 1) {
            class.in_front_matter = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let doc = DocumentIndex::new("");
        assert_eq!(doc.line_count(), 0);
        assert_eq!(doc.line(1), "");
        assert!(!doc.is_blank(1));
        assert!(!doc.in_code_block(1));
        assert_eq!(doc.offset_to_line_col(0), (1, 1));
    }

    #[test]
    fn test_line_queries() {
        let doc = DocumentIndex::new("# Title\n\nSecond\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line(1), "# Title");
        assert_eq!(doc.line(2), "");
        assert_eq!(doc.line(3), "Second");
        assert_eq!(doc.line(4), "");
        assert_eq!(doc.line(0), "");
        assert!(doc.is_blank(2));
        assert!(!doc.is_blank(3));
        assert_eq!(doc.line_offset(3), Some(9));
    }

    #[test]
    fn test_offset_to_line_col() {
        let doc = DocumentIndex::new("a\nb\nc");
        assert_eq!(doc.offset_to_line_col(0), (1, 1));
        assert_eq!(doc.offset_to_line_col(2), (2, 1));
        assert_eq!(doc.offset_to_line_col(3), (2, 2));
        assert_eq!(doc.offset_to_line_col(4), (3, 1));
    }

    #[test]
    fn test_crlf_lines_exclude_carriage_return() {
        let doc = DocumentIndex::new("alpha\r\nbeta\r\n");
        assert_eq!(doc.line(1), "alpha");
        assert_eq!(doc.line(2), "beta");
    }

    #[test]
    fn test_headings() {
        let doc = DocumentIndex::new("# One\n\ntext\n\n### Three\n\nTitle\n=====\n");
        let headings = doc.headings();
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[0].line, 1);
        assert_eq!(headings[0].style, HeadingStyle::Atx);
        assert_eq!(headings[1].level, 3);
        assert_eq!(headings[1].line, 5);
        assert_eq!(headings[2].level, 1);
        assert_eq!(headings[2].line, 7);
        assert_eq!(headings[2].end_line, 8);
        assert_eq!(headings[2].style, HeadingStyle::Setext);
        assert_eq!(headings[2].text, "Title");
    }

    #[test]
    fn test_code_block_classification() {
        let content = "text\n\n```rust\nlet x = 1;\n```\n\nafter\n";
        let doc = DocumentIndex::new(content);
        assert!(!doc.in_code_block(1));
        assert!(doc.in_code_block(3));
        assert!(doc.in_code_block(4));
        assert!(doc.in_code_block(5));
        assert!(!doc.in_code_block(7));
        assert_eq!(doc.code_language(4), Some("rust"));
        assert_eq!(doc.code_blocks().len(), 1);
        assert_eq!(doc.code_blocks()[0].start_line, 3);
        assert_eq!(doc.code_blocks()[0].end_line, 5);
        assert_eq!(doc.code_blocks()[0].language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_unclosed_fence_runs_to_eof() {
        let doc = DocumentIndex::new("```\ncode\nmore\n");
        assert!(doc.in_code_block(1));
        assert!(doc.in_code_block(3));
    }

    #[test]
    fn test_front_matter_classification() {
        let content = "---\ntitle: test\n---\n\n# Heading\n";
        let doc = DocumentIndex::new(content);
        assert!(doc.in_front_matter(1));
        assert!(doc.in_front_matter(2));
        assert!(doc.in_front_matter(3));
        assert!(!doc.in_front_matter(4));
        assert!(!doc.in_front_matter(5));
    }

    #[test]
    fn test_unclosed_front_matter_not_marked() {
        let doc = DocumentIndex::new("---\ntitle: test\n\nbody\n");
        assert!(!doc.in_front_matter(1));
        assert!(!doc.in_front_matter(2));
    }

    #[test]
    fn test_ordered_list_items() {
        let doc = DocumentIndex::new("intro\n\n1. one\n2. two\n5. five\n\nafter\n");
        let blocks = doc.list_blocks();
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert!(block.ordered);
        assert_eq!(block.start_line, 3);
        assert_eq!(block.end_line, 5);
        let ordinals: Vec<_> = block.items.iter().map(|i| i.ordinal).collect();
        assert_eq!(ordinals, vec![Some(1), Some(2), Some(5)]);
    }

    #[test]
    fn test_nested_list_items_stay_with_outer_block() {
        let doc = DocumentIndex::new("- top\n  - nested\n- top again\n");
        let blocks = doc.list_blocks();
        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].ordered);
        // Only the two top-level items are recorded.
        assert_eq!(blocks[0].items.len(), 2);
        assert_eq!(blocks[0].items[0].line, 1);
        assert_eq!(blocks[0].items[1].line, 3);
    }

    #[test]
    fn test_links_and_tables() {
        let content = "[text](https://example.com)\n\n| a | b |\n| - | - |\n| 1 | 2 |\n";
        let doc = DocumentIndex::new(content);
        assert_eq!(doc.links().len(), 1);
        assert_eq!(doc.links()[0].destination, "https://example.com");
        assert_eq!(doc.links()[0].text, "text");
        assert_eq!(doc.tables().len(), 1);
        assert_eq!(doc.tables()[0].start_line, 3);
        assert_eq!(doc.tables()[0].end_line, 5);
    }

    #[test]
    fn test_repeated_queries_are_stable() {
        let doc = DocumentIndex::new("# A\n\n- item\n");
        let first: Vec<_> = (0..=4).map(|n| doc.line(n).to_string()).collect();
        let second: Vec<_> = (0..=4).map(|n| doc.line(n).to_string()).collect();
        assert_eq!(first, second);
        assert_eq!(doc.headings().len(), 1);
        assert_eq!(doc.list_blocks().len(), 1);
    }
}
