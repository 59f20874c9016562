//! Flattened text plus an offset to document position index.
//!
//! Offsets into [`PositionMap::text`] are counted in characters. The line
//! breaks inserted between blocks belong to no segment, so they have no
//! document position of their own.

use super::Document;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub text: String,
    pub from: usize,
    pub to: usize,
    /// Character offset of this segment inside the concatenated text.
    pub offset: usize,
}

impl TextSegment {
    fn char_len(&self) -> usize {
        self.to - self.from
    }

    fn contains_start(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.offset + self.char_len()
    }

    fn contains_end(&self, offset: usize) -> bool {
        offset > self.offset && offset <= self.offset + self.char_len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    text: String,
    segments: Vec<TextSegment>,
}

impl PositionMap {
    pub fn build(doc: &Document) -> Self {
        let mut text = String::new();
        let mut char_len = 0;
        let mut segments = Vec::new();

        doc.descendants(|node, pos| {
            if node.is_text() {
                let node_text = node.text_str();
                let len = node_text.chars().count();
                if len > 0 {
                    segments.push(TextSegment {
                        text: node_text.to_string(),
                        from: pos,
                        to: pos + len,
                        offset: char_len,
                    });
                    text.push_str(node_text);
                    char_len += len;
                }
            } else if node.is_block() && !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
                char_len += 1;
            }
            true
        });

        Self { text, segments }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Document range of the `occurrence`-th (0-based) appearance of
    /// `needle`. Occurrences may overlap. `None` when there is no such
    /// occurrence or either boundary falls on an inserted line break.
    pub fn find_text_position(&self, needle: &str, occurrence: usize) -> Option<TextRange> {
        if needle.is_empty() {
            return None;
        }

        let byte_start = self.nth_match(needle, occurrence)?;
        let start = self.text[..byte_start].chars().count();
        let end = start + needle.chars().count();

        let from = self.start_position(start)?;
        let to = self.end_position(end)?;
        (from < to).then_some(TextRange { from, to })
    }

    /// Document position of the character at `offset`.
    pub fn start_position(&self, offset: usize) -> Option<usize> {
        self.segments
            .iter()
            .find(|segment| segment.contains_start(offset))
            .map(|segment| segment.from + (offset - segment.offset))
    }

    /// Document position just after the character ending at `offset`.
    pub fn end_position(&self, offset: usize) -> Option<usize> {
        self.segments
            .iter()
            .find(|segment| segment.contains_end(offset))
            .map(|segment| segment.from + (offset - segment.offset))
    }

    fn nth_match(&self, needle: &str, occurrence: usize) -> Option<usize> {
        let mut search_from = 0;
        let mut seen = 0;
        while search_from <= self.text.len() {
            let found = search_from + self.text[search_from..].find(needle)?;
            if seen == occurrence {
                return Some(found);
            }
            seen += 1;
            search_from = found + self.text[found..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;

    #[test]
    fn test_blocks_are_separated_by_single_newline() {
        let doc = Document::new(vec![
            Node::paragraph("One"),
            Node::paragraph(""),
            Node::block("blockquote", vec![Node::paragraph("Two")]),
        ]);

        let map = doc.position_map();
        assert_eq!(map.text(), "One\nTwo");
        assert_eq!(map.segments().len(), 2);
        assert_eq!(map.segments()[1].from, 9);
    }

    #[test]
    fn test_find_maps_back_to_document_range() {
        let doc = Document::from_paragraphs(&["First line.", "Second line here."]);
        let map = doc.position_map();

        let range = map.find_text_position("line", 1).unwrap();
        // second paragraph starts at 13, text at 14, "line" at char 7
        assert_eq!(range, TextRange { from: 21, to: 25 });

        let first = map.find_text_position("line", 0).unwrap();
        assert_eq!(first, TextRange { from: 7, to: 11 });
    }

    #[test]
    fn test_needle_spanning_segments() {
        let doc = Document::new(vec![Node::block(
            "paragraph",
            vec![Node::text("bold"), Node::hard_break(), Node::text("er text")],
        )]);
        let map = doc.position_map();
        assert_eq!(map.text(), "bolder text");

        let range = map.find_text_position("lder", 0).unwrap();
        assert_eq!(range.from, 3);
        // crosses the hard break at position 5
        assert_eq!(range.to, 8);
    }

    #[test]
    fn test_missing_occurrence_is_none() {
        let doc = Document::from_paragraphs(&["only once"]);
        let map = doc.position_map();

        assert!(map.find_text_position("once", 1).is_none());
        assert!(map.find_text_position("never", 0).is_none());
        assert!(map.find_text_position("", 0).is_none());
    }

    #[test]
    fn test_needle_starting_on_inserted_break_is_none() {
        let doc = Document::from_paragraphs(&["a", "b"]);
        let map = doc.position_map();
        assert!(map.find_text_position("\nb", 0).is_none());
    }

    #[test]
    fn test_multibyte_offsets() {
        let doc = Document::from_paragraphs(&["café crème"]);
        let map = doc.position_map();
        let range = map.find_text_position("crème", 0).unwrap();
        assert_eq!(range, TextRange { from: 6, to: 11 });
    }
}
