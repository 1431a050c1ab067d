// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

use crate::NodeId;

/// A byte range in the source code, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Source location attached to every AST node.
///
/// `start` and `end` are inclusive byte offsets of the first and last
/// character the node covers, so `length == end - start + 1`. `line` is
/// 1-based and `column` is 0-based, both taken from the node's first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SrcNode {
    pub line: u32,
    pub column: u32,
    pub start: usize,
    pub end: usize,
    pub length: usize,
    pub parent_index: NodeId,
}

impl SrcNode {
    pub fn new(line: u32, column: u32, start: usize, end: usize, parent_index: NodeId) -> Self {
        let end = end.max(start);
        Self {
            line,
            column,
            start,
            end,
            length: end - start + 1,
            parent_index,
        }
    }

    /// Byte range covered by the node, end exclusive.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end + 1)
    }
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map by scanning source for newlines. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    /// Convert byte offset to (line, col), both 1-based. O(log n).
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Get the source text of a 1-based line number. O(1).
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1))
            .unwrap_or(source.len());
        source.get(start..end)
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn src_length_is_inclusive() {
        let src = SrcNode::new(3, 4, 10, 19, NodeId(7));
        assert_eq!(src.length, 10);
        assert_eq!(src.span(), Span::new(10, 20));
        assert_eq!(src.parent_index, NodeId(7));
    }

    #[test]
    fn single_character_node() {
        let src = SrcNode::new(1, 0, 5, 5, NodeId::ROOT);
        assert_eq!(src.length, 1);
    }

    #[test]
    fn multi_line() {
        let src = "abc\ndef\nghi";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 3);
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.offset_to_line_col(6), (2, 3));
        assert_eq!(lm.offset_to_line_col(8), (3, 1));
        assert_eq!(lm.line_text(src, 2), Some("def"));
        assert_eq!(lm.line_text(src, 4), None);
    }

    #[test]
    fn offset_at_newline_belongs_to_its_line() {
        let lm = LineMap::new("ab\ncd\n");
        assert_eq!(lm.offset_to_line_col(2), (1, 3));
        assert_eq!(lm.offset_to_line_col(3), (2, 1));
    }

    #[test]
    fn merge_spans() {
        assert_eq!(Span::new(4, 9).merge(Span::new(1, 6)), Span::new(1, 9));
    }
}
