//! Byte spans and line/column lookup

#![allow(clippy::cast_possible_truncation)] // Spans are u32; sources over 4GB are not documented

/// Half-open byte range `start..end` into one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Span between two `usize` offsets as produced while scanning
    #[must_use]
    pub fn between(start: usize, end: usize) -> Self {
        Self::new(start as u32, end as u32)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// 1-based line and byte column, printed as `line:column`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Offsets of every line start, for turning spans into locations
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<u32>,
}

impl LineIndex {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| (i + 1) as u32))
            .collect();
        Self { starts }
    }

    /// Location of byte `offset`; offsets past the end land on the last line
    #[must_use]
    pub fn location(&self, offset: u32) -> Location {
        let line = self.starts.partition_point(|&s| s <= offset).max(1);
        let start = self.starts[line - 1];
        Location::new(line as u32, offset - start + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_converts_offsets() {
        assert_eq!(Span::between(5, 10), Span::new(5, 10));
        assert_eq!(Span::new(3, 7).to_string(), "3..7");
    }

    #[test]
    fn locations_are_one_based() {
        let index = LineIndex::new("class Foo {\n  bar() {}\n}");
        assert_eq!(index.location(0), Location::new(1, 1));
        assert_eq!(index.location(14), Location::new(2, 3));
        assert_eq!(index.location(23), Location::new(3, 1));
        assert_eq!(index.location(23).to_string(), "3:1");
    }

    #[test]
    fn newline_belongs_to_its_line() {
        let index = LineIndex::new("a\nb");
        assert_eq!(index.location(1), Location::new(1, 2));
        assert_eq!(index.location(2), Location::new(2, 1));
    }
}
