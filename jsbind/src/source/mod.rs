///
/// Source Location and Span Module
///
/// Every IR node handed to the binding layer carries a Span pointing back
/// into the original source text. Expansions copy these spans onto the JS
/// nodes they build so that diagnostics for garbage nodes land on the
/// invoking call site rather than on the expansion machinery.
///
/// Key types:
/// - Span: A range in source code (start offset, end offset, file id)
/// - Spanned: Trait for types that have an associated span
/// - SourceFile: Named source text with line/column lookup
///
/// Design decisions:
/// - Offsets are byte-based, not character-based
/// - Spans are Copy for ergonomic use throughout the backend
/// - Zero-width edge spans mark synthesized tokens (operators, fallbacks)
///

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub file_id: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32, file_id: u32) -> Self {
        Self { start, end, file_id }
    }

    pub const fn dummy() -> Self {
        Self { start: 0, end: 0, file_id: 0 }
    }

    pub fn merge(self, other: Span) -> Span {
        debug_assert_eq!(self.file_id, other.file_id, "Cannot merge spans from different files");
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            file_id: self.file_id,
        }
    }

    /// Zero-width span at the start of this one.
    pub const fn left_edge(self) -> Span {
        Span { start: self.start, end: self.start, file_id: self.file_id }
    }

    /// Zero-width span at the end of this one.
    pub const fn right_edge(self) -> Span {
        Span { start: self.end, end: self.end, file_id: self.file_id }
    }

    /// Smallest span covering every span yielded, or `fallback` when there are none.
    pub fn spanning(spans: impl IntoIterator<Item = Span>, fallback: Span) -> Span {
        spans.into_iter().reduce(Span::merge).unwrap_or(fallback)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}@{}", self.start, self.end, self.file_id)
    }
}

pub trait Spanned {
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i as u32 + 1))
            .collect();
        Self { name: name.into(), source, line_starts }
    }

    /// 1-based line and column of a byte offset.
    pub fn line_col(&self, offset: u32) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        (line + 1, col as usize + 1)
    }
}
