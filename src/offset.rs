//! Source positions for CSS tokens, parse errors, and warnings.
//!
//! A [`FileOffset`] is either a byte index into the string currently being
//! tokenized, or the sentinel "end of string". Line/column numbers are never
//! stored directly; they are derived on demand from a [`LineColLookup`] built
//! once per input, so errors and warnings resolve their position lazily
//! instead of eagerly scanning for line breaks on every token.

use std::fmt;

/// A byte position in a CSS or XML input string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileOffset {
    /// A byte index into the input.
    Offset(usize),
    /// The position just past the end of the input.
    EndOfString,
}

impl FileOffset {
    pub fn offset(index: usize) -> FileOffset {
        FileOffset::Offset(index)
    }

    /// Returns the byte index, treating `EndOfString` as `len`.
    pub fn resolve(&self, len: usize) -> usize {
        match *self {
            FileOffset::Offset(i) => i,
            FileOffset::EndOfString => len,
        }
    }
}

impl fmt::Display for FileOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FileOffset::Offset(i) => write!(f, "{}", i),
            FileOffset::EndOfString => write!(f, "<end of string>"),
        }
    }
}

/// A 1-based line and 0-based column, resolved from a [`FileOffset`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

/// Precomputed table of newline start offsets for an input string, used to
/// resolve a [`FileOffset`] into a [`LineCol`] without rescanning the whole
/// input for every error or warning.
pub struct LineColLookup {
    /// Byte offset of the first character of each line. `line_starts[0]` is
    /// always 0.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineColLookup {
    pub fn new(input: &str) -> LineColLookup {
        let mut line_starts = vec![0];
        for (i, b) in input.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineColLookup {
            line_starts,
            len: input.len(),
        }
    }

    /// Resolves an offset into a 1-based line and 0-based column.
    pub fn resolve(&self, offset: FileOffset) -> LineCol {
        let byte = offset.resolve(self.len);
        // Find the last line start that is <= byte.
        let line_index = match self.line_starts.binary_search(&byte) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        LineCol {
            line: line_index + 1,
            column: byte - self.line_starts[line_index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_line() {
        let table = LineColLookup::new("hello world");
        assert_eq!(
            table.resolve(FileOffset::offset(6)),
            LineCol { line: 1, column: 6 }
        );
    }

    #[test]
    fn resolves_later_lines() {
        let table = LineColLookup::new("abc\ndef\nghi");
        assert_eq!(
            table.resolve(FileOffset::offset(0)),
            LineCol { line: 1, column: 0 }
        );
        assert_eq!(
            table.resolve(FileOffset::offset(4)),
            LineCol { line: 2, column: 0 }
        );
        assert_eq!(
            table.resolve(FileOffset::offset(9)),
            LineCol { line: 3, column: 1 }
        );
    }

    #[test]
    fn resolves_end_of_string() {
        let table = LineColLookup::new("abc\ndef");
        assert_eq!(
            table.resolve(FileOffset::EndOfString),
            LineCol { line: 2, column: 3 }
        );
    }
}
