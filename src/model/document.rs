//! Plain-text line index: offset ↔ line conversion.

use crate::render::DocumentPositions;

/// Start offsets of every line in a plain-text document.
///
/// Offsets count characters, with each line terminator counting as one
/// position. There is always at least one line, even for empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStarts {
    /// Character offset at which each line starts.
    starts: Vec<usize>,
    /// Total character count, terminators included.
    len: usize,
}

impl LineStarts {
    /// Build the index from a list of lines (without terminators).
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut starts = Vec::with_capacity(lines.len().max(1));
        let mut offset = 0;
        for line in lines {
            starts.push(offset);
            offset += line.as_ref().chars().count() + 1;
        }
        if starts.is_empty() {
            starts.push(0);
            offset = 1;
        }
        Self {
            starts,
            // The last line has no terminator.
            len: offset - 1,
        }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Total character count.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the document has no characters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl DocumentPositions for LineStarts {
    fn line_from_position(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert_at) => insert_at.saturating_sub(1),
        }
    }

    fn line_start(&self, line: usize) -> usize {
        self.starts
            .get(line)
            .copied()
            .unwrap_or(self.len)
    }

    fn line_end(&self, line: usize) -> usize {
        match self.starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.len,
        }
    }
}
