//! Buffer addressing for the 5250 regeneration buffer
//!
//! The host sends the screen as one flat buffer, row-major. Positions map to
//! (row, col) by plain arithmetic until double-byte characters appear; from
//! then on the on-screen column of a cell depends on how many double-width
//! cells precede it in the row, so the buffer has to be consulted.

/// Converts between (row, col) coordinates and linear buffer positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferMapping {
    rows: usize,
    cols: usize,
}

impl BufferMapping {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of positions in the buffer
    pub fn buffer_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Convert (row, col) coordinates to a buffer position (0-based)
    pub fn coord_to_pos(&self, row: usize, col: usize) -> usize {
        col + row * self.cols
    }

    /// Row of a buffer position
    pub fn row_from_pos(&self, pos: usize) -> usize {
        pos / self.cols
    }

    /// Column of a buffer position for a single-byte session
    pub fn col_from_pos(&self, pos: usize) -> usize {
        pos % self.cols
    }

    /// Display column of a buffer position when double-byte characters may
    /// be present.
    ///
    /// Walks from the start of the row, counting 2 columns for every
    /// double-byte cell and 1 for every other cell before `pos`.
    pub fn col_from_pos_dbcs(&self, pos: usize, buffer: &[char]) -> usize {
        let row_start = self.row_from_pos(pos) * self.cols;
        buffer
            .iter()
            .take(pos.min(buffer.len()))
            .skip(row_start)
            .map(|&ch| if is_double_byte(ch) { 2 } else { 1 })
            .sum()
    }

    /// Convert a buffer position to (row, col)
    pub fn pos_to_coord(&self, pos: usize) -> (usize, usize) {
        (self.row_from_pos(pos), self.col_from_pos(pos))
    }

    /// Check if a position is addressable
    pub fn contains(&self, pos: usize) -> bool {
        pos < self.buffer_len()
    }
}

/// Whether a character occupies two display columns.
///
/// Covers the East Asian wide ranges a 5250 DBCS session can carry:
/// Hangul Jamo, CJK radicals through Yi, Hangul syllables, CJK
/// compatibility ideographs and the full-width forms.
pub fn is_double_byte(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD
        | 0x30000..=0x3FFFD)
}
