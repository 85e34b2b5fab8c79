//! 5250 screen buffer and attribute map
//!
//! The screen is a flat character buffer with a parallel attribute map. Each
//! attribute entry records whether the position belongs to an input field
//! and, if so, the index of that field in the current `DataSet`.

use std::fmt;

use super::codes::*;
use super::field::{Field, FieldIndex};
use super::mapping::{is_double_byte, BufferMapping};

/// Display colors of the 5250 attribute byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Green,
    White,
    Red,
    Turquoise,
    Yellow,
    Pink,
    Blue,
    NonDisplay,
}

/// Display attributes of one buffer position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenAttr {
    pub color: Color,
    pub reverse: bool,
    pub underscore: bool,
    pub blink: bool,
    pub non_display: bool,
    pub column_separator: bool,
}

impl ScreenAttr {
    /// Decode a 5250 attribute byte (0x20..=0x3F).
    /// Anything outside the attribute range decodes to the default.
    pub fn from_code(code: u8) -> Self {
        let low = code & 0x07;
        let reverse = low & 0x01 != 0;
        let underscore = low & 0x04 != 0;

        match code {
            0x27 | 0x2F | 0x37 | 0x3F => Self {
                color: Color::NonDisplay,
                non_display: true,
                ..Self::default()
            },
            0x20..=0x26 => Self {
                color: if low & 0x02 != 0 { Color::White } else { Color::Green },
                reverse,
                underscore,
                ..Self::default()
            },
            0x28..=0x2E => Self {
                color: Color::Red,
                reverse,
                underscore,
                blink: low & 0x02 != 0,
                ..Self::default()
            },
            0x30..=0x36 => Self {
                color: if low & 0x02 != 0 { Color::Yellow } else { Color::Turquoise },
                reverse,
                underscore,
                column_separator: !underscore,
                ..Self::default()
            },
            0x38..=0x3E => Self {
                color: if low & 0x02 != 0 { Color::Blue } else { Color::Pink },
                reverse,
                underscore,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Green with no highlighting
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Whether a position is host output or operator input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Usage {
    #[default]
    Output,
    Input,
}

/// Attribute map entry of one buffer position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenAttrEntry {
    pub usage: Usage,
    pub attr: ScreenAttr,
    /// Owning field, as an index into the `DataSet`
    pub field: Option<FieldIndex>,
}

/// Cursor position (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPos {
    pub row: usize,
    pub col: usize,
    pub blink: bool,
}

/// Screen dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub rows: usize,
    pub cols: usize,
    /// Message light indicator on
    pub msg_light: bool,
}

impl ScreenSize {
    /// Standard 24x80 display
    pub const STANDARD: ScreenSize = ScreenSize { rows: 24, cols: 80, msg_light: false };
    /// Alternate 27x132 display
    pub const WIDE: ScreenSize = ScreenSize { rows: 27, cols: 132, msg_light: false };

    pub fn is_supported(rows: usize, cols: usize) -> bool {
        matches!((rows, cols), (24, 80) | (27, 132))
    }

    pub fn buffer_len(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Scan direction for `Screen::scan_attr_map`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Character buffer plus parallel attribute map of one host screen
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    buffer: Vec<char>,
    attr_map: Vec<ScreenAttrEntry>,
    cursor: CursorPos,
    size: ScreenSize,
}

impl Screen {
    /// Create an empty screen: every cell null, every entry default output
    pub fn new(size: ScreenSize) -> Self {
        let len = size.buffer_len();
        Self {
            buffer: vec!['\0'; len],
            attr_map: vec![ScreenAttrEntry::default(); len],
            cursor: CursorPos::default(),
            size,
        }
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn cols(&self) -> usize {
        self.size.cols
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn mapping(&self) -> BufferMapping {
        BufferMapping::new(self.size.rows, self.size.cols)
    }

    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    pub fn attr_map(&self) -> &[ScreenAttrEntry] {
        &self.attr_map
    }

    pub fn char_at(&self, pos: usize) -> char {
        self.buffer.get(pos).copied().unwrap_or('\0')
    }

    pub fn set_char(&mut self, pos: usize, ch: char) {
        if let Some(cell) = self.buffer.get_mut(pos) {
            *cell = ch;
        }
    }

    pub fn entry(&self, pos: usize) -> Option<&ScreenAttrEntry> {
        self.attr_map.get(pos)
    }

    pub fn set_attr(&mut self, pos: usize, attr: ScreenAttr) {
        if let Some(entry) = self.attr_map.get_mut(pos) {
            entry.attr = attr;
        }
    }

    /// Field owning a position, if any
    pub fn field_at(&self, pos: usize) -> Option<FieldIndex> {
        self.attr_map.get(pos).and_then(|entry| entry.field)
    }

    pub fn is_input(&self, pos: usize) -> bool {
        self.attr_map.get(pos).map_or(false, |entry| entry.usage == Usage::Input)
    }

    pub fn cursor(&self) -> CursorPos {
        self.cursor
    }

    /// Cursor as a buffer position
    pub fn cursor_pos(&self) -> usize {
        self.mapping().coord_to_pos(self.cursor.row, self.cursor.col)
    }

    /// Set cursor position (0-based coordinates); out-of-range is ignored
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        if row < self.size.rows && col < self.size.cols {
            self.cursor.row = row;
            self.cursor.col = col;
        }
    }

    pub fn set_cursor_blink(&mut self, blink: bool) {
        self.cursor.blink = blink;
    }

    /// Move the cursor to a buffer position
    pub fn set_cursor_pos(&mut self, pos: usize) {
        if pos < self.len() {
            let (row, col) = self.mapping().pos_to_coord(pos);
            self.set_cursor(row, col);
        }
    }

    /// Fill the buffer from a regeneration buffer, one character per
    /// position. A short buffer leaves the remaining cells null.
    pub fn load_regeneration_buffer(&mut self, text: &str) {
        let len = self.len();
        self.buffer.iter_mut().for_each(|cell| *cell = '\0');
        for (cell, ch) in self.buffer.iter_mut().zip(text.chars()) {
            *cell = ch;
        }
        let supplied = text.chars().count();
        if supplied > len {
            log::debug!("regeneration buffer truncated: {supplied} characters for {len} positions");
        }
    }

    /// Apply an attribute run-list of `(position, attribute code)` change
    /// points.
    ///
    /// An attribute takes effect one position after its change point and
    /// runs through the next change point. A following change to plain
    /// green is a terminator and is consumed with the run. A run starting
    /// with a blank in column 0 starts one position later. The last change
    /// point without a successor runs to the end of the buffer.
    pub fn load_attributes(&mut self, runs: &[(usize, u8)]) {
        let len = self.len();
        let cols = self.size.cols;
        self.attr_map.iter_mut().for_each(|entry| entry.attr = ScreenAttr::default());

        let mut i = 0;
        while i < runs.len() {
            let (from, code) = runs[i];
            let (end, step) = match runs.get(i + 1) {
                Some(&(next, next_code)) => {
                    let step = if next_code == ATTR_RUN_TERMINATOR { 2 } else { 1 };
                    (next.saturating_add(1), step)
                }
                None => (len, 1),
            };

            let mut start = from.saturating_add(1);
            let end = end.min(len);
            if start < end && start % cols == 0 && self.buffer[start] == ' ' {
                start += 1;
            }

            let attr = ScreenAttr::from_code(code);
            for entry in self.attr_map.iter_mut().take(end).skip(start) {
                entry.attr = attr;
            }
            i += step;
        }
    }

    /// Mark the positions of a field as input owned by `index`
    pub fn apply_field(&mut self, index: FieldIndex, field: &Field) {
        let cols = self.size.cols;
        let end = field.end_pos(cols).min(self.len());
        for entry in self.attr_map.iter_mut().take(end).skip(field.start_pos(cols)) {
            entry.usage = Usage::Input;
            entry.field = Some(index);
        }
    }

    /// First position after the field containing `pos`.
    /// Scans forward until the attribute map turns to output; does not wrap.
    pub fn peek_one_past_end_of_field(&self, pos: usize) -> usize {
        let owner = self.field_at(pos);
        let mut end = pos;
        while end < self.len()
            && self.attr_map[end].usage == Usage::Input
            && self.attr_map[end].field == owner
        {
            end += 1;
        }
        end
    }

    /// Position just before the start of the field containing `pos`, or
    /// `None` when the field starts at position 0. Does not wrap.
    pub fn peek_one_prev_start_of_field(&self, pos: usize) -> Option<usize> {
        let owner = self.field_at(pos);
        let mut start = pos;
        while start > 0
            && self.attr_map[start - 1].usage == Usage::Input
            && self.attr_map[start - 1].field == owner
        {
            start -= 1;
        }
        start.checked_sub(1)
    }

    /// Start position of the field containing `pos`
    pub fn field_start(&self, pos: usize) -> usize {
        self.peek_one_prev_start_of_field(pos).map_or(0, |p| p + 1)
    }

    /// Next input position from `from` in `direction`, wrapping around the
    /// whole buffer once. `from` itself is checked last.
    pub fn scan_attr_map(&self, from: usize, direction: Direction) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let from = from.min(len - 1);
        (1..=len)
            .map(|step| match direction {
                Direction::Forward => (from + step) % len,
                Direction::Backward => (from + len - step % len) % len,
            })
            .find(|&pos| self.attr_map[pos].usage == Usage::Input)
    }

    /// Whether any double-byte character is on screen
    pub fn has_dbcs(&self) -> bool {
        self.buffer.iter().any(|&ch| is_double_byte(ch))
    }

    /// Display column of a position, DBCS-aware when needed
    pub fn display_col(&self, pos: usize) -> usize {
        let mapping = self.mapping();
        if self.has_dbcs() {
            mapping.col_from_pos_dbcs(pos, &self.buffer)
        } else {
            mapping.col_from_pos(pos)
        }
    }

    /// Printable text of one row; nulls show as blanks and dup markers as `*`
    pub fn row_text(&self, row: usize) -> String {
        let cols = self.size.cols;
        self.buffer
            .iter()
            .skip(row * cols)
            .take(cols)
            .map(|&ch| printable(ch))
            .collect()
    }

    /// Copy one row of `src` into row `dst_row` of this screen, cells and
    /// attribute entries alike. Widths must match.
    pub fn copy_row_from(&mut self, dst_row: usize, src: &Screen, src_row: usize) {
        let cols = self.size.cols;
        if src.cols() != cols || dst_row >= self.size.rows || src_row >= src.rows() {
            log::warn!("copy_row_from: incompatible rows {src_row} -> {dst_row}");
            return;
        }
        let dst = dst_row * cols;
        let from = src_row * cols;
        self.buffer[dst..dst + cols].copy_from_slice(&src.buffer[from..from + cols]);
        self.attr_map[dst..dst + cols].copy_from_slice(&src.attr_map[from..from + cols]);
    }

    /// Write text into one row starting at column 0, leaving the rest of the
    /// row null. Used for message-line output.
    pub fn write_row(&mut self, row: usize, text: &str, attr: ScreenAttr) {
        let cols = self.size.cols;
        if row >= self.size.rows {
            return;
        }
        let start = row * cols;
        let mut chars = text.chars();
        for pos in start..start + cols {
            self.buffer[pos] = chars.next().unwrap_or('\0');
            self.attr_map[pos] = ScreenAttrEntry { usage: Usage::Output, attr, field: None };
        }
    }
}

fn printable(ch: char) -> char {
    match ch {
        '\0' => ' ',
        DUP_MARKER => '*',
        other => other,
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size.rows {
            writeln!(f, "{}", self.row_text(row))?;
        }
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(ScreenSize::STANDARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib5250::field::FieldFormatWord;

    fn small_screen() -> Screen {
        // 27x132 is the only other legal size; tests mostly use 24x80
        Screen::new(ScreenSize::STANDARD)
    }

    #[test]
    fn test_new_screen_invariants() {
        let screen = small_screen();
        assert_eq!(screen.buffer().len(), 24 * 80);
        assert_eq!(screen.attr_map().len(), 24 * 80);
        assert!(screen.buffer().iter().all(|&ch| ch == '\0'));
        assert!(screen.attr_map().iter().all(|e| e.usage == Usage::Output));
    }

    #[test]
    fn test_from_code_table() {
        assert!(ScreenAttr::from_code(0x20).is_default());
        assert_eq!(ScreenAttr::from_code(0x22).color, Color::White);
        assert!(ScreenAttr::from_code(0x21).reverse);
        assert!(ScreenAttr::from_code(0x24).underscore);
        assert!(ScreenAttr::from_code(0x27).non_display);
        assert!(ScreenAttr::from_code(0x3F).non_display);
        let red_blink = ScreenAttr::from_code(0x2A);
        assert_eq!(red_blink.color, Color::Red);
        assert!(red_blink.blink);
        let turq = ScreenAttr::from_code(0x30);
        assert_eq!(turq.color, Color::Turquoise);
        assert!(turq.column_separator);
        assert_eq!(ScreenAttr::from_code(0x3A).color, Color::Blue);
        assert!(ScreenAttr::from_code(0x41).is_default());
    }

    #[test]
    fn test_load_regeneration_buffer_short_input() {
        let mut screen = small_screen();
        screen.load_regeneration_buffer("AB C");
        assert_eq!(screen.char_at(0), 'A');
        assert_eq!(screen.char_at(2), ' ');
        assert_eq!(screen.char_at(4), '\0');
    }

    #[test]
    fn test_load_attributes_run_with_terminator() {
        let mut screen = small_screen();
        screen.load_regeneration_buffer(&"x".repeat(1920));
        // white from 5, back to green at 10
        screen.load_attributes(&[(5, 0x22), (10, 0x20)]);
        assert!(screen.entry(5).unwrap().attr.is_default());
        assert_eq!(screen.entry(6).unwrap().attr.color, Color::White);
        assert_eq!(screen.entry(10).unwrap().attr.color, Color::White);
        assert!(screen.entry(11).unwrap().attr.is_default());
    }

    #[test]
    fn test_load_attributes_chained_runs_and_dangling_tail() {
        let mut screen = small_screen();
        screen.load_regeneration_buffer(&"x".repeat(1920));
        screen.load_attributes(&[(0, 0x28), (3, 0x3A)]);
        assert_eq!(screen.entry(1).unwrap().attr.color, Color::Red);
        assert_eq!(screen.entry(3).unwrap().attr.color, Color::Red);
        assert_eq!(screen.entry(4).unwrap().attr.color, Color::Blue);
        assert_eq!(screen.entry(1919).unwrap().attr.color, Color::Blue);
    }

    #[test]
    fn test_load_attributes_skips_leading_blank_in_column_zero() {
        let mut screen = small_screen();
        let mut text = "x".repeat(1920);
        text.replace_range(80..81, " ");
        screen.load_regeneration_buffer(&text);
        screen.load_attributes(&[(79, 0x22), (90, 0x20)]);
        assert!(screen.entry(80).unwrap().attr.is_default());
        assert_eq!(screen.entry(81).unwrap().attr.color, Color::White);
    }

    #[test]
    fn test_field_boundary_peeks() {
        let mut screen = small_screen();
        let field = Field::new(0, 10, 3, FieldFormatWord::default());
        screen.apply_field(0, &field);
        assert_eq!(screen.peek_one_past_end_of_field(10), 13);
        assert_eq!(screen.peek_one_past_end_of_field(12), 13);
        assert_eq!(screen.peek_one_prev_start_of_field(12), Some(9));
        assert_eq!(screen.field_start(11), 10);
    }

    #[test]
    fn test_field_at_origin_has_no_prev_position() {
        let mut screen = small_screen();
        let field = Field::new(0, 0, 4, FieldFormatWord::default());
        screen.apply_field(0, &field);
        assert_eq!(screen.peek_one_prev_start_of_field(3), None);
        assert_eq!(screen.field_start(3), 0);
    }

    #[test]
    fn test_scan_attr_map_wraps_once() {
        let mut screen = small_screen();
        let field = Field::new(0, 10, 3, FieldFormatWord::default());
        screen.apply_field(0, &field);
        assert_eq!(screen.scan_attr_map(500, Direction::Forward), Some(10));
        assert_eq!(screen.scan_attr_map(5, Direction::Backward), Some(12));
        assert_eq!(screen.scan_attr_map(10, Direction::Forward), Some(11));

        let empty = small_screen();
        assert_eq!(empty.scan_attr_map(0, Direction::Forward), None);
    }

    #[test]
    fn test_copy_row_is_deep() {
        let mut a = small_screen();
        a.write_row(23, "ERROR", ScreenAttr::from_code(0x28));
        let mut scratch = Screen::new(ScreenSize { rows: 1, cols: 80, msg_light: false });
        scratch.copy_row_from(0, &a, 23);
        a.set_char(23 * 80, 'Z');
        a.set_attr(23 * 80, ScreenAttr::default());
        assert_eq!(scratch.char_at(0), 'E');
        assert_eq!(scratch.entry(0).unwrap().attr.color, Color::Red);
    }

    #[test]
    fn test_display_renders_nulls_as_blanks() {
        let mut screen = small_screen();
        screen.load_regeneration_buffer("Hi");
        let text = screen.to_string();
        assert!(text.starts_with("Hi   "));
        assert_eq!(text.lines().count(), 24);
    }
}
