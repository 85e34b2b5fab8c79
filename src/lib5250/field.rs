//! Field format word decoding and field metadata for 5250
//!
//! Each entry of the host field table carries a 16-bit field format word
//! (FFW). Bits are numbered IBM style: bit 0 is the most significant bit.

use super::codes::*;

/// Index of a field inside its `DataSet`
pub type FieldIndex = usize;

/// Keyboard shift discipline of a field (FFW bits 5-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftEdit {
    #[default]
    AlphaShift,
    AlphaOnly,
    NumericShift,
    NumericOnly,
    KatakanaShift,
    DigitsOnly,
    IoFeature,
    SignedNumeric,
}

impl ShiftEdit {
    fn from_bits(bits: u16) -> Self {
        match bits & 0x7 {
            0 => ShiftEdit::AlphaShift,
            1 => ShiftEdit::AlphaOnly,
            2 => ShiftEdit::NumericShift,
            3 => ShiftEdit::NumericOnly,
            4 => ShiftEdit::KatakanaShift,
            5 => ShiftEdit::DigitsOnly,
            6 => ShiftEdit::IoFeature,
            _ => ShiftEdit::SignedNumeric,
        }
    }

    /// Fields whose content is a number right-aligned on exit
    pub fn is_numeric(self) -> bool {
        matches!(self, ShiftEdit::NumericOnly | ShiftEdit::SignedNumeric | ShiftEdit::DigitsOnly)
    }
}

/// Right-adjust / mandatory-fill behaviour (FFW bits 13-15)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustFill {
    #[default]
    NoAdjust,
    RightAdjustZeroFill,
    RightAdjustBlankFill,
    MandatoryFill,
}

impl AdjustFill {
    fn from_bits(bits: u16) -> Self {
        match bits & 0x7 {
            5 => AdjustFill::RightAdjustZeroFill,
            6 => AdjustFill::RightAdjustBlankFill,
            7 => AdjustFill::MandatoryFill,
            _ => AdjustFill::NoAdjust,
        }
    }
}

/// Double-byte subtype of a field, from its field control words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbcsType {
    /// Single-byte only
    #[default]
    None,
    /// DBCS only
    J,
    /// Graphic, passed through unchecked
    G,
    /// Either, decided by the first character already in the field
    E,
    /// Open, mixed SBCS and DBCS
    O,
}

impl DbcsType {
    /// Pick the subtype from the trailing field control words of a field
    /// table entry. The first recognised word wins.
    pub fn from_fcws(fcws: &[u16]) -> Self {
        fcws.iter()
            .find_map(|&fcw| match fcw {
                FCW_DBCS_ONLY => Some(DbcsType::J),
                FCW_DBCS_GRAPHIC => Some(DbcsType::G),
                FCW_DBCS_EITHER => Some(DbcsType::E),
                FCW_DBCS_OPEN | FCW_DBCS_OPEN_ALT | FCW_DBCS_OPEN_PURE => Some(DbcsType::O),
                _ => None,
            })
            .unwrap_or_default()
    }
}

// FFW bit masks, IBM numbering
const FFW_ID_MASK: u16 = 0xC000;
const FFW_ID: u16 = 0x4000;
const FFW_BYPASS: u16 = 0x2000;
const FFW_DUP: u16 = 0x1000;
const FFW_MDT: u16 = 0x0800;
const FFW_SHIFT_SHIFT: u16 = 8;
const FFW_AUTO_ENTER: u16 = 0x0080;
const FFW_FER: u16 = 0x0040;
const FFW_MONOCASE: u16 = 0x0020;
const FFW_MANDATORY_ENTER: u16 = 0x0008;

/// Decoded field format word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldFormatWord {
    /// Field accepts no keyboard input
    pub bypass: bool,
    /// Dup / Field Mark keys enabled
    pub dup: bool,
    /// Modified data tag
    pub mdt: bool,
    pub shift_edit: ShiftEdit,
    /// Submit automatically when the field is exited
    pub auto_enter: bool,
    /// Field must be left with a field exit key
    pub field_exit_required: bool,
    /// Uppercase operator input
    pub monocase: bool,
    pub mandatory_enter: bool,
    pub adjust_fill: AdjustFill,
}

impl FieldFormatWord {
    /// Decode a 16-bit FFW. Returns `None` unless bits 0-1 are `01`.
    pub fn factory(word: u16) -> Option<Self> {
        if word & FFW_ID_MASK != FFW_ID {
            return None;
        }

        Some(Self {
            bypass: word & FFW_BYPASS != 0,
            dup: word & FFW_DUP != 0,
            mdt: word & FFW_MDT != 0,
            shift_edit: ShiftEdit::from_bits(word >> FFW_SHIFT_SHIFT),
            auto_enter: word & FFW_AUTO_ENTER != 0,
            field_exit_required: word & FFW_FER != 0,
            monocase: word & FFW_MONOCASE != 0,
            mandatory_enter: word & FFW_MANDATORY_ENTER != 0,
            adjust_fill: AdjustFill::from_bits(word),
        })
    }

    /// Check if the field takes keyboard input at all
    pub fn accepts_input(&self) -> bool {
        !self.bypass && self.shift_edit != ShiftEdit::IoFeature
    }
}

/// One input field of the current screen
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Start position (row, col) - 0-based
    pub row: usize,
    pub col: usize,
    /// Field length (number of buffer positions)
    pub len: usize,
    pub ffw: FieldFormatWord,
    pub dbcs: DbcsType,
    /// Number of trailing positions filled by the Dup key
    pub dup_chars: usize,
}

impl Field {
    pub fn new(row: usize, col: usize, len: usize, ffw: FieldFormatWord) -> Self {
        Self {
            row,
            col,
            len,
            ffw,
            dbcs: DbcsType::None,
            dup_chars: 0,
        }
    }

    pub fn with_dbcs(mut self, dbcs: DbcsType) -> Self {
        self.dbcs = dbcs;
        self
    }

    /// First buffer position of the field
    pub fn start_pos(&self, cols: usize) -> usize {
        self.col + self.row * cols
    }

    /// One past the last buffer position of the field
    pub fn end_pos(&self, cols: usize) -> usize {
        self.start_pos(cols) + self.len
    }

    /// Last buffer position of the field
    pub fn last_pos(&self, cols: usize) -> usize {
        self.end_pos(cols).saturating_sub(1)
    }

    /// Check if a buffer position is within this field
    pub fn contains(&self, pos: usize, cols: usize) -> bool {
        pos >= self.start_pos(cols) && pos < self.end_pos(cols)
    }

    /// Set the modified data tag
    pub fn set_modified(&mut self, modified: bool) {
        self.ffw.mdt = modified;
    }

    pub fn is_modified(&self) -> bool {
        self.ffw.mdt
    }

    /// Whether the last position is reserved for a sign
    pub fn has_sign_position(&self) -> bool {
        self.ffw.shift_edit == ShiftEdit::SignedNumeric
    }
}
