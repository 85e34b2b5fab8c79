/// 5250 Protocol Constants and Codes
///
/// Operator error codes, attention identifier (AID) codes, display attribute
/// bytes and the field control words recognised in the host field table.
/// Values follow the 5494 Functions Reference (SC30-3533-04).

/// Operator Error Codes
/// See 5494 User's Guide (GA27-3960-03) 2.3.4
pub const ERR_DONT_KNOW: u8 = 0x01;
pub const ERR_BYPASS_FIELD: u8 = 0x04;
pub const ERR_NO_FIELD: u8 = 0x05;
pub const ERR_MANDATORY_ENTRY: u8 = 0x07;
pub const ERR_ALPHA_ONLY: u8 = 0x08;
pub const ERR_NUMERIC_ONLY: u8 = 0x09;
pub const ERR_DIGITS_ONLY: u8 = 0x10;
pub const ERR_LAST_SIGNED: u8 = 0x11;
pub const ERR_NO_ROOM: u8 = 0x12;
pub const ERR_MANDATORY_FILL: u8 = 0x14;
pub const ERR_NOT_SIGNED: u8 = 0x16;
pub const ERR_EXIT_NOT_VALID: u8 = 0x18;
pub const ERR_DUP_NOT_ENABLED: u8 = 0x19;
pub const ERR_LAST_POSITION_NUMERIC: u8 = 0x26;

/// DBCS Support (Japan)
pub const ERR_DBCS_WRONG_TYPE: u8 = 0x60;
pub const ERR_SBCS_WRONG_TYPE: u8 = 0x61;

/// Error Messages
pub const MSG_DONT_KNOW: &str = "Keyboard overrun.";
pub const MSG_BYPASS_FIELD: &str = "Entry of data not allowed in this input/output field.";
pub const MSG_NO_FIELD: &str = "Cursor in protected area of display.";
pub const MSG_MANDATORY_ENTRY: &str = "Mandatory data entry field. Must have data entered.";
pub const MSG_ALPHA_ONLY: &str = "Field requires alphabetic characters.";
pub const MSG_NUMERIC_ONLY: &str = "Field requires numeric characters.";
pub const MSG_DIGITS_ONLY: &str = "Only characters 0 through 9 allowed.";
pub const MSG_LAST_SIGNED: &str = "Key for sign position of field not valid.";
pub const MSG_NO_ROOM: &str = "No room to insert data.";
pub const MSG_MANDATORY_FILL: &str = "Mandatory fill field. Must fill to exit.";
pub const MSG_NOT_SIGNED: &str = "Field Minus key not valid in field.";
pub const MSG_EXIT_NOT_VALID: &str = "The key used to exit field not valid.";
pub const MSG_DUP_NOT_ENABLED: &str = "Duplicate key or Field Mark key not allowed in field.";
pub const MSG_LAST_POSITION_NUMERIC: &str = "Numeric character required in last position of field.";
pub const MSG_DBCS_WRONG_TYPE: &str = "Field requires alphanumeric characters.";
pub const MSG_SBCS_WRONG_TYPE: &str = "Field requires double-byte characters.";

/// Helper function to get error message for a given error code
pub fn get_error_message(error_code: u8) -> Option<&'static str> {
    match error_code {
        ERR_DONT_KNOW => Some(MSG_DONT_KNOW),
        ERR_BYPASS_FIELD => Some(MSG_BYPASS_FIELD),
        ERR_NO_FIELD => Some(MSG_NO_FIELD),
        ERR_MANDATORY_ENTRY => Some(MSG_MANDATORY_ENTRY),
        ERR_ALPHA_ONLY => Some(MSG_ALPHA_ONLY),
        ERR_NUMERIC_ONLY => Some(MSG_NUMERIC_ONLY),
        ERR_DIGITS_ONLY => Some(MSG_DIGITS_ONLY),
        ERR_LAST_SIGNED => Some(MSG_LAST_SIGNED),
        ERR_NO_ROOM => Some(MSG_NO_ROOM),
        ERR_MANDATORY_FILL => Some(MSG_MANDATORY_FILL),
        ERR_NOT_SIGNED => Some(MSG_NOT_SIGNED),
        ERR_EXIT_NOT_VALID => Some(MSG_EXIT_NOT_VALID),
        ERR_DUP_NOT_ENABLED => Some(MSG_DUP_NOT_ENABLED),
        ERR_LAST_POSITION_NUMERIC => Some(MSG_LAST_POSITION_NUMERIC),
        ERR_DBCS_WRONG_TYPE => Some(MSG_DBCS_WRONG_TYPE),
        ERR_SBCS_WRONG_TYPE => Some(MSG_SBCS_WRONG_TYPE),
        _ => None,
    }
}

/// Display Attributes
/// C.f. 5494 Functions Reference (SC30-3533-04), Section 15.6.12.3.
/// Bits 0-2 always set to 001 to identify as an attribute byte.
pub const ATTR_5250_GREEN: u8 = 0x20;   // Default
pub const ATTR_5250_WHITE: u8 = 0x22;
pub const ATTR_5250_NONDISP: u8 = 0x27; // Nondisplay
pub const ATTR_5250_RED: u8 = 0x28;
pub const ATTR_5250_TURQ: u8 = 0x30;
pub const ATTR_5250_YELLOW: u8 = 0x32;
pub const ATTR_5250_PINK: u8 = 0x38;
pub const ATTR_5250_BLUE: u8 = 0x3A;

pub const ATTR_5250_NORMAL: u8 = ATTR_5250_GREEN;

/// Run-list attribute that terminates the preceding run
pub const ATTR_RUN_TERMINATOR: u8 = ATTR_5250_GREEN;

/// Field control words that select a DBCS subtype
pub const FCW_DBCS_ONLY: u16 = 0x8200;
pub const FCW_DBCS_GRAPHIC: u16 = 0x8220;
pub const FCW_DBCS_EITHER: u16 = 0x8240;
pub const FCW_DBCS_OPEN: u16 = 0x8280;
pub const FCW_DBCS_OPEN_ALT: u16 = 0x8281;
pub const FCW_DBCS_OPEN_PURE: u16 = 0x82C0;

/// Placeholder written by the Dup key; never transmitted to the host
pub const DUP_MARKER: char = '\u{1C}';

/// Maximum number of entries in the format table
pub const MAX_FIELDS: usize = 256;

/// Number of command keys covered by the attention-key switch set
pub const COMMAND_KEY_COUNT: usize = 24;

/// AID codes
pub const AID_ENTER: u8 = 0xF1;
pub const AID_HELP: u8 = 0xF3;
pub const AID_ROLL_DOWN: u8 = 0xF4;
pub const AID_ROLL_UP: u8 = 0xF5;
pub const AID_PRINT: u8 = 0xF6;
pub const AID_RECORD_BACKSPACE: u8 = 0xF8;
pub const AID_CLEAR: u8 = 0xBD;
pub const AID_F1: u8 = 0x31;
pub const AID_F13: u8 = 0xB1;
/// Pseudo AID sent with the Attn / SysReq telnet flags
pub const AID_NONE: u8 = 0x00;

/// Attention identifier for a host round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AidKey {
    Enter,
    Help,
    RollDown,
    RollUp,
    Print,
    RecordBackspace,
    Clear,
    /// Command keys F1..F24
    Function(u8),
    /// Attn / SysReq carry no AID of their own
    None,
}

impl AidKey {
    /// Wire value of the AID
    pub fn code(self) -> u8 {
        match self {
            AidKey::Enter => AID_ENTER,
            AidKey::Help => AID_HELP,
            AidKey::RollDown => AID_ROLL_DOWN,
            AidKey::RollUp => AID_ROLL_UP,
            AidKey::Print => AID_PRINT,
            AidKey::RecordBackspace => AID_RECORD_BACKSPACE,
            AidKey::Clear => AID_CLEAR,
            AidKey::Function(n @ 1..=12) => AID_F1 + (n - 1),
            AidKey::Function(n @ 13..=24) => AID_F13 + (n - 13),
            AidKey::Function(_) => AID_NONE,
            AidKey::None => AID_NONE,
        }
    }

    /// Convert a wire value back to an AID
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            AID_ENTER => Some(AidKey::Enter),
            AID_HELP => Some(AidKey::Help),
            AID_ROLL_DOWN => Some(AidKey::RollDown),
            AID_ROLL_UP => Some(AidKey::RollUp),
            AID_PRINT => Some(AidKey::Print),
            AID_RECORD_BACKSPACE => Some(AidKey::RecordBackspace),
            AID_CLEAR => Some(AidKey::Clear),
            0x31..=0x3C => Some(AidKey::Function(value - AID_F1 + 1)),
            0xB1..=0xBC => Some(AidKey::Function(value - AID_F13 + 13)),
            AID_NONE => Some(AidKey::None),
            _ => None,
        }
    }

    /// Index into the attention-key switch set (F1 = bit 0)
    pub fn command_key_index(self) -> Option<usize> {
        match self {
            AidKey::Function(n @ 1..=24) => Some(n as usize - 1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(get_error_message(ERR_NO_FIELD), Some(MSG_NO_FIELD));
        assert_eq!(get_error_message(ERR_LAST_POSITION_NUMERIC), Some(MSG_LAST_POSITION_NUMERIC));
        assert_eq!(get_error_message(0xFF), None);
    }

    #[test]
    fn test_field_attributes() {
        assert_eq!(ATTR_5250_NORMAL, ATTR_5250_GREEN);
        assert_eq!(ATTR_RUN_TERMINATOR, 0x20);
    }

    #[test]
    fn test_aid_codes() {
        assert_eq!(AidKey::Enter.code(), 241);
        assert_eq!(AidKey::Function(1).code(), 0x31);
        assert_eq!(AidKey::Function(12).code(), 0x3C);
        assert_eq!(AidKey::Function(13).code(), 0xB1);
        assert_eq!(AidKey::Function(24).code(), 0xBC);
        assert_eq!(AidKey::from_u8(0xB5), Some(AidKey::Function(17)));
        assert_eq!(AidKey::from_u8(0x99), None);
    }

    #[test]
    fn test_command_key_index() {
        assert_eq!(AidKey::Function(1).command_key_index(), Some(0));
        assert_eq!(AidKey::Function(24).command_key_index(), Some(23));
        assert_eq!(AidKey::Enter.command_key_index(), None);
    }
}
