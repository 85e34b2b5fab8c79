//! Host-bound request encoding
//!
//! A submit sends the AID, the 1-based cursor position and every field of
//! the format table as one comma-separated line:
//!
//! ```text
//! <aid>,<row>,<col>,<count>[,<row>,<col>,<len>,<value>]*
//! ```
//!
//! The line travels base64-encoded (UTF-8) together with the list of
//! dup-filled field indices and the two telnet flag characters.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::codes::*;
use super::dataset::DataSet;
use super::field::{AdjustFill, Field};
use super::screen::Screen;
use crate::error::{ConfigError, OperatorError, OperatorResult};

/// Attention / system request flags sent beside the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TelnetFlags {
    pub attn: bool,
    pub sys_req: bool,
}

impl TelnetFlags {
    pub fn attn() -> Self {
        Self { attn: true, sys_req: false }
    }

    pub fn sys_req() -> Self {
        Self { attn: false, sys_req: true }
    }
}

impl fmt::Display for TelnetFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |on: bool| if on { '1' } else { '0' };
        write!(f, "{}{}", flag(self.attn), flag(self.sys_req))
    }
}

impl FromStr for TelnetFlags {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidParameter {
            parameter: "request.telnetFlags".to_string(),
            value: value.to_string(),
            reason: "expected two characters, each '0' or '1'".to_string(),
        };
        let flag = |ch: char| match ch {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(invalid()),
        };
        let chars: Vec<char> = value.chars().collect();
        if chars.len() != 2 {
            return Err(invalid());
        }
        Ok(Self { attn: flag(chars[0])?, sys_req: flag(chars[1])? })
    }
}

/// One encoded host request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// base64 of the UTF-8 request line
    pub data: String,
    /// Comma-joined indices of dup-filled fields
    pub dup_fields: String,
    /// Two characters, attn then sysreq
    pub telnet_flags: String,
}

impl Request {
    /// Decode `data` back into the request line
    pub fn plaintext(&self) -> Option<String> {
        let bytes = STANDARD.decode(&self.data).ok()?;
        String::from_utf8(bytes).ok()
    }
}

/// Field content as sent to the host: text before any dup marker,
/// trailing nulls dropped, interior nulls sent as blanks
pub fn field_value(screen: &Screen, field: &Field) -> String {
    let cols = screen.cols();
    let cells = &screen.buffer()[field.start_pos(cols)..field.end_pos(cols).min(screen.len())];
    let before_dup = cells.iter().position(|&ch| ch == DUP_MARKER).unwrap_or(cells.len());
    let used = cells[..before_dup]
        .iter()
        .rposition(|&ch| ch != '\0')
        .map_or(0, |last| last + 1);
    cells[..used]
        .iter()
        .map(|&ch| if ch == '\0' { ' ' } else { ch })
        .collect()
}

/// Builds requests for one AID
#[derive(Debug, Clone, Copy)]
pub struct RequestEncoder {
    aid: AidKey,
    telnet_flags: TelnetFlags,
}

impl RequestEncoder {
    pub fn new(aid: AidKey) -> Self {
        Self { aid, telnet_flags: TelnetFlags::default() }
    }

    pub fn with_telnet_flags(mut self, flags: TelnetFlags) -> Self {
        self.telnet_flags = flags;
        self
    }

    pub fn aid(&self) -> AidKey {
        self.aid
    }

    /// Check mandatory-entry and mandatory-fill fields unless the AID is a
    /// command key marked in the switch set, or the request carries no AID
    /// (Attn, SysReq). On failure the cursor moves to the offending field.
    pub fn validate(&self, screen: &mut Screen, data: &DataSet) -> OperatorResult<()> {
        if self.aid == AidKey::None || data.bypasses_validation(self.aid) {
            log::debug!("{:?} bypasses field validation", self.aid);
            return Ok(());
        }

        let cols = screen.cols();
        let any_modified = data.any_modified();
        for field in data.fields() {
            let error = if field.ffw.mandatory_enter && !(any_modified && field.is_modified()) {
                Some(OperatorError::MandatoryEntry)
            } else if field.ffw.adjust_fill == AdjustFill::MandatoryFill && !data.is_field_filled(field, cols) {
                Some(OperatorError::MandatoryFill)
            } else {
                None
            };

            if let Some(error) = error {
                log::debug!("submit rejected at ({}, {}): {}", field.row, field.col, error);
                screen.set_cursor(field.row, field.col);
                return Err(error);
            }
        }
        Ok(())
    }

    /// The request line before base64
    pub fn plaintext(&self, screen: &Screen, data: &DataSet) -> String {
        let cursor = screen.cursor();
        let mut parts = vec![
            self.aid.code().to_string(),
            (cursor.row + 1).to_string(),
            (cursor.col + 1).to_string(),
            data.field_count().to_string(),
        ];
        for field in data.fields() {
            let value = field_value(screen, field);
            parts.push((field.row + 1).to_string());
            parts.push((field.col + 1).to_string());
            parts.push(value.chars().count().to_string());
            parts.push(value);
        }
        parts.join(",")
    }

    /// Validate and encode a request
    pub fn encode(&self, screen: &mut Screen, data: &DataSet) -> OperatorResult<Request> {
        self.validate(screen, data)?;
        let line = self.plaintext(screen, data);
        log::trace!("request line: {line}");

        let dup_fields = data
            .dup_field_indices()
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Ok(Request {
            data: STANDARD.encode(line.as_bytes()),
            dup_fields,
            telnet_flags: self.telnet_flags.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib5250::field::FieldFormatWord;
    use crate::lib5250::screen::ScreenSize;

    fn one_field(ffw: u16) -> (Screen, DataSet) {
        let mut screen = Screen::new(ScreenSize::STANDARD);
        let mut data = DataSet::new(screen.len());
        let field = Field::new(0, 0, 2, FieldFormatWord::factory(ffw).unwrap());
        let index = data.add_field(field.clone()).unwrap();
        screen.apply_field(index, &field);
        (screen, data)
    }

    #[test]
    fn test_plaintext_single_field() {
        let (mut screen, data) = one_field(0x4000);
        screen.load_regeneration_buffer("AB");
        let encoder = RequestEncoder::new(AidKey::Enter);
        assert_eq!(encoder.plaintext(&screen, &data), "241,1,1,1,1,1,2,AB");

        let request = encoder.encode(&mut screen, &data).unwrap();
        assert_eq!(request.data, STANDARD.encode("241,1,1,1,1,1,2,AB"));
        assert_eq!(request.plaintext().as_deref(), Some("241,1,1,1,1,1,2,AB"));
        assert_eq!(request.telnet_flags, "00");
        assert_eq!(request.dup_fields, "");
    }

    #[test]
    fn test_field_value_trims_nulls_and_stops_at_dup() {
        let (mut screen, data) = one_field(0x4000);
        let field = data.field(0).unwrap().clone();
        screen.set_char(0, 'A');
        assert_eq!(field_value(&screen, &field), "A");
        screen.set_char(0, '\0');
        screen.set_char(1, 'B');
        assert_eq!(field_value(&screen, &field), " B");
        screen.set_char(0, 'Z');
        screen.set_char(1, DUP_MARKER);
        assert_eq!(field_value(&screen, &field), "Z");
    }

    #[test]
    fn test_mandatory_entry_blocks_and_moves_cursor() {
        let mut screen = Screen::new(ScreenSize::STANDARD);
        let mut data = DataSet::new(screen.len());
        let mandatory = FieldFormatWord::factory(0x4008).unwrap();
        data.add_field(Field::new(3, 20, 5, mandatory)).unwrap();
        let err = RequestEncoder::new(AidKey::Enter).encode(&mut screen, &data).unwrap_err();
        assert_eq!(err, OperatorError::MandatoryEntry);
        assert_eq!((screen.cursor().row, screen.cursor().col), (3, 20));
    }

    #[test]
    fn test_command_key_switch_skips_validation() {
        let mut screen = Screen::new(ScreenSize::STANDARD);
        let mut data = DataSet::new(screen.len());
        let mandatory = FieldFormatWord::factory(0x4008).unwrap();
        data.add_field(Field::new(3, 20, 5, mandatory)).unwrap();
        data.set_command_key_switches([0b100, 0, 0]);
        assert!(RequestEncoder::new(AidKey::Function(3)).encode(&mut screen, &data).is_ok());
        assert!(RequestEncoder::new(AidKey::Function(4)).encode(&mut screen, &data).is_err());
    }

    #[test]
    fn test_mandatory_fill_uses_touched_map() {
        let (mut screen, mut data) = one_field(0x4007);
        data.mark_touched(0);
        let encoder = RequestEncoder::new(AidKey::Enter);
        assert_eq!(encoder.encode(&mut screen, &data).unwrap_err(), OperatorError::MandatoryFill);
        data.mark_touched(1);
        assert!(encoder.encode(&mut screen, &data).is_ok());
    }

    #[test]
    fn test_dup_fields_listed() {
        let (mut screen, mut data) = one_field(0x5000);
        data.field_mut(0).unwrap().dup_chars = 2;
        let request = RequestEncoder::new(AidKey::Enter).encode(&mut screen, &data).unwrap();
        assert_eq!(request.dup_fields, "0");
    }

    #[test]
    fn test_telnet_flags_text() {
        assert_eq!(TelnetFlags::attn().to_string(), "10");
        assert_eq!(TelnetFlags::sys_req().to_string(), "01");
        assert_eq!("01".parse::<TelnetFlags>().unwrap(), TelnetFlags::sys_req());
        assert!("0".parse::<TelnetFlags>().is_err());
        assert!("2x".parse::<TelnetFlags>().is_err());
    }
}
