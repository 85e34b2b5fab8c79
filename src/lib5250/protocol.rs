//! Host stream codec
//!
//! The host pushes each screen as one JSON record. Positional data inside
//! the record (screen size, run-list, field table, cursor) travels as
//! comma-separated number lists; numbers are decimal or `0x`-prefixed hex.
//! This module turns a record into a fresh `Screen` and `DataSet`.

use serde::{Deserialize, Serialize};

use super::dataset::DataSet;
use super::field::{DbcsType, Field, FieldFormatWord};
use super::screen::{CursorPos, Screen, ScreenSize};
use crate::error::{ProtocolError, ProtocolResult};

/// One inbound host record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostStream {
    /// `"rows,cols[,m]"`
    pub screen_size: String,
    pub regeneration_buffer: String,
    /// Flat `position,attribute` change-point list
    pub regen_buffer_attributes: String,
    /// Flat `row,col,len,ffw,fcwLen[,fcw...]` entries
    pub field_table: String,
    /// Three decimal bytes, least significant first
    pub command_key_switches: String,
    /// `"row,col[,blink]"`
    pub cursor_position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_regeneration_buffer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_attributes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_cursor_position: Option<String>,
}

impl HostStream {
    /// Parse a record from its JSON text
    pub fn from_json(text: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the host attached an error line to this record
    pub fn has_error_line(&self) -> bool {
        self.error_regeneration_buffer
            .as_deref()
            .map_or(false, |text| !text.is_empty())
    }
}

/// Host-supplied message line shown over the last screen row
#[derive(Debug, Clone, PartialEq)]
pub struct HostErrorLine {
    pub text: String,
    pub attributes: Vec<(usize, u8)>,
    pub cursor: Option<CursorPos>,
}

/// One decoded field table entry, before FFW validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTableEntry {
    pub row: usize,
    pub col: usize,
    pub len: usize,
    pub ffw: u16,
    pub fcws: Vec<u16>,
}

fn tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|token| !token.is_empty())
}

/// Parse a decimal or `0x`-prefixed hex number
pub fn parse_number(token: &str, context: &'static str) -> ProtocolResult<usize> {
    let token = token.trim();
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => token.parse::<usize>(),
    };
    parsed.map_err(|_| ProtocolError::MalformedNumber {
        context,
        token: token.to_string(),
    })
}

fn parse_list(list: &str, context: &'static str) -> ProtocolResult<Vec<usize>> {
    tokens(list).map(|token| parse_number(token, context)).collect()
}

fn narrow<T: TryFrom<usize>>(value: usize, context: &'static str) -> ProtocolResult<T> {
    T::try_from(value).map_err(|_| ProtocolError::MalformedNumber {
        context,
        token: value.to_string(),
    })
}

/// Parse `"rows,cols[,m]"`. Only 24x80 and 27x132 are accepted.
pub fn parse_screen_size(value: &str) -> ProtocolResult<ScreenSize> {
    let invalid = || ProtocolError::InvalidScreenSize { value: value.to_string() };
    let parts: Vec<&str> = tokens(value).collect();
    if parts.len() < 2 {
        return Err(invalid());
    }
    let rows = parse_number(parts[0], "screen size").map_err(|_| invalid())?;
    let cols = parse_number(parts[1], "screen size").map_err(|_| invalid())?;
    if !ScreenSize::is_supported(rows, cols) {
        return Err(invalid());
    }
    let msg_light = parts.get(2).map_or(false, |flag| *flag != "0");
    Ok(ScreenSize { rows, cols, msg_light })
}

/// Parse `"row,col[,blink]"` (0-based). An empty value is the home position.
pub fn parse_cursor_position(value: &str) -> ProtocolResult<CursorPos> {
    let parts: Vec<&str> = tokens(value).collect();
    match parts.len() {
        0 => Ok(CursorPos::default()),
        1 => Err(ProtocolError::IncompleteData {
            context: "cursor position",
            expected: 2,
            received: 1,
        }),
        _ => Ok(CursorPos {
            row: parse_number(parts[0], "cursor position")?,
            col: parse_number(parts[1], "cursor position")?,
            blink: parts.get(2).map_or(false, |flag| *flag != "0"),
        }),
    }
}

/// Parse the attribute run-list into `(position, attribute)` pairs
pub fn parse_attribute_runs(value: &str) -> ProtocolResult<Vec<(usize, u8)>> {
    let numbers = parse_list(value, "attribute run-list")?;
    if numbers.len() % 2 != 0 {
        return Err(ProtocolError::IncompleteData {
            context: "attribute run-list",
            expected: numbers.len() + 1,
            received: numbers.len(),
        });
    }
    numbers
        .chunks_exact(2)
        .map(|pair| Ok((pair[0], narrow::<u8>(pair[1], "attribute run-list")?)))
        .collect()
}

/// Parse the flat field table
pub fn parse_field_table(value: &str) -> ProtocolResult<Vec<FieldTableEntry>> {
    let numbers = parse_list(value, "field table")?;
    let mut entries = Vec::new();
    let mut rest = numbers.as_slice();

    while !rest.is_empty() {
        if rest.len() < 5 {
            return Err(ProtocolError::IncompleteData {
                context: "field table",
                expected: 5,
                received: rest.len(),
            });
        }
        let fcw_len = rest[4];
        let needed = fcw_len.saturating_add(5);
        if rest.len() < needed {
            return Err(ProtocolError::IncompleteData {
                context: "field table",
                expected: needed,
                received: rest.len(),
            });
        }
        let fcws = rest[5..needed]
            .iter()
            .map(|&fcw| narrow::<u16>(fcw, "field control word"))
            .collect::<ProtocolResult<Vec<_>>>()?;
        entries.push(FieldTableEntry {
            row: rest[0],
            col: rest[1],
            len: rest[2],
            ffw: narrow::<u16>(rest[3], "field format word")?,
            fcws,
        });
        rest = &rest[needed..];
    }
    Ok(entries)
}

/// Parse the three attention-key switch bytes. An empty value clears all.
pub fn parse_command_key_switches(value: &str) -> ProtocolResult<[u8; 3]> {
    let numbers = parse_list(value, "command key switches")?;
    if numbers.is_empty() {
        return Ok([0; 3]);
    }
    if numbers.len() != 3 {
        return Err(ProtocolError::IncompleteData {
            context: "command key switches",
            expected: 3,
            received: numbers.len(),
        });
    }
    Ok([
        narrow(numbers[0], "command key switches")?,
        narrow(numbers[1], "command key switches")?,
        narrow(numbers[2], "command key switches")?,
    ])
}

/// Build a fresh screen and field set from a host record.
///
/// Entries whose FFW fails the identification check are dropped silently.
/// Entries overlapping an earlier field are dropped with a warning.
pub fn decode(stream: &HostStream) -> ProtocolResult<(Screen, DataSet)> {
    let size = parse_screen_size(&stream.screen_size)?;
    let mut screen = Screen::new(size);
    screen.load_regeneration_buffer(&stream.regeneration_buffer);
    screen.load_attributes(&parse_attribute_runs(&stream.regen_buffer_attributes)?);

    let cols = size.cols;
    let buffer_size = screen.len();
    let mut data = DataSet::new(buffer_size);

    for entry in parse_field_table(&stream.field_table)? {
        let Some(ffw) = FieldFormatWord::factory(entry.ffw) else {
            log::debug!("dropping field at ({}, {}): invalid FFW {:#06x}", entry.row, entry.col, entry.ffw);
            continue;
        };
        if entry.len == 0 {
            log::debug!("dropping empty field at ({}, {})", entry.row, entry.col);
            continue;
        }

        // start stays below the buffer size once row and col are in range
        if entry.row >= size.rows || entry.col >= cols || entry.len > buffer_size - (entry.row * cols + entry.col) {
            return Err(ProtocolError::FieldOutOfBounds {
                row: entry.row,
                col: entry.col,
                len: entry.len,
                buffer_size,
            });
        }
        let field = Field::new(entry.row, entry.col, entry.len, ffw)
            .with_dbcs(DbcsType::from_fcws(&entry.fcws));
        if (field.start_pos(cols)..field.end_pos(cols)).any(|pos| screen.field_at(pos).is_some()) {
            log::warn!("dropping field at ({}, {}): overlaps an earlier field", entry.row, entry.col);
            continue;
        }

        let index = data.add_field(field.clone())?;
        screen.apply_field(index, &field);
    }

    data.set_command_key_switches(parse_command_key_switches(&stream.command_key_switches)?);

    let cursor = parse_cursor_position(&stream.cursor_position)?;
    if cursor.row >= size.rows || cursor.col >= cols {
        return Err(ProtocolError::InvalidCursorPosition { row: cursor.row, col: cursor.col });
    }
    screen.set_cursor(cursor.row, cursor.col);
    screen.set_cursor_blink(cursor.blink);

    log::debug!(
        "decoded {}x{} screen with {} fields",
        size.rows,
        cols,
        data.field_count()
    );
    Ok((screen, data))
}

/// Decode the host error line attached to a record, if any
pub fn decode_error_line(stream: &HostStream) -> ProtocolResult<Option<HostErrorLine>> {
    if !stream.has_error_line() {
        return Ok(None);
    }
    let text = stream.error_regeneration_buffer.clone().unwrap_or_default();
    let attributes = match stream.error_attributes.as_deref() {
        Some(list) => parse_attribute_runs(list)?,
        None => Vec::new(),
    };
    let cursor = match stream.error_cursor_position.as_deref() {
        Some(value) if !value.trim().is_empty() => Some(parse_cursor_position(value)?),
        _ => None,
    };
    Ok(Some(HostErrorLine { text, attributes, cursor }))
}
