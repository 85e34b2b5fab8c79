//! Per-screen field set
//!
//! Holds the format table of the current screen, the attention-key switch
//! set sent with it, and which buffer positions the operator has typed into.

use super::codes::*;
use super::field::{Field, FieldIndex};
use crate::error::{ProtocolError, ProtocolResult};

/// Fields, command-key switches and touched map of one host screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    fields: Vec<Field>,
    /// Bit i set: F(i+1) skips mandatory entry/fill validation
    command_keys: u32,
    touched: Vec<bool>,
}

impl DataSet {
    /// Empty set for a buffer of `buffer_len` positions
    pub fn new(buffer_len: usize) -> Self {
        Self {
            fields: Vec::new(),
            command_keys: 0,
            touched: vec![false; buffer_len],
        }
    }

    /// Append a field to the format table, returning its index
    pub fn add_field(&mut self, field: Field) -> ProtocolResult<FieldIndex> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(ProtocolError::FormatTableOverflow {
                count: self.fields.len() + 1,
                max: MAX_FIELDS,
            });
        }
        self.fields.push(field);
        Ok(self.fields.len() - 1)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: FieldIndex) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn field_mut(&mut self, index: FieldIndex) -> Option<&mut Field> {
        self.fields.get_mut(index)
    }

    /// Field containing a buffer position
    pub fn field_at(&self, pos: usize, cols: usize) -> Option<FieldIndex> {
        self.fields.iter().position(|field| field.contains(pos, cols))
    }

    /// Load the three switch bytes, least significant first
    pub fn set_command_key_switches(&mut self, bytes: [u8; 3]) {
        self.command_keys = u32::from(bytes[0]) | u32::from(bytes[1]) << 8 | u32::from(bytes[2]) << 16;
    }

    pub fn command_key_switches(&self) -> u32 {
        self.command_keys
    }

    /// Whether submitting with this AID skips mandatory checks
    pub fn bypasses_validation(&self, aid: AidKey) -> bool {
        aid.command_key_index()
            .filter(|&bit| bit < COMMAND_KEY_COUNT)
            .map_or(false, |bit| self.command_keys & (1 << bit) != 0)
    }

    pub fn mark_touched(&mut self, pos: usize) {
        if let Some(slot) = self.touched.get_mut(pos) {
            *slot = true;
        }
    }

    pub fn is_touched(&self, pos: usize) -> bool {
        self.touched.get(pos).copied().unwrap_or(false)
    }

    /// Whether every position of the field has been typed into
    pub fn is_field_filled(&self, field: &Field, cols: usize) -> bool {
        (field.start_pos(cols)..field.end_pos(cols)).all(|pos| self.is_touched(pos))
    }

    /// Whether any field carries a modified data tag
    pub fn any_modified(&self) -> bool {
        self.fields.iter().any(Field::is_modified)
    }

    /// Indices of fields holding dup markers
    pub fn dup_field_indices(&self) -> Vec<FieldIndex> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.dup_chars > 0)
            .map(|(index, _)| index)
            .collect()
    }

    /// Index of the first field that accepts keyboard input
    pub fn first_input_field(&self) -> Option<FieldIndex> {
        self.fields.iter().position(|field| field.ffw.accepts_input())
    }

    /// Index of the last field that accepts keyboard input
    pub fn last_input_field(&self) -> Option<FieldIndex> {
        self.fields.iter().rposition(|field| field.ffw.accepts_input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib5250::field::FieldFormatWord;

    #[test]
    fn test_format_table_limit() {
        let mut data = DataSet::new(1920);
        for i in 0..MAX_FIELDS {
            assert_eq!(data.add_field(Field::new(0, i % 80, 1, FieldFormatWord::default())).unwrap(), i);
        }
        let err = data.add_field(Field::new(0, 0, 1, FieldFormatWord::default())).unwrap_err();
        assert!(matches!(err, ProtocolError::FormatTableOverflow { max: 256, .. }));
    }

    #[test]
    fn test_command_key_switches_lsb_first() {
        let mut data = DataSet::new(1920);
        data.set_command_key_switches([0b0000_0101, 0, 0x80]);
        assert!(data.bypasses_validation(AidKey::Function(1)));
        assert!(!data.bypasses_validation(AidKey::Function(2)));
        assert!(data.bypasses_validation(AidKey::Function(3)));
        assert!(data.bypasses_validation(AidKey::Function(24)));
        assert!(!data.bypasses_validation(AidKey::Enter));
    }

    #[test]
    fn test_touched_map() {
        let mut data = DataSet::new(1920);
        let field = Field::new(0, 10, 2, FieldFormatWord::default());
        data.mark_touched(10);
        assert!(!data.is_field_filled(&field, 80));
        data.mark_touched(11);
        assert!(data.is_field_filled(&field, 80));
        data.mark_touched(5000);
        assert!(!data.is_touched(5000));
    }

    #[test]
    fn test_input_field_bounds_skip_bypass() {
        let mut data = DataSet::new(1920);
        let bypass = FieldFormatWord::factory(0x6000).unwrap();
        data.add_field(Field::new(0, 0, 5, bypass)).unwrap();
        data.add_field(Field::new(1, 0, 5, FieldFormatWord::default())).unwrap();
        data.add_field(Field::new(2, 0, 5, FieldFormatWord::default())).unwrap();
        data.add_field(Field::new(3, 0, 5, bypass)).unwrap();
        assert_eq!(data.first_input_field(), Some(1));
        assert_eq!(data.last_input_field(), Some(2));
        assert_eq!(data.field_at(162, 80), Some(2));
    }
}
