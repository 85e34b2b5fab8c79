//! Input controller for the 5250 keyboard
//!
//! Applies operator keystrokes to the current `Screen`/`DataSet`: cursor
//! movement, field navigation, the character validation chain and field
//! editing. It also owns the keyboard state. An operator error locks the
//! keyboard until Reset; while a host request is pending keystrokes queue
//! up and are replayed once the next screen is loaded. Input typed while
//! locked is held, survives Reset, and is replayed only on request.

use std::collections::VecDeque;

use crate::error::{OperatorError, OperatorResult};
use crate::keyboard::{is_valid_input_char, Action, KeyCode, KeyMap, KeyResolution, KeyboardInput, Modifiers};
use crate::lib5250::codes::{AidKey, DUP_MARKER};
use crate::lib5250::dataset::DataSet;
use crate::lib5250::field::{AdjustFill, DbcsType, Field, FieldIndex, ShiftEdit};
use crate::lib5250::mapping::is_double_byte;
use crate::lib5250::request::{field_value, TelnetFlags};
use crate::lib5250::screen::{Direction, Screen};

/// Columns or rows covered by one fast cursor move
const FAST_STEP: usize = 5;

/// Keyboard state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardState {
    #[default]
    Normal,
    /// Operator error or host message shown; only Reset is honoured
    Locked,
    /// Request outstanding; input is queued
    AjaxWait,
}

/// What the presentation layer has to do after an input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    /// Screen or cursor changed
    Handled,
    /// Nothing happened
    Ignored,
    /// Stored until the keyboard is available again
    Queued,
    /// Keyboard locked with an operator error
    Error(OperatorError),
    /// Submit the screen to the host
    Submit { aid: AidKey, telnet_flags: TelnetFlags },
    /// Text for the clipboard
    Clipboard(String),
    /// Paste requested; the caller supplies the clipboard text
    PasteRequested,
    /// Keyboard unlocked by Reset
    Reset,
}

/// Keystroke processing for one session
#[derive(Debug)]
pub struct InputController {
    keymap: KeyMap,
    state: KeyboardState,
    /// Typed during AJAX_WAIT, drained when the response is loaded
    queue: VecDeque<KeyboardInput>,
    /// Typed while locked, replayed by `replay_queued`
    held: VecDeque<KeyboardInput>,
    insert_mode: bool,
    /// Digits collected since the Hex key
    hex: Option<String>,
    /// Mac Shift+'-' waiting for its character event
    deferred_minus: bool,
    /// Field-exit-required field filled to its last position
    exit_pending: Option<FieldIndex>,
    auto_advance: bool,
    telnet_flags: TelnetFlags,
    last_error: Option<OperatorError>,
}

impl InputController {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            state: KeyboardState::Normal,
            queue: VecDeque::new(),
            held: VecDeque::new(),
            insert_mode: false,
            hex: None,
            deferred_minus: false,
            exit_pending: None,
            auto_advance: true,
            telnet_flags: TelnetFlags::default(),
            last_error: None,
        }
    }

    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    /// Flags sent with ordinary submits
    pub fn with_telnet_flags(mut self, flags: TelnetFlags) -> Self {
        self.telnet_flags = flags;
        self
    }

    pub fn state(&self) -> KeyboardState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == KeyboardState::Locked
    }

    pub fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    pub fn last_error(&self) -> Option<OperatorError> {
        self.last_error
    }

    /// Inputs waiting for the keyboard, drained or held
    pub fn queued_len(&self) -> usize {
        self.queue.len() + self.held.len()
    }

    /// Inputs waiting for an explicit replay
    pub fn held_len(&self) -> usize {
        self.held.len()
    }

    /// Enter AJAX_WAIT after a request went out
    pub fn begin_wait(&mut self) {
        self.state = KeyboardState::AjaxWait;
    }

    /// Leave AJAX_WAIT once a fresh screen is loaded; field state of the
    /// old screen is dropped, the input queue is kept for draining
    pub fn response_loaded(&mut self) {
        self.state = KeyboardState::Normal;
        self.exit_pending = None;
        self.hex = None;
        self.last_error = None;
    }

    /// Lock the keyboard with an operator error
    pub fn lock(&mut self, error: OperatorError) {
        log::debug!("keyboard locked: {error}");
        self.state = KeyboardState::Locked;
        self.last_error = Some(error);
    }

    /// Lock the keyboard for a host message line
    pub fn lock_for_host_message(&mut self) {
        self.state = KeyboardState::Locked;
        self.last_error = None;
    }

    /// Unlock the keyboard. Queued input is kept for `replay_queued`,
    /// input left over from a wait ahead of input typed while locked.
    pub fn reset(&mut self) {
        while let Some(input) = self.queue.pop_back() {
            self.held.push_front(input);
        }
        if !self.held.is_empty() {
            log::debug!("reset keeps {} queued inputs for replay", self.held.len());
        }
        self.state = KeyboardState::Normal;
        self.hex = None;
        self.deferred_minus = false;
        self.last_error = None;
    }

    /// Handle a physical key event
    pub fn key_event(
        &mut self,
        screen: &mut Screen,
        data: &mut DataSet,
        key: KeyCode,
        modifiers: Modifiers,
    ) -> ControlOutcome {
        match self.keymap.resolve(key, modifiers) {
            KeyResolution::Action(action) => self.input(screen, data, KeyboardInput::Action(action)),
            KeyResolution::Deferred => {
                self.deferred_minus = true;
                ControlOutcome::Ignored
            }
            KeyResolution::Unmapped => ControlOutcome::Ignored,
        }
    }

    /// Handle a character event
    pub fn char_event(&mut self, screen: &mut Screen, data: &mut DataSet, ch: char) -> ControlOutcome {
        if std::mem::take(&mut self.deferred_minus) && ch == '-' {
            return self.input(screen, data, KeyboardInput::Action(Action::FieldMinus));
        }
        if !is_valid_input_char(ch) {
            return ControlOutcome::Ignored;
        }
        self.input(screen, data, KeyboardInput::Character(ch))
    }

    /// Route one input according to the keyboard state
    pub fn input(&mut self, screen: &mut Screen, data: &mut DataSet, input: KeyboardInput) -> ControlOutcome {
        if input == KeyboardInput::Action(Action::Reset) {
            self.reset();
            return ControlOutcome::Reset;
        }
        match self.state {
            KeyboardState::Normal => self.dispatch(screen, data, input),
            KeyboardState::Locked => {
                log::trace!("held {input:?} while locked");
                self.held.push_back(input);
                ControlOutcome::Queued
            }
            KeyboardState::AjaxWait => {
                log::trace!("queued {input:?} while waiting");
                self.queue.push_back(input);
                ControlOutcome::Queued
            }
        }
    }

    /// Replay input queued during a wait against a freshly loaded screen.
    /// Stops at the first submit or error; whatever remains stays queued.
    pub fn drain_queue(&mut self, screen: &mut Screen, data: &mut DataSet) -> Vec<ControlOutcome> {
        self.replay(screen, data, false)
    }

    /// Replay input held since the keyboard locked. Nothing happens while
    /// the keyboard is still locked or waiting.
    pub fn replay_queued(&mut self, screen: &mut Screen, data: &mut DataSet) -> Vec<ControlOutcome> {
        if self.held.is_empty() || self.state != KeyboardState::Normal {
            return Vec::new();
        }
        log::debug!("replaying {} held inputs", self.held.len());
        self.replay(screen, data, true)
    }

    fn replay(&mut self, screen: &mut Screen, data: &mut DataSet, held: bool) -> Vec<ControlOutcome> {
        let mut outcomes = Vec::new();
        while self.state == KeyboardState::Normal {
            let next = if held { self.held.pop_front() } else { self.queue.pop_front() };
            let Some(input) = next else {
                break;
            };
            let outcome = self.dispatch(screen, data, input);
            let stop = matches!(outcome, ControlOutcome::Submit { .. } | ControlOutcome::Error(_));
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    }

    fn dispatch(&mut self, screen: &mut Screen, data: &mut DataSet, input: KeyboardInput) -> ControlOutcome {
        let result = match input {
            KeyboardInput::Character(ch) => self.character(screen, data, ch),
            KeyboardInput::Action(action) => self.action(screen, data, action),
        };
        match result {
            Ok(outcome) => outcome,
            Err(error) => {
                self.lock(error);
                ControlOutcome::Error(error)
            }
        }
    }

    fn character(&mut self, screen: &mut Screen, data: &mut DataSet, ch: char) -> OperatorResult<ControlOutcome> {
        if let Some(mut digits) = self.hex.take() {
            if !ch.is_ascii_hexdigit() {
                return Ok(ControlOutcome::Ignored);
            }
            digits.push(ch);
            if digits.len() < 4 {
                self.hex = Some(digits);
                return Ok(ControlOutcome::Handled);
            }
            let decoded = u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32);
            return match decoded {
                Some(ch) if !ch.is_control() => self.type_char(screen, data, ch),
                _ => Ok(ControlOutcome::Ignored),
            };
        }
        self.type_char(screen, data, ch)
    }

    fn action(&mut self, screen: &mut Screen, data: &mut DataSet, action: Action) -> OperatorResult<ControlOutcome> {
        let len = screen.len();
        let cols = screen.cols();
        let pos = screen.cursor_pos();

        if !matches!(action, Action::Enter) {
            self.exit_pending = None;
        }

        match action {
            Action::Left => screen.set_cursor_pos((pos + len - 1) % len),
            Action::Right => screen.set_cursor_pos((pos + 1) % len),
            Action::Up => screen.set_cursor_pos((pos + len - cols) % len),
            Action::Down => screen.set_cursor_pos((pos + cols) % len),
            Action::FastLeft => screen.set_cursor_pos((pos + len - FAST_STEP) % len),
            Action::FastRight => screen.set_cursor_pos((pos + FAST_STEP) % len),
            Action::FastUp => screen.set_cursor_pos((pos + len - FAST_STEP * cols) % len),
            Action::FastDown => screen.set_cursor_pos((pos + FAST_STEP * cols) % len),
            Action::Next => self.move_to_field(screen, data, Direction::Forward),
            Action::Previous => self.move_to_field(screen, data, Direction::Backward),
            Action::Begin => {
                if screen.field_at(pos).is_some() {
                    screen.set_cursor_pos(screen.field_start(pos));
                }
            }
            Action::End => self.end_of_data(screen, pos),
            Action::Record => {
                if let Some(field) = data.first_input_field().and_then(|index| data.field(index)) {
                    screen.set_cursor(field.row, field.col);
                }
            }
            Action::Last => {
                if let Some(field) = data.last_input_field().and_then(|index| data.field(index)) {
                    screen.set_cursor(field.row, field.col);
                }
            }
            Action::Insert => self.insert_mode = !self.insert_mode,
            Action::Delete => self.delete_at(screen, data, pos)?,
            Action::LeftDelete => {
                if screen.field_at(pos).is_none() {
                    screen.set_cursor_pos((pos + len - 1) % len);
                } else if pos > screen.field_start(pos) {
                    screen.set_cursor_pos(pos - 1);
                    self.delete_at(screen, data, pos - 1)?;
                }
            }
            Action::Hex => self.hex = Some(String::new()),
            Action::Dup => return self.dup(screen, data),
            Action::FieldExit => return self.field_exit(screen, data),
            Action::FieldExitEnter => {
                self.field_exit(screen, data)?;
                return Ok(self.submit(AidKey::Enter, self.telnet_flags));
            }
            Action::FieldPlus => return self.field_plus(screen, data),
            Action::FieldMinus => return self.field_minus(screen, data),
            Action::Copy => return Ok(ControlOutcome::Clipboard(self.copy_text(screen, data))),
            Action::Cut => return self.cut(screen, data),
            Action::Paste => return Ok(ControlOutcome::PasteRequested),
            Action::Reset => {
                self.reset();
                return Ok(ControlOutcome::Reset);
            }
            Action::Enter => {
                if self.exit_pending.take().is_some() {
                    return Err(OperatorError::ExitNotValid);
                }
                return Ok(self.submit(AidKey::Enter, self.telnet_flags));
            }
            Action::Attn => return Ok(self.submit(AidKey::None, TelnetFlags::attn())),
            Action::SysReq => return Ok(self.submit(AidKey::None, TelnetFlags::sys_req())),
            Action::F(_) | Action::PageUp | Action::PageDown | Action::Clear | Action::Help | Action::Print => {
                return match action.aid() {
                    Some(aid) => Ok(self.submit(aid, self.telnet_flags)),
                    None => Ok(ControlOutcome::Ignored),
                };
            }
        }
        Ok(ControlOutcome::Handled)
    }

    fn submit(&self, aid: AidKey, telnet_flags: TelnetFlags) -> ControlOutcome {
        log::debug!("submit requested with {aid:?}");
        ControlOutcome::Submit { aid, telnet_flags }
    }

    /// Field owning the cursor, if it takes input
    fn editable_field(screen: &Screen, data: &DataSet, pos: usize) -> OperatorResult<(FieldIndex, Field)> {
        let index = screen.field_at(pos).ok_or(OperatorError::ProtectedArea)?;
        let field = data.field(index).cloned().ok_or(OperatorError::ProtectedArea)?;
        if !field.ffw.accepts_input() {
            return Err(OperatorError::BypassField);
        }
        Ok((index, field))
    }

    /// Run the validation chain for one character typed at `pos`.
    /// Returns the character to store.
    pub fn validate_char(screen: &Screen, field: &Field, pos: usize, ch: char) -> OperatorResult<char> {
        if !field.ffw.accepts_input() {
            return Err(OperatorError::BypassField);
        }

        let cols = screen.cols();
        let wide = is_double_byte(ch);
        match field.dbcs {
            DbcsType::J if !wide => return Err(OperatorError::SbcsWrongType),
            DbcsType::None if wide => return Err(OperatorError::DbcsWrongType),
            DbcsType::E => {
                let first = screen.char_at(field.start_pos(cols));
                if !matches!(first, '\0' | ' ') && is_double_byte(first) != wide {
                    return Err(if wide { OperatorError::DbcsWrongType } else { OperatorError::SbcsWrongType });
                }
            }
            _ => {}
        }

        let last = pos == field.last_pos(cols);
        match field.ffw.shift_edit {
            ShiftEdit::AlphaOnly if !(ch.is_ascii_alphabetic() || " ,.-".contains(ch)) => {
                return Err(OperatorError::AlphaOnly);
            }
            ShiftEdit::NumericOnly => {
                if !(ch.is_ascii_digit() || " ,.+-".contains(ch)) {
                    return Err(OperatorError::NumericOnly);
                }
                if last && !ch.is_ascii_digit() {
                    return Err(OperatorError::LastPositionNumeric);
                }
            }
            ShiftEdit::DigitsOnly if !ch.is_ascii_digit() => return Err(OperatorError::DigitsOnly),
            ShiftEdit::SignedNumeric => {
                if last && !matches!(ch, '+' | '-') {
                    return Err(OperatorError::LastSigned);
                }
                if !last && !ch.is_ascii_digit() {
                    return Err(OperatorError::DigitsOnly);
                }
            }
            ShiftEdit::IoFeature => return Err(OperatorError::BypassField),
            _ => {}
        }

        if field.ffw.monocase {
            Ok(ch.to_uppercase().next().unwrap_or(ch))
        } else {
            Ok(ch)
        }
    }

    fn type_char(&mut self, screen: &mut Screen, data: &mut DataSet, ch: char) -> OperatorResult<ControlOutcome> {
        let cols = screen.cols();
        let pos = screen.cursor_pos();
        let (index, field) = Self::editable_field(screen, data, pos)?;
        let ch = Self::validate_char(screen, &field, pos, ch)?;

        let end = field.end_pos(cols);
        if self.insert_mode {
            if !matches!(screen.char_at(end - 1), '\0' | ' ') {
                return Err(OperatorError::NoRoom);
            }
            for p in (pos + 1..end).rev() {
                screen.set_char(p, screen.char_at(p - 1));
            }
        }
        screen.set_char(pos, ch);
        Self::mark_modified(data, index);
        data.mark_touched(pos);

        if pos + 1 < end {
            screen.set_cursor_pos(pos + 1);
            return Ok(ControlOutcome::Handled);
        }

        // last position of the field
        if field.ffw.field_exit_required {
            self.exit_pending = Some(index);
            return Ok(ControlOutcome::Handled);
        }
        if field.ffw.auto_enter {
            return Ok(self.submit(AidKey::Enter, self.telnet_flags));
        }
        if self.auto_advance {
            self.move_to_field(screen, data, Direction::Forward);
        }
        Ok(ControlOutcome::Handled)
    }

    fn mark_modified(data: &mut DataSet, index: FieldIndex) {
        if let Some(field) = data.field_mut(index) {
            field.set_modified(true);
            field.dup_chars = 0;
        }
    }

    fn delete_at(&mut self, screen: &mut Screen, data: &mut DataSet, pos: usize) -> OperatorResult<()> {
        let (index, field) = Self::editable_field(screen, data, pos)?;
        let end = field.end_pos(screen.cols());
        for p in pos..end - 1 {
            screen.set_char(p, screen.char_at(p + 1));
        }
        screen.set_char(end - 1, '\0');
        Self::mark_modified(data, index);
        Ok(())
    }

    /// Move to the start of the next (or previous) field that takes input.
    /// Bypass fields are skipped; the scan wraps around the screen.
    fn move_to_field(&self, screen: &mut Screen, data: &DataSet, direction: Direction) {
        let cols = screen.cols();
        let pos = screen.cursor_pos();
        let mut from = match (screen.field_at(pos).and_then(|index| data.field(index)), direction) {
            (Some(field), Direction::Forward) => field.last_pos(cols),
            (Some(field), Direction::Backward) => field.start_pos(cols),
            (None, _) => pos,
        };

        for _ in 0..=data.field_count() {
            let Some(found) = screen.scan_attr_map(from, direction) else {
                return;
            };
            let Some(field) = screen.field_at(found).and_then(|index| data.field(index)) else {
                return;
            };
            if field.ffw.accepts_input() {
                screen.set_cursor(field.row, field.col);
                return;
            }
            from = match direction {
                Direction::Forward => field.last_pos(cols),
                Direction::Backward => field.start_pos(cols),
            };
        }
    }

    /// Cursor to just after the last data character of the current field
    fn end_of_data(&self, screen: &mut Screen, pos: usize) {
        if screen.field_at(pos).is_none() {
            return;
        }
        let start = screen.field_start(pos);
        let end = screen.peek_one_past_end_of_field(pos);
        let target = (start..end)
            .rev()
            .find(|&p| !matches!(screen.char_at(p), '\0' | ' '))
            .map_or(start, |p| (p + 1).min(end - 1));
        screen.set_cursor_pos(target);
    }

    fn after_exit(&mut self, screen: &mut Screen, data: &DataSet, field: &Field) -> ControlOutcome {
        if field.ffw.auto_enter {
            return self.submit(AidKey::Enter, self.telnet_flags);
        }
        self.move_to_field(screen, data, Direction::Forward);
        ControlOutcome::Handled
    }

    fn dup(&mut self, screen: &mut Screen, data: &mut DataSet) -> OperatorResult<ControlOutcome> {
        let pos = screen.cursor_pos();
        let (index, field) = Self::editable_field(screen, data, pos)?;
        if !field.ffw.dup {
            return Err(OperatorError::DupNotEnabled);
        }
        let end = field.end_pos(screen.cols());
        for p in pos..end {
            screen.set_char(p, DUP_MARKER);
            data.mark_touched(p);
        }
        if let Some(target) = data.field_mut(index) {
            target.set_modified(true);
            target.dup_chars = end - pos;
        }
        Ok(self.after_exit(screen, data, &field))
    }

    /// Erase from the cursor to the end of the field and re-pad the content
    /// according to the field's adjust rule
    fn exit_field(screen: &mut Screen, data: &mut DataSet, index: FieldIndex, field: &Field, pos: usize) {
        let cols = screen.cols();
        let start = field.start_pos(cols);
        let data_end = if field.has_sign_position() { field.last_pos(cols) } else { field.end_pos(cols) };

        for p in pos.max(start)..data_end {
            screen.set_char(p, '\0');
        }

        let fill = match field.ffw.adjust_fill {
            AdjustFill::RightAdjustZeroFill => Some('0'),
            AdjustFill::RightAdjustBlankFill => Some(' '),
            AdjustFill::NoAdjust | AdjustFill::MandatoryFill => None,
        };
        if let Some(fill) = fill {
            let mut content: Vec<char> = (start..data_end).map(|p| screen.char_at(p)).collect();
            while matches!(content.last(), Some('\0' | ' ')) {
                content.pop();
            }
            let width = data_end - start;
            let padding = width.saturating_sub(content.len());
            for (offset, p) in (start..data_end).enumerate() {
                let ch = if offset < padding { fill } else { content[offset - padding] };
                screen.set_char(p, ch);
            }
        }
        Self::mark_modified(data, index);
    }

    fn field_exit(&mut self, screen: &mut Screen, data: &mut DataSet) -> OperatorResult<ControlOutcome> {
        let pos = screen.cursor_pos();
        let (index, field) = Self::editable_field(screen, data, pos)?;
        Self::exit_field(screen, data, index, &field, pos);
        Ok(self.after_exit(screen, data, &field))
    }

    fn field_plus(&mut self, screen: &mut Screen, data: &mut DataSet) -> OperatorResult<ControlOutcome> {
        let pos = screen.cursor_pos();
        let (index, field) = Self::editable_field(screen, data, pos)?;
        Self::exit_field(screen, data, index, &field, pos);
        if field.has_sign_position() {
            screen.set_char(field.last_pos(screen.cols()), '\0');
        }
        Ok(self.after_exit(screen, data, &field))
    }

    fn field_minus(&mut self, screen: &mut Screen, data: &mut DataSet) -> OperatorResult<ControlOutcome> {
        let pos = screen.cursor_pos();
        let (index, field) = Self::editable_field(screen, data, pos)?;
        let last = field.last_pos(screen.cols());
        match field.ffw.shift_edit {
            ShiftEdit::NumericOnly => {
                Self::exit_field(screen, data, index, &field, pos);
                if let Some(punched) = overpunch(screen.char_at(last)) {
                    screen.set_char(last, punched);
                }
            }
            ShiftEdit::SignedNumeric => {
                Self::exit_field(screen, data, index, &field, pos);
                screen.set_char(last, '-');
            }
            _ => return Err(OperatorError::NotSigned),
        }
        Ok(self.after_exit(screen, data, &field))
    }

    fn copy_text(&self, screen: &Screen, data: &DataSet) -> String {
        let pos = screen.cursor_pos();
        match screen.field_at(pos).and_then(|index| data.field(index)) {
            Some(field) => field_value(screen, field),
            None => screen.row_text(screen.cursor().row).trim_end().to_string(),
        }
    }

    fn cut(&mut self, screen: &mut Screen, data: &mut DataSet) -> OperatorResult<ControlOutcome> {
        let pos = screen.cursor_pos();
        let (index, field) = Self::editable_field(screen, data, pos)?;
        let text = field_value(screen, &field);
        let cols = screen.cols();
        for p in field.start_pos(cols)..field.end_pos(cols) {
            screen.set_char(p, '\0');
        }
        Self::mark_modified(data, index);
        screen.set_cursor(field.row, field.col);
        Ok(ControlOutcome::Clipboard(text))
    }

    /// Type clipboard text. Characters the validation chain rejects are
    /// skipped without locking the keyboard. Stops early on auto-enter.
    pub fn paste(&mut self, screen: &mut Screen, data: &mut DataSet, text: &str) -> ControlOutcome {
        if self.state != KeyboardState::Normal {
            return ControlOutcome::Ignored;
        }
        let mut typed = false;
        for ch in text.chars().filter(|&ch| is_valid_input_char(ch)) {
            match self.type_char(screen, data, ch) {
                Ok(outcome @ ControlOutcome::Submit { .. }) => return outcome,
                Ok(_) => typed = true,
                Err(error) => log::trace!("paste skipped {ch:?}: {error}"),
            }
        }
        if typed {
            ControlOutcome::Handled
        } else {
            ControlOutcome::Ignored
        }
    }
}

/// Zoned-decimal negative overpunch of a digit
pub fn overpunch(digit: char) -> Option<char> {
    match digit {
        '0' => Some('}'),
        '1'..='9' => char::from_u32('J' as u32 + (digit as u32 - '1' as u32)),
        _ => None,
    }
}
