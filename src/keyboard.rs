//! Keyboard mapping for 5250 actions
//!
//! This module maps physical keys plus modifiers to the abstract actions the
//! input controller understands. Character keys without Ctrl/Alt are not
//! mapped here; they arrive separately as character events.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::lib5250::codes::AidKey;

/// Abstract editing and attention actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    FastLeft,
    FastRight,
    FastUp,
    FastDown,
    /// Next input field
    Next,
    /// Previous input field
    Previous,
    Enter,
    FieldExit,
    FieldExitEnter,
    Dup,
    Insert,
    Delete,
    /// Backspace
    LeftDelete,
    Hex,
    Clear,
    /// Command keys F1..F24
    F(u8),
    Copy,
    Cut,
    Paste,
    Attn,
    /// Start of the current field
    Begin,
    /// End of the data in the current field
    End,
    /// First input field
    Record,
    /// Last input field
    Last,
    PageUp,
    PageDown,
    FieldMinus,
    FieldPlus,
    Reset,
    SysReq,
    Help,
    Print,
}

impl Action {
    /// AID sent when this action submits the screen
    pub fn aid(self) -> Option<AidKey> {
        match self {
            Action::Enter => Some(AidKey::Enter),
            Action::F(n @ 1..=24) => Some(AidKey::Function(n)),
            Action::PageUp => Some(AidKey::RollDown),
            Action::PageDown => Some(AidKey::RollUp),
            Action::Clear => Some(AidKey::Clear),
            Action::Help => Some(AidKey::Help),
            Action::Print => Some(AidKey::Print),
            Action::Attn | Action::SysReq => Some(AidKey::None),
            _ => None,
        }
    }

    /// Whether the action round-trips to the host
    pub fn submits(self) -> bool {
        self.aid().is_some()
    }
}

/// Physical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    Pause,
    F(u8),
    NumpadMinus,
    NumpadPlus,
    NumpadEnter,
}

/// Modifier keys held with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Command key on mac, Windows key elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, alt: false, meta: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true, alt: false, meta: false };
    pub const ALT: Modifiers = Modifiers { shift: false, ctrl: false, alt: true, meta: false };
}

/// Physical keyboard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardLayout {
    #[default]
    Pc,
    Mac,
}

impl FromStr for KeyboardLayout {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "pc" => Ok(KeyboardLayout::Pc),
            "mac" => Ok(KeyboardLayout::Mac),
            _ => Err(ConfigError::InvalidParameter {
                parameter: "keyboard.layout".to_string(),
                value: value.to_string(),
                reason: "expected 'pc' or 'mac'".to_string(),
            }),
        }
    }
}

/// Result of looking up one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResolution {
    Action(Action),
    /// Decided by the next character event
    Deferred,
    /// Not a mapped key; a character event may follow
    Unmapped,
}

/// Key table for one layout
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMap {
    layout: KeyboardLayout,
}

impl KeyMap {
    pub fn new(layout: KeyboardLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    /// Map a key event to an action
    pub fn resolve(&self, key: KeyCode, modifiers: Modifiers) -> KeyResolution {
        let mac = self.layout == KeyboardLayout::Mac;
        // Command stands in for Ctrl on mac
        let ctrl = modifiers.ctrl || (mac && modifiers.meta);
        let shift = modifiers.shift;

        if mac && shift && !ctrl && key == KeyCode::Char('-') {
            return KeyResolution::Deferred;
        }

        let action = match key {
            KeyCode::Enter | KeyCode::NumpadEnter if ctrl => Action::FieldExitEnter,
            KeyCode::Enter | KeyCode::NumpadEnter if shift => Action::FieldExit,
            KeyCode::Enter | KeyCode::NumpadEnter => Action::Enter,
            KeyCode::Tab if shift => Action::Previous,
            KeyCode::Tab => Action::Next,
            KeyCode::Backspace => Action::LeftDelete,
            KeyCode::Delete if shift => Action::Cut,
            KeyCode::Delete => Action::Delete,
            KeyCode::Insert if shift => Action::Paste,
            KeyCode::Insert if ctrl => Action::Copy,
            KeyCode::Insert => Action::Insert,
            KeyCode::Home if ctrl => Action::Record,
            KeyCode::Home => Action::Begin,
            KeyCode::End if ctrl => Action::Last,
            KeyCode::End => Action::End,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::ArrowLeft if ctrl => Action::FastLeft,
            KeyCode::ArrowLeft => Action::Left,
            KeyCode::ArrowRight if ctrl => Action::FastRight,
            KeyCode::ArrowRight => Action::Right,
            KeyCode::ArrowUp if ctrl => Action::FastUp,
            KeyCode::ArrowUp => Action::Up,
            KeyCode::ArrowDown if ctrl => Action::FastDown,
            KeyCode::ArrowDown => Action::Down,
            KeyCode::Escape if shift => Action::SysReq,
            KeyCode::Escape => Action::Attn,
            KeyCode::Pause => Action::Clear,
            KeyCode::F(1) if ctrl => Action::Help,
            KeyCode::F(n @ 1..=12) if shift => Action::F(n + 12),
            KeyCode::F(n @ 1..=24) => Action::F(n),
            KeyCode::NumpadMinus => Action::FieldMinus,
            KeyCode::NumpadPlus => Action::FieldPlus,
            KeyCode::Char(ch) if ctrl => match ch.to_ascii_lowercase() {
                'c' => Action::Copy,
                'x' => Action::Cut,
                'v' => Action::Paste,
                'r' => Action::Reset,
                'd' => Action::Dup,
                'p' => Action::Print,
                _ => return KeyResolution::Unmapped,
            },
            KeyCode::Char(ch) if modifiers.alt && ch.eq_ignore_ascii_case(&'h') => Action::Hex,
            _ => return KeyResolution::Unmapped,
        };
        KeyResolution::Action(action)
    }
}

/// Keyboard input as queued by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardInput {
    /// Regular character input
    Character(char),
    Action(Action),
}

/// Check if character is valid for input
pub fn is_valid_input_char(ch: char) -> bool {
    !ch.is_control()
}
