//! Message-line overlay
//!
//! Operator and host errors are written over the last screen row. The row
//! underneath is kept in a one-row scratch screen so Reset can put it back.

use super::screen::{Screen, ScreenSize};

/// Single-slot save/restore of one screen row
#[derive(Debug, Default)]
pub struct ErrorOverlay {
    saved: Option<SavedRow>,
}

#[derive(Debug)]
struct SavedRow {
    row: usize,
    scratch: Screen,
}

impl ErrorOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `row` of `screen` into the slot. A row already saved is kept,
    /// so overlaying twice still restores the original content.
    pub fn save_last_screen_row(&mut self, screen: &Screen, row: usize) {
        if self.saved.is_some() {
            return;
        }
        let mut scratch = Screen::new(ScreenSize { rows: 1, cols: screen.cols(), msg_light: false });
        scratch.copy_row_from(0, screen, row);
        self.saved = Some(SavedRow { row, scratch });
    }

    /// Copy the saved row back and empty the slot; without a save it does nothing
    pub fn restore_last_screen_row(&mut self, screen: &mut Screen) -> bool {
        match self.saved.take() {
            Some(saved) => {
                screen.copy_row_from(saved.row, &saved.scratch, 0);
                true
            }
            None => false,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.saved.is_some()
    }

    /// Discard the slot without restoring
    pub fn reset(&mut self) {
        self.saved = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib5250::screen::ScreenAttr;

    #[test]
    fn test_save_and_restore_row() {
        let mut screen = Screen::new(ScreenSize::STANDARD);
        screen.write_row(23, "F3=Exit", ScreenAttr::from_code(0x30));
        let mut overlay = ErrorOverlay::new();
        overlay.save_last_screen_row(&screen, 23);
        screen.write_row(23, "0009 Field requires numeric characters.", ScreenAttr::from_code(0x22));

        assert!(overlay.restore_last_screen_row(&mut screen));
        assert!(screen.row_text(23).starts_with("F3=Exit"));
        assert!(!overlay.is_saved());
    }

    #[test]
    fn test_double_restore_is_noop() {
        let mut screen = Screen::new(ScreenSize::STANDARD);
        screen.write_row(23, "original", ScreenAttr::default());
        let mut overlay = ErrorOverlay::new();
        overlay.save_last_screen_row(&screen, 23);
        assert!(overlay.restore_last_screen_row(&mut screen));
        screen.write_row(23, "changed later", ScreenAttr::default());
        assert!(!overlay.restore_last_screen_row(&mut screen));
        assert!(screen.row_text(23).starts_with("changed later"));
    }

    #[test]
    fn test_reset_discards_slot() {
        let mut screen = Screen::new(ScreenSize::STANDARD);
        let mut overlay = ErrorOverlay::new();
        overlay.save_last_screen_row(&screen, 23);
        overlay.reset();
        screen.write_row(23, "kept", ScreenAttr::default());
        assert!(!overlay.restore_last_screen_row(&mut screen));
        assert!(screen.row_text(23).starts_with("kept"));
    }
}
