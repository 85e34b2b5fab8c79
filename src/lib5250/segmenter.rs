//! Redraw run segmentation
//!
//! Walks the screen once and groups consecutive positions that can be drawn
//! with one attribute and one character set into runs. Blank default cells
//! (null character, default attribute, output usage) never open a run, so an
//! empty screen yields nothing to draw. Once open, a run keeps counting over
//! any character until the attribute or the character set changes.

use super::dataset::DataSet;
use super::field::FieldIndex;
use super::mapping::is_double_byte;
use super::screen::{Screen, ScreenAttr, ScreenAttrEntry, Usage};

/// Segmenter state between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentState {
    #[default]
    NoSection,
    /// A run was just opened by an attribute change
    SwitchAttr,
    CountSameAttr,
    /// A run was just opened by a character set change
    SwitchCharset,
    CountSameCharset,
}

/// One drawable run, never wider than a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub pos: usize,
    pub len: usize,
    pub attr: ScreenAttr,
    /// Run holds double-byte characters
    pub dbcs: bool,
    pub field: Option<FieldIndex>,
}

#[derive(Debug, Clone, Copy)]
struct OpenRun {
    start: usize,
    attr: ScreenAttr,
    dbcs: Option<bool>,
    field: Option<FieldIndex>,
}

/// Null is neutral: it joins a run of either character set
fn charset_of(ch: char) -> Option<bool> {
    if ch == '\0' {
        None
    } else {
        Some(is_double_byte(ch))
    }
}

fn is_filler(ch: char, entry: &ScreenAttrEntry) -> bool {
    ch == '\0' && entry.usage == Usage::Output && entry.attr.is_default()
}

/// Run-length state machine over one screen
pub struct DisplaySegmenter<'a> {
    screen: &'a Screen,
    data: &'a DataSet,
    valid_len: usize,
    state: SegmentState,
}

impl<'a> DisplaySegmenter<'a> {
    pub fn new(screen: &'a Screen, data: &'a DataSet) -> Self {
        Self {
            screen,
            data,
            valid_len: screen.len(),
            state: SegmentState::NoSection,
        }
    }

    /// Limit segmentation to the first `len` positions
    pub fn with_valid_len(mut self, len: usize) -> Self {
        self.valid_len = len.min(self.screen.len());
        self
    }

    pub fn state(&self) -> SegmentState {
        self.state
    }

    /// Produce the redraw runs for positions `0..valid_len`
    pub fn segment(&mut self) -> Vec<Run> {
        let buffer = self.screen.buffer();
        let attr_map = self.screen.attr_map();
        let mut runs = Vec::new();
        let mut open: Option<OpenRun> = None;
        let mut pos = 0;
        self.state = SegmentState::NoSection;

        while pos < self.valid_len {
            let ch = buffer[pos];
            let entry = &attr_map[pos];
            let filler = is_filler(ch, entry);
            let charset = charset_of(ch);

            let Some(mut run) = open.take() else {
                if !filler {
                    open = Some(OpenRun { start: pos, attr: entry.attr, dbcs: charset, field: entry.field });
                    self.state = SegmentState::SwitchAttr;
                }
                pos += 1;
                continue;
            };

            let attr_changed = entry.attr != run.attr || entry.field != run.field;
            let charset_changed = matches!((run.dbcs, charset), (Some(a), Some(b)) if a != b);

            if !(attr_changed || charset_changed) {
                // a character change alone keeps counting
                if run.dbcs.is_none() {
                    run.dbcs = charset;
                }
                self.state = match self.state {
                    SegmentState::SwitchCharset | SegmentState::CountSameCharset => SegmentState::CountSameCharset,
                    _ => SegmentState::CountSameAttr,
                };
                open = Some(run);
                pos += 1;
                continue;
            }

            let resume = self.close(run, pos, &mut runs);
            if resume > pos {
                pos = resume;
                self.state = SegmentState::NoSection;
                continue;
            }

            if filler {
                self.state = SegmentState::NoSection;
            } else {
                open = Some(OpenRun { start: pos, attr: entry.attr, dbcs: charset, field: entry.field });
                self.state = if attr_changed {
                    SegmentState::SwitchAttr
                } else {
                    SegmentState::SwitchCharset
                };
            }
            pos += 1;
        }

        if let Some(run) = open {
            self.close(run, self.valid_len, &mut runs);
        }
        self.state = SegmentState::NoSection;
        log::trace!("segmented {} positions into {} runs", self.valid_len, runs.len());
        runs
    }

    /// Emit a finished run and return where scanning resumes. A run that
    /// opens at a field start but stops short of the field end covers the
    /// whole field.
    fn close(&self, run: OpenRun, end: usize, runs: &mut Vec<Run>) -> usize {
        let cols = self.screen.cols();
        let mut end = end;
        if let Some(field) = run.field.and_then(|index| self.data.field(index)) {
            let field_end = field.end_pos(cols).min(self.valid_len);
            if run.start == field.start_pos(cols) && end < field_end {
                end = field_end;
            }
        }

        if run.attr.non_display {
            return end;
        }

        let mut pos = run.start;
        while pos < end {
            let row_end = (pos / cols + 1) * cols;
            let chunk_end = end.min(row_end);
            runs.push(Run {
                pos,
                len: chunk_end - pos,
                attr: run.attr,
                dbcs: run.dbcs.unwrap_or(false),
                field: run.field,
            });
            pos = chunk_end;
        }
        end
    }
}

/// Segment a whole screen
pub fn segment(screen: &Screen, data: &DataSet) -> Vec<Run> {
    DisplaySegmenter::new(screen, data).segment()
}
