//! 5250 session round trips
//!
//! A `Session` owns the current screen, its field set, the input controller
//! and the message-line overlay. Every host response replaces the screen
//! and field set wholesale. A submit encodes the screen, hands the request
//! to the transport and puts the keyboard into AJAX_WAIT until the response
//! is loaded.
//!
//! Waiting is bounded by the configured timeout. A timeout does not cancel
//! the in-flight round trip: the caller decides whether to keep waiting.

use std::time::Duration;

use futures::future::BoxFuture;

use super::codes::*;
use super::dataset::DataSet;
use super::overlay::ErrorOverlay;
use super::protocol::{decode, decode_error_line, HostErrorLine, HostStream};
use super::request::{Request, RequestEncoder, TelnetFlags};
use super::screen::{Screen, ScreenAttr, ScreenSize};
use super::segmenter::{segment, Run};
use crate::config::{SessionConfig, DEFAULT_TIMEOUT_SECONDS};
use crate::controller::{ControlOutcome, InputController, KeyboardState};
use crate::error::{ConfigResult, NetworkError, NetworkResult, ProtocolResult, TN5250Error, TN5250Result};
use crate::keyboard::{KeyCode, KeyMap, Modifiers};

/// Carries requests to the host and responses back
pub trait HostTransport: Send + Sync {
    /// Start one round trip. The returned future owns everything it needs.
    fn round_trip(&self, request: Request) -> BoxFuture<'static, NetworkResult<HostStream>>;

    /// Whether `round_trip` is usable
    fn supports_async(&self) -> bool {
        true
    }

    /// Full-page submission when asynchronous round trips are unavailable.
    /// The response arrives later through `Session::deliver_response`.
    fn submit_page(&self, _request: &Request) -> NetworkResult<()> {
        Err(NetworkError::TransportUnavailable)
    }
}

/// Result of waiting for a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Response loaded
    Completed,
    /// Timeout elapsed; the request is still pending
    TimedOut,
}

/// One 5250 session
pub struct Session {
    screen: Screen,
    data: DataSet,
    controller: InputController,
    overlay: ErrorOverlay,
    transport: Box<dyn HostTransport>,
    pending: Option<BoxFuture<'static, NetworkResult<HostStream>>>,
    /// Submitted through `submit_page`; response delivered externally
    page_pending: bool,
    timeout: Duration,
    dbcs: bool,
    column_separators: bool,
}

impl Session {
    /// Session with default settings and an empty 24x80 screen
    pub fn new(transport: Box<dyn HostTransport>) -> Self {
        let screen = Screen::new(ScreenSize::STANDARD);
        let data = DataSet::new(screen.len());
        Self {
            screen,
            data,
            controller: InputController::new(KeyMap::default()),
            overlay: ErrorOverlay::new(),
            transport,
            pending: None,
            page_pending: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS.unsigned_abs()),
            dbcs: false,
            column_separators: true,
        }
    }

    /// Session configured from a `SessionConfig`
    pub fn from_config(transport: Box<dyn HostTransport>, config: &SessionConfig) -> ConfigResult<Self> {
        let controller = InputController::new(KeyMap::new(config.keyboard_layout()?))
            .with_auto_advance(config.auto_advance())
            .with_telnet_flags(config.telnet_flags()?);
        Ok(Self {
            controller,
            timeout: config.timeout()?,
            dbcs: config.dbcs_enabled(),
            column_separators: config.column_separators(),
            ..Self::new(transport)
        })
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn controller(&self) -> &InputController {
        &self.controller
    }

    pub fn keyboard_state(&self) -> KeyboardState {
        self.controller.state()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Whether a request is outstanding
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some() || self.page_pending
    }

    /// Redraw runs of the current screen. With column separators turned
    /// off no run carries the separator flag.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs = segment(&self.screen, &self.data);
        if !self.column_separators {
            runs.iter_mut().for_each(|run| run.attr.column_separator = false);
        }
        runs
    }

    /// Display column of a buffer position. Double-byte cells count twice
    /// only when DBCS display is enabled.
    pub fn display_col(&self, pos: usize) -> usize {
        if self.dbcs {
            self.screen.display_col(pos)
        } else {
            self.screen.mapping().col_from_pos(pos)
        }
    }

    /// Replace the screen with a host record, then replay queued input.
    /// Queued submits go out immediately.
    pub fn load(&mut self, stream: &HostStream) -> ProtocolResult<Vec<ControlOutcome>> {
        let (screen, data) = decode(stream)?;
        let error_line = decode_error_line(stream)?;

        self.screen = screen;
        self.data = data;
        self.overlay.reset();
        self.controller.response_loaded();

        if let Some(line) = error_line {
            self.show_host_message(&line);
        }

        let outcomes = self.controller.drain_queue(&mut self.screen, &mut self.data);
        for outcome in &outcomes {
            self.after_input(outcome);
            if let ControlOutcome::Submit { aid, telnet_flags } = outcome {
                if let Err(error) = self.submit(*aid, *telnet_flags) {
                    log::debug!("queued submit not sent: {error}");
                }
            }
        }
        Ok(outcomes)
    }

    /// Handle a physical key event
    pub fn key_event(&mut self, key: KeyCode, modifiers: Modifiers) -> TN5250Result<ControlOutcome> {
        let outcome = self.controller.key_event(&mut self.screen, &mut self.data, key, modifiers);
        self.finish_input(outcome)
    }

    /// Handle a character event
    pub fn char_event(&mut self, ch: char) -> TN5250Result<ControlOutcome> {
        let outcome = self.controller.char_event(&mut self.screen, &mut self.data, ch);
        self.finish_input(outcome)
    }

    /// Type clipboard text into the current field
    pub fn paste(&mut self, text: &str) -> TN5250Result<ControlOutcome> {
        let outcome = self.controller.paste(&mut self.screen, &mut self.data, text);
        self.finish_input(outcome)
    }

    fn finish_input(&mut self, outcome: ControlOutcome) -> TN5250Result<ControlOutcome> {
        self.after_input(&outcome);
        if let ControlOutcome::Submit { aid, telnet_flags } = outcome {
            self.submit(aid, telnet_flags)?;
        }
        Ok(outcome)
    }

    fn after_input(&mut self, outcome: &ControlOutcome) {
        match outcome {
            ControlOutcome::Error(error) => self.show_message(&error.to_string()),
            ControlOutcome::Reset => {
                self.overlay.restore_last_screen_row(&mut self.screen);
            }
            _ => {}
        }
    }

    /// Write a message over the last row, keeping the row for Reset
    fn show_message(&mut self, text: &str) {
        let last = self.screen.rows() - 1;
        self.overlay.save_last_screen_row(&self.screen, last);
        self.screen.write_row(last, text, ScreenAttr::from_code(ATTR_5250_WHITE));
    }

    fn show_host_message(&mut self, line: &HostErrorLine) {
        let last = self.screen.rows() - 1;
        self.overlay.save_last_screen_row(&self.screen, last);

        let mut row = Screen::new(ScreenSize { rows: 1, cols: self.screen.cols(), msg_light: false });
        row.load_regeneration_buffer(&line.text);
        row.load_attributes(&line.attributes);
        self.screen.copy_row_from(last, &row, 0);

        if let Some(cursor) = line.cursor {
            self.screen.set_cursor(last, cursor.col);
        }
        log::debug!("host message: {}", line.text.trim_end());
        self.controller.lock_for_host_message();
    }

    /// Encode the screen and start a round trip
    pub fn submit(&mut self, aid: AidKey, telnet_flags: TelnetFlags) -> TN5250Result<Request> {
        if self.is_waiting() {
            return Err(NetworkError::RequestPending.into());
        }

        let encoder = RequestEncoder::new(aid).with_telnet_flags(telnet_flags);
        let request = match encoder.encode(&mut self.screen, &self.data) {
            Ok(request) => request,
            Err(error) => {
                self.controller.lock(error);
                self.show_message(&error.to_string());
                return Err(TN5250Error::Operator(error));
            }
        };

        if self.transport.supports_async() {
            self.pending = Some(self.transport.round_trip(request.clone()));
        } else {
            self.transport.submit_page(&request)?;
            self.page_pending = true;
        }
        log::debug!("submitted {aid:?}, awaiting host");
        self.controller.begin_wait();
        Ok(request)
    }

    /// Wait for the pending round trip, bounded by the session timeout
    pub async fn wait_for_response(&mut self) -> TN5250Result<SubmitOutcome> {
        let result = {
            let pending = self.pending.as_mut().ok_or(NetworkError::NoRequestPending)?;
            tokio::time::timeout(self.timeout, pending).await
        };

        let stream = match result {
            Err(_) => {
                log::warn!("host did not answer within {:?}", self.timeout);
                return Ok(SubmitOutcome::TimedOut);
            }
            Ok(stream) => stream,
        };

        self.pending = None;
        match stream {
            Ok(stream) => {
                self.load_response(&stream)?;
                Ok(SubmitOutcome::Completed)
            }
            Err(error) => {
                log::warn!("round trip failed: {error}");
                self.controller.reset();
                Err(error.into())
            }
        }
    }

    /// Keep waiting after a timeout
    pub async fn continue_waiting(&mut self) -> TN5250Result<SubmitOutcome> {
        log::debug!("continuing to wait for host response");
        self.wait_for_response().await
    }

    /// Load a response that arrived outside `wait_for_response`, e.g. after
    /// a full-page submit. Any in-flight round trip is dropped.
    pub fn deliver_response(&mut self, stream: &HostStream) -> ProtocolResult<Vec<ControlOutcome>> {
        self.pending = None;
        self.page_pending = false;
        self.load_response(stream)
    }

    /// Load the answer to a submit. A record that does not decode still ends
    /// the wait, so the keyboard is not left in AJAX_WAIT.
    fn load_response(&mut self, stream: &HostStream) -> ProtocolResult<Vec<ControlOutcome>> {
        self.load(stream).map_err(|error| {
            log::warn!("host response rejected: {error}");
            self.controller.reset();
            error
        })
    }

    /// Replay input typed while the keyboard was locked. Only runs on
    /// explicit request, after Reset.
    pub fn replay_queued(&mut self) -> TN5250Result<Vec<ControlOutcome>> {
        let outcomes = self.controller.replay_queued(&mut self.screen, &mut self.data);
        for outcome in &outcomes {
            self.after_input(outcome);
            if let ControlOutcome::Submit { aid, telnet_flags } = outcome {
                self.submit(*aid, *telnet_flags)?;
            }
        }
        Ok(outcomes)
    }
}
