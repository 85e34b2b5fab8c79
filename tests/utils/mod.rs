//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::oneshot;

use tn5250web::error::{NetworkError, NetworkResult};
use tn5250web::lib5250::dataset::DataSet;
use tn5250web::lib5250::field::{Field, FieldFormatWord};
use tn5250web::lib5250::protocol::HostStream;
use tn5250web::lib5250::request::Request;
use tn5250web::lib5250::screen::{Screen, ScreenSize};
use tn5250web::lib5250::session::HostTransport;

/// 24x80 sign-on screen: user and password (monocase) and a mandatory
/// program field, F3/F12 skip validation. Field cells start out null.
pub fn sign_on_stream() -> HostStream {
    let mut text = vec![' '; 1920];
    let mut put = |pos: usize, s: &str| {
        for (i, ch) in s.chars().enumerate() {
            text[pos + i] = ch;
        }
    };
    put(33, "Sign On");
    put(5 * 80 + 17, "User");
    put(6 * 80 + 17, "Password");
    put(7 * 80 + 17, "Program");
    put(23 * 80 + 1, "F3=Exit   F12=Cancel");
    for row in 5..8 {
        text[row * 80 + 52..row * 80 + 62].fill('\0');
    }

    HostStream {
        screen_size: "24,80".into(),
        regeneration_buffer: text.into_iter().collect(),
        regen_buffer_attributes: "32,0x22,40,0x20".into(),
        field_table: "5,52,10,0x4020,0,6,52,10,0x4020,0,7,52,10,0x4008,0".into(),
        command_key_switches: "4,8,0".into(),
        cursor_position: "5,52".into(),
        ..HostStream::default()
    }
}

/// Screen with no fields and the given text at the top
pub fn text_stream(text: &str) -> HostStream {
    HostStream {
        screen_size: "24,80".into(),
        regeneration_buffer: text.into(),
        ..HostStream::default()
    }
}

/// Blank 24x80 screen carrying the given fields, cursor on the first one
pub fn screen_with_fields(fields: &[(usize, usize, usize, u16)]) -> (Screen, DataSet) {
    let mut screen = Screen::new(ScreenSize::STANDARD);
    let mut data = DataSet::new(screen.len());
    for &(row, col, len, ffw) in fields {
        let ffw = FieldFormatWord::factory(ffw).expect("valid FFW in fixture");
        let field = Field::new(row, col, len, ffw);
        let index = data.add_field(field.clone()).expect("field table has room");
        screen.apply_field(index, &field);
    }
    if let Some(first) = data.fields().first() {
        screen.set_cursor(first.row, first.col);
    }
    (screen, data)
}

/// Answers round trips from a script and records every request
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<NetworkResult<HostStream>>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: NetworkResult<HostStream>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl HostTransport for ScriptedTransport {
    fn round_trip(&self, request: Request) -> BoxFuture<'static, NetworkResult<HostStream>> {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(NetworkError::TransportFailed { reason: "script exhausted".into() }));
        async move { response }.boxed()
    }
}

/// Holds every round trip until the test releases it
#[derive(Clone, Default)]
pub struct GatedTransport {
    gates: Arc<Mutex<VecDeque<oneshot::Sender<HostStream>>>>,
}

impl GatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the oldest held round trip with a response
    pub fn release(&self, response: HostStream) {
        if let Some(gate) = self.gates.lock().unwrap().pop_front() {
            let _ = gate.send(response);
        }
    }
}

impl HostTransport for GatedTransport {
    fn round_trip(&self, _request: Request) -> BoxFuture<'static, NetworkResult<HostStream>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(tx);
        async move {
            rx.await.map_err(|_| NetworkError::TransportFailed { reason: "gate dropped".into() })
        }
        .boxed()
    }
}
