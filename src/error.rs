//! Error handling for tn5250web
//!
//! This module provides the structured error types used across the crate:
//! host stream decode failures, transport failures, configuration problems
//! and the 4-digit operator errors raised by the keyboard state machine.

use std::fmt;
use std::io;
use std::error::Error as StdError;

use crate::lib5250::codes::*;

/// Top-level error type for tn5250web operations
#[derive(Debug)]
pub enum TN5250Error {
    /// Host stream decode errors
    Protocol(ProtocolError),
    /// Host round trip errors
    Network(NetworkError),
    /// Configuration errors
    Config(ConfigError),
    /// Operator (keyboard) errors
    Operator(OperatorError),
}

/// Host stream decode errors
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// Screen size other than 24x80 or 27x132
    InvalidScreenSize { value: String },
    /// A positional token could not be parsed as a number
    MalformedNumber { context: &'static str, token: String },
    /// A list ended in the middle of a tuple
    IncompleteData { context: &'static str, expected: usize, received: usize },
    /// Cursor outside the screen
    InvalidCursorPosition { row: usize, col: usize },
    /// Field extends past the end of the buffer
    FieldOutOfBounds { row: usize, col: usize, len: usize, buffer_size: usize },
    /// More fields than the format table can hold
    FormatTableOverflow { count: usize, max: usize },
    /// The record itself is not valid JSON
    MalformedRecord { message: String },
}

/// Host round trip errors
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A request is already outstanding
    RequestPending,
    /// No request is outstanding
    NoRequestPending,
    /// Transport reported a failure
    TransportFailed { reason: String },
    /// Neither asynchronous nor page submission is available
    TransportUnavailable,
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid configuration parameter
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file error
    FileError { path: String, error: String },
    /// Configuration content could not be (de)serialized
    Serialization { error: String },
}

/// Operator errors raised while editing a screen.
///
/// Each variant carries a stable 4-digit code shown on the message line.
/// The keyboard stays locked until Reset once one of these is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorError {
    /// 0004 - data entry not allowed in this field
    BypassField,
    /// 0005 - cursor in protected area of display
    ProtectedArea,
    /// 0007 - mandatory entry field not filled
    MandatoryEntry,
    /// 0008 - alphabetic characters only
    AlphaOnly,
    /// 0009 - numeric characters only
    NumericOnly,
    /// 0010 - digits 0 through 9 only
    DigitsOnly,
    /// 0011 - invalid key for sign position
    LastSigned,
    /// 0012 - no room to insert data
    NoRoom,
    /// 0014 - mandatory fill field not filled
    MandatoryFill,
    /// 0016 - Field- not valid in field
    NotSigned,
    /// 0018 - key used to exit field not valid
    ExitNotValid,
    /// 0019 - Dup or Field Mark not allowed in field
    DupNotEnabled,
    /// 0026 - last position of numeric field requires a digit
    LastPositionNumeric,
    /// 0060 - double-byte character in single-byte field
    DbcsWrongType,
    /// 0061 - single-byte character in double-byte field
    SbcsWrongType,
}

impl OperatorError {
    /// Numeric error code as defined by the 5494 operator error list
    pub fn code(self) -> u8 {
        match self {
            OperatorError::BypassField => ERR_BYPASS_FIELD,
            OperatorError::ProtectedArea => ERR_NO_FIELD,
            OperatorError::MandatoryEntry => ERR_MANDATORY_ENTRY,
            OperatorError::AlphaOnly => ERR_ALPHA_ONLY,
            OperatorError::NumericOnly => ERR_NUMERIC_ONLY,
            OperatorError::DigitsOnly => ERR_DIGITS_ONLY,
            OperatorError::LastSigned => ERR_LAST_SIGNED,
            OperatorError::NoRoom => ERR_NO_ROOM,
            OperatorError::MandatoryFill => ERR_MANDATORY_FILL,
            OperatorError::NotSigned => ERR_NOT_SIGNED,
            OperatorError::ExitNotValid => ERR_EXIT_NOT_VALID,
            OperatorError::DupNotEnabled => ERR_DUP_NOT_ENABLED,
            OperatorError::LastPositionNumeric => ERR_LAST_POSITION_NUMERIC,
            OperatorError::DbcsWrongType => ERR_DBCS_WRONG_TYPE,
            OperatorError::SbcsWrongType => ERR_SBCS_WRONG_TYPE,
        }
    }

    /// The code rendered the way the message line shows it, e.g. `"0009"`
    pub fn code_str(self) -> String {
        format!("{:04X}", self.code())
    }

    /// Operator-facing message text
    pub fn message(self) -> &'static str {
        get_error_message(self.code()).unwrap_or(MSG_DONT_KNOW)
    }
}

impl fmt::Display for TN5250Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TN5250Error::Protocol(err) => write!(f, "Protocol error: {err}"),
            TN5250Error::Network(err) => write!(f, "Network error: {err}"),
            TN5250Error::Config(err) => write!(f, "Configuration error: {err}"),
            TN5250Error::Operator(err) => write!(f, "Operator error: {err}"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::InvalidScreenSize { value } =>
                write!(f, "Unsupported screen size '{value}' (expected 24x80 or 27x132)"),
            ProtocolError::MalformedNumber { context, token } =>
                write!(f, "Malformed number '{token}' in {context}"),
            ProtocolError::IncompleteData { context, expected, received } =>
                write!(f, "Incomplete {context}: expected {expected} values, received {received}"),
            ProtocolError::InvalidCursorPosition { row, col } =>
                write!(f, "Invalid cursor position: row {row}, col {col}"),
            ProtocolError::FieldOutOfBounds { row, col, len, buffer_size } =>
                write!(f, "Field at ({row}, {col}) of length {len} extends past buffer size {buffer_size}"),
            ProtocolError::FormatTableOverflow { count, max } =>
                write!(f, "Format table overflow: {count} fields, maximum {max}"),
            ProtocolError::MalformedRecord { message } =>
                write!(f, "Malformed host record: {message}"),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::RequestPending =>
                write!(f, "A host request is already pending"),
            NetworkError::NoRequestPending =>
                write!(f, "No host request is pending"),
            NetworkError::TransportFailed { reason } =>
                write!(f, "Host round trip failed: {reason}"),
            NetworkError::TransportUnavailable =>
                write!(f, "No transport available for host submission"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } =>
                write!(f, "Invalid configuration parameter '{parameter}' = '{value}': {reason}"),
            ConfigError::FileError { path, error } =>
                write!(f, "Configuration file error '{path}': {error}"),
            ConfigError::Serialization { error } =>
                write!(f, "Configuration serialization error: {error}"),
        }
    }
}

impl fmt::Display for OperatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code_str(), self.message())
    }
}

impl StdError for TN5250Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TN5250Error::Protocol(err) => Some(err),
            TN5250Error::Network(err) => Some(err),
            TN5250Error::Config(err) => Some(err),
            TN5250Error::Operator(err) => Some(err),
        }
    }
}

impl StdError for ProtocolError {}
impl StdError for NetworkError {}
impl StdError for ConfigError {}
impl StdError for OperatorError {}

impl From<ProtocolError> for TN5250Error {
    fn from(err: ProtocolError) -> Self {
        TN5250Error::Protocol(err)
    }
}

impl From<NetworkError> for TN5250Error {
    fn from(err: NetworkError) -> Self {
        TN5250Error::Network(err)
    }
}

impl From<ConfigError> for TN5250Error {
    fn from(err: ConfigError) -> Self {
        TN5250Error::Config(err)
    }
}

impl From<OperatorError> for TN5250Error {
    fn from(err: OperatorError) -> Self {
        TN5250Error::Operator(err)
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::MalformedRecord { message: err.to_string() }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serialization { error: err.to_string() }
    }
}

impl From<io::Error> for NetworkError {
    fn from(err: io::Error) -> Self {
        NetworkError::TransportFailed { reason: format!("IO Error: {err}") }
    }
}

/// Result type alias for tn5250web operations
pub type TN5250Result<T> = Result<T, TN5250Error>;

/// Specialized result types for different components
pub type ProtocolResult<T> = Result<T, ProtocolError>;
pub type NetworkResult<T> = Result<T, NetworkError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type OperatorResult<T> = Result<T, OperatorError>;
