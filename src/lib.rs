//! tn5250web - core of an IBM 5250 web terminal
//!
//! Decodes the host-pushed screen stream into an addressable screen and field
//! set, enforces the 5250 field editing rules for operator input, and encodes
//! the result back into a host request. Rendering is left to the caller.

/// 5250 screen/field model, codec and session
pub mod lib5250;

/// Input controller and keyboard state machine
pub mod controller;

/// Physical key to 5250 action mapping
pub mod keyboard;

/// Session configuration
pub mod config;

/// Error types
pub mod error;
