//! 5250 screen/field model and host stream codec
//!
//! Leaf-first: buffer addressing, the screen and its fields, segmentation
//! for redraw, request encoding, the message-line overlay and the session
//! that ties a round trip together.

pub mod codes;
pub mod dataset;
pub mod field;
pub mod mapping;
pub mod overlay;
pub mod protocol;
pub mod request;
pub mod screen;
pub mod segmenter;
pub mod session;

// Re-exports for easy access
pub use codes::AidKey;
pub use dataset::DataSet;
pub use field::{AdjustFill, DbcsType, Field, FieldFormatWord, FieldIndex, ShiftEdit};
pub use mapping::BufferMapping;
pub use overlay::ErrorOverlay;
pub use protocol::{decode, HostStream};
pub use request::{Request, RequestEncoder, TelnetFlags};
pub use screen::{Screen, ScreenAttr, ScreenSize};
pub use segmenter::{DisplaySegmenter, Run, SegmentState};
pub use session::{HostTransport, Session, SubmitOutcome};
