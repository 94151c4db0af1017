//! Device lifecycle state machines
//!
//! Explicit, finite and deterministic. The drivers hold one of these and
//! consult it before touching the bus.

pub mod events;
pub mod machine;

pub use events::{PanelEvent, StripEvent};
pub use machine::{PanelState, StripState};
