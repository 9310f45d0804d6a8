// ABOUTME: Closed catalog of typed event kinds exchanged between UI panels and controllers
// ABOUTME: Each kind fixes its payload and response types at compile time

pub mod catalog;
pub mod event;
pub mod kind;
mod macros;

pub use catalog::all_kinds;
pub use event::{Event, ReplyCallback, ReplyOutcome};
pub use kind::{Delivery, EventKind, GLOBAL_PREFIX, KindDescriptor};
