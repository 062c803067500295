//! Modification clock.
//!
//! Every stateful object (pipeline node, data snapshot, mapper) owns a
//! [`TimeStamp`]. Stamps are drawn from one process-wide monotonic counter, so
//! comparing two stamps tells which change happened last regardless of which
//! object made it. Dirty checks throughout the engine reduce to
//! "is any dependency stamp newer than my output stamp?".

mod stamp;

pub use stamp::{assign, now, TimeStamp};
