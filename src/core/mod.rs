//! Core module for trace session data and the timeline synchronization logic.
//!
//! Nothing in here draws; the GUI reads this state and feeds back actions.

pub mod config;
pub mod error;
pub mod parser;
pub mod playback;
pub mod scrubber;
pub mod selection;
pub mod time;
pub mod timeline;
pub mod trace;
pub mod trace_list;
