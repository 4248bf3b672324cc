#![forbid(unsafe_code)]

pub mod lenient;
pub mod model;
pub mod time;
pub mod tracker;

pub use time::Clock;
pub use tracker::{
    ChecklistItem, ProgressStats, ProgressTracker, Recompute, SettleOutcome, SyncRequest,
    SyncTicket, ToggleOutcome,
};
