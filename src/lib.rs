pub mod api;
pub mod connections;
pub mod core;
pub mod storage;
pub mod ui;
pub mod utils;

// re‑export ergonomic entry points
pub use crate::api::FtpBridge;
pub use crate::connections::{ConnectionParams, Transport, TransportFactory};
pub use crate::core::{SessionError, SessionExecutor, TransferRunner};
pub use crate::storage::{ConnectionProfile, ProfileStore, StorePaths};
