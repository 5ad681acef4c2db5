pub mod errors;
pub mod session;
pub mod session_executor;
pub mod transfer_runner;

// Re-export the modules here for easy import elsewhere.
pub use errors::*;
pub use session::{Lease, Session};
pub use session_executor::SessionExecutor;
pub use transfer_runner::TransferRunner;
