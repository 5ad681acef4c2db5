pub mod bridge;
pub mod status;

pub use bridge::FtpBridge;
