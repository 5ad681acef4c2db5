pub mod errors;
pub mod ftp;
pub mod params;
pub mod transport;

// Re-export the modules here for easy import elsewhere.
pub use errors::*;
pub use params::*;
pub use transport::*;
