pub mod document;
pub mod errors;
pub mod paths;
pub mod profile;
pub mod store;

pub use errors::StoreError;
pub use paths::StorePaths;
pub use profile::ConnectionProfile;
pub use store::{LoadOutcome, Persistence, ProfileStore};
