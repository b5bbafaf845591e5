pub mod maintenance;
pub mod stats;
pub mod store;
pub mod types;

pub use store::{EntryStore, SaveOutcome};
pub use types::{Entry, StoreError};
