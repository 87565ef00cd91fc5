//! Port traits implemented by outbound adapters.

pub mod store;

pub use store::RecordStore;
