//! Port implementations

pub mod memory;

pub use memory::{InMemoryChangeLog, InMemoryClaimStore, InMemoryCompanyDirectory};
