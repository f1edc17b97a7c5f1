//! Domain store implementations

mod in_memory;
mod postgres;

pub use in_memory::InMemoryDomainStore;
pub use postgres::{PostgresConfig, PostgresDomainStore};
