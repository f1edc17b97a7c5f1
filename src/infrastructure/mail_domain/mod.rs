//! Domain lifecycle and authentication services

mod authenticator;
mod deadline;
mod manager;

pub use authenticator::{Authenticator, BasicCredential};
pub use deadline::bounded;
pub use manager::DomainManager;
