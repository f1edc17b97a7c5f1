//! Infrastructure layer - key material, storage backends and services

pub mod domain_store;
pub mod keys;
pub mod logging;
pub mod mail_domain;
pub mod observability;
