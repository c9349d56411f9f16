//! # Circle Core
//!
//! The domain layer of the Circle social-profile backend.
//! This crate contains the entities, their consistency rules and the ports
//! that infrastructure implements. It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod guard;
pub mod ports;

pub use error::{DomainError, RepoError};
