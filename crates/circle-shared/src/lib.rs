//! # Circle Shared
//!
//! Wire types shared by the API server and its clients: request/response
//! DTOs, RFC 7807 error bodies and request validation.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::{ErrorResponse, MessageResponse};
pub use validation::{FieldError, Validate};
