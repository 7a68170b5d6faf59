//! # Linkden Shared
//!
//! Wire types of the HTTP API: request bodies, response bodies and the
//! RFC 7807 error document.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
