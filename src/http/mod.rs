//! HTTP protocol layer module
//!
//! Body parsing and response emission primitives, decoupled from the
//! squirrel business logic.

pub mod form;
pub mod responder;
pub mod response;

// Re-export commonly used types
pub use form::{parse_squirrel_form, SquirrelForm};
pub use responder::{HyperResponder, Responder};
pub use response::{build_413_response, build_500_response};
