//! Request handler module
//!
//! Responsible for request routing dispatch and the squirrel CRUD
//! operations behind it.

pub mod router;
pub mod squirrels;

// Re-export main entry point
pub use router::handle_request;
