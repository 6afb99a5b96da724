//! Types kept in the visitor's session.

pub mod session;

pub use session::keys as session_keys;
