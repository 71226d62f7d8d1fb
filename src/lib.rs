//! Client-side session and profile management for HTTP APIs that wrap
//! every result in a `{success, data, message, error}` envelope.
//!
//! [`session::SessionManager`] acquires and drops the session credential,
//! [`profile::ProfileAccessor`] reads and writes the user's profile, both on
//! top of the request dispatcher in [`client`] and a
//! [`store::CredentialStore`].

pub mod api;
pub mod client;
pub mod config;
pub mod filelock;
pub mod logs;
pub mod profile;
pub mod session;
pub mod store;
