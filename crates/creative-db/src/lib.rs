//! Creative DB Library
//!
//! Postgres repositories for modal images, templates, uploads, OAuth credentials,
//! the audit log, roles and users.

pub mod db;

pub use db::*;
