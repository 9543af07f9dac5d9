//! In-memory stand-ins for the credential store and activity log, so the manager can be
//! tested without a database.

pub mod mock_store;

pub use mock_store::{MockActivityLog, MockCredentialStore};
