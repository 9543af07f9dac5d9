//! Database repositories for data access layer
//!
//! Each repository owns one table and exposes its CRUD queries. `CredentialStore` and
//! `ActivityLog` are the seams the integrations crate talks to.

pub mod credential;
pub mod log;
pub mod modal;
pub mod role;
pub mod store;
pub mod template;
pub mod upload;

pub use credential::OAuthCredentialRepository;
pub use log::LogRepository;
pub use modal::ModalImageRepository;
pub use role::{RoleRepository, UserRepository};
pub use store::{ActivityLog, CredentialStore};
pub use template::TemplateRepository;
pub use upload::UploadRepository;
