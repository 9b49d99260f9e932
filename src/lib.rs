//! linux-user - Linux user and group management
//!
//! Reads `/etc/passwd` and `/etc/group` through an invalidating cache and
//! runs the shadow-utils tools for every change.

pub mod audit;
pub mod callback;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod exec;
pub mod manager;
pub mod preflight;
pub mod ui;
pub mod validate;

pub use directory::{GroupRecord, Resource, UserRecord};
pub use error::{UserError, UserResult};
pub use manager::IdentityManager;
pub use validate::{validate_name, validate_username};
