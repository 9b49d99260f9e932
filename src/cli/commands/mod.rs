//! CLI command implementations

pub mod account;
pub mod config;
pub mod list;
pub mod show;
pub mod validate;

pub use account::{add_group, add_to_group, add_user, passwd, remove_group, remove_user};
pub use config::execute as config;
pub use list::{groups, users};
pub use show::{group, user, user_groups};
pub use validate::execute as validate;
