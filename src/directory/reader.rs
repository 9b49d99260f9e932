//! Reads and parses the identity files

use crate::directory::records::{parse_line, DirectoryRecord, GroupRecord, Resource, UserRecord};
use crate::error::{UserError, UserResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Default account file
pub const DEFAULT_PASSWD_PATH: &str = "/etc/passwd";

/// Default group file
pub const DEFAULT_GROUP_PATH: &str = "/etc/group";

/// Reads the account and group files from disk
#[derive(Debug, Clone)]
pub struct DirectoryReader {
    passwd_path: PathBuf,
    group_path: PathBuf,
}

impl DirectoryReader {
    /// Create a reader over explicit file paths
    pub fn new(passwd_path: impl Into<PathBuf>, group_path: impl Into<PathBuf>) -> Self {
        Self {
            passwd_path: passwd_path.into(),
            group_path: group_path.into(),
        }
    }

    /// Get the backing file for a resource
    pub fn path(&self, resource: Resource) -> &Path {
        match resource {
            Resource::Users => &self.passwd_path,
            Resource::Groups => &self.group_path,
        }
    }

    /// Read every record of one resource
    pub async fn read<R: DirectoryRecord>(&self) -> UserResult<Vec<R>> {
        let path = self.path(R::RESOURCE);
        debug!("Reading {} from {}", R::RESOURCE, path.display());

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| UserError::io(format!("reading {}", path.display()), e))?;

        parse_contents(path, &content)
    }

    /// Read the account file
    pub async fn read_users(&self) -> UserResult<Vec<UserRecord>> {
        self.read().await
    }

    /// Read the group file
    pub async fn read_groups(&self) -> UserResult<Vec<GroupRecord>> {
        self.read().await
    }
}

impl Default for DirectoryReader {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWD_PATH, DEFAULT_GROUP_PATH)
    }
}

/// Parse the full text of an identity file
///
/// Only the empty line left by a final newline is dropped; any other empty
/// line is malformed.
pub fn parse_contents<R: DirectoryRecord>(path: &Path, content: &str) -> UserResult<Vec<R>> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            parse_line::<R>(line).map_err(|reason| UserError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            })
        })
        .collect()
}

/// Parse passwd-format text
pub fn parse_passwd(content: &str) -> UserResult<Vec<UserRecord>> {
    parse_contents(Path::new(DEFAULT_PASSWD_PATH), content)
}

/// Parse group-format text
pub fn parse_group(content: &str) -> UserResult<Vec<GroupRecord>> {
    parse_contents(Path::new(DEFAULT_GROUP_PATH), content)
}
