//! Identity record types and line parsing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical cache key for one identity file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// The account file (`/etc/passwd`)
    Users,
    /// The group file (`/etc/group`)
    Groups,
}

impl Resource {
    /// Get the resource name as used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Groups => "groups",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of the account file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login name
    pub username: String,
    /// Password field, usually `x`
    pub password: String,
    /// Numeric user id
    pub uid: u32,
    /// Primary group id
    pub gid: u32,
    /// First comma-separated segment of the GECOS field
    pub full_name: Option<String>,
    /// Home directory
    pub home_dir: String,
    /// Login shell
    pub shell: String,
}

/// One line of the group file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group name
    pub groupname: String,
    /// Password field, usually `x`
    pub password: String,
    /// Numeric group id
    pub gid: u32,
    /// Supplementary members, in file order
    pub members: Vec<String>,
}

/// A record type parsed from one identity file
pub trait DirectoryRecord: Clone + Send + Sync + 'static {
    /// Which file this record comes from
    const RESOURCE: Resource;

    /// Minimum number of colon-separated fields per line
    const FIELDS: usize;

    /// Build a record from the split fields of one line
    ///
    /// `fields` always holds at least `FIELDS` entries.
    fn from_fields(fields: &[&str]) -> Result<Self, String>;

    /// Primary key (user or group name)
    fn name(&self) -> &str;

    /// Numeric id (uid or gid)
    fn id(&self) -> u32;
}

/// Ids are plain decimal digits; no sign or surrounding whitespace
fn parse_id(field: &str, what: &str) -> Result<u32, String> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid {} {:?}", what, field));
    }
    field
        .parse()
        .map_err(|_| format!("invalid {} {:?}", what, field))
}

impl DirectoryRecord for UserRecord {
    const RESOURCE: Resource = Resource::Users;
    const FIELDS: usize = 7;

    fn from_fields(f: &[&str]) -> Result<Self, String> {
        let full_name = f[4].split(',').next().filter(|s| !s.is_empty());

        Ok(Self {
            username: f[0].to_string(),
            password: f[1].to_string(),
            uid: parse_id(f[2], "uid")?,
            gid: parse_id(f[3], "gid")?,
            full_name: full_name.map(str::to_string),
            home_dir: f[5].to_string(),
            shell: f[6].to_string(),
        })
    }

    fn name(&self) -> &str {
        &self.username
    }

    fn id(&self) -> u32 {
        self.uid
    }
}

impl DirectoryRecord for GroupRecord {
    const RESOURCE: Resource = Resource::Groups;
    const FIELDS: usize = 4;

    fn from_fields(f: &[&str]) -> Result<Self, String> {
        let members = if f[3].is_empty() {
            Vec::new()
        } else {
            f[3].split(',').map(str::to_string).collect()
        };

        Ok(Self {
            groupname: f[0].to_string(),
            password: f[1].to_string(),
            gid: parse_id(f[2], "gid")?,
            members,
        })
    }

    fn name(&self) -> &str {
        &self.groupname
    }

    fn id(&self) -> u32 {
        self.gid
    }
}

/// Parse a single line into a record
pub fn parse_line<R: DirectoryRecord>(line: &str) -> Result<R, String> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() < R::FIELDS {
        return Err(format!(
            "expected {} fields, found {}",
            R::FIELDS,
            fields.len()
        ));
    }
    R::from_fields(&fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_passwd_line() {
        let user: UserRecord =
            parse_line("alice:x:1001:1001:Alice A,,,:/home/alice:/bin/bash").unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password, "x");
        assert_eq!(user.uid, 1001);
        assert_eq!(user.gid, 1001);
        assert_eq!(user.full_name.as_deref(), Some("Alice A"));
        assert_eq!(user.home_dir, "/home/alice");
        assert_eq!(user.shell, "/bin/bash");
    }

    #[test]
    fn empty_gecos_is_absent() {
        let user: UserRecord = parse_line("daemon:x:1:1::/usr/sbin:/usr/sbin/nologin").unwrap();
        assert_eq!(user.full_name, None);

        let user: UserRecord = parse_line("svc:x:998:998:,room 4,,:/:/bin/false").unwrap();
        assert_eq!(user.full_name, None);
    }

    #[test]
    fn extra_fields_ignored() {
        let user: UserRecord = parse_line("bob:x:1002:1002:Bob:/home/bob:/bin/sh:extra").unwrap();
        assert_eq!(user.shell, "/bin/sh");

        let group: GroupRecord = parse_line("dev:x:2000:bob:extra").unwrap();
        assert_eq!(group.members, vec!["bob"]);
    }

    #[test]
    fn empty_member_field_yields_no_members() {
        let group: GroupRecord = parse_line("dev:x:2000:").unwrap();
        assert_eq!(group.groupname, "dev");
        assert_eq!(group.gid, 2000);
        assert!(group.members.is_empty());
    }

    #[test]
    fn members_split_on_commas() {
        let group: GroupRecord = parse_line("sudo:x:27:alice,bob").unwrap();
        assert_eq!(group.members, vec!["alice", "bob"]);
    }

    #[test]
    fn short_line_rejected() {
        let err = parse_line::<UserRecord>("alice:x:1001").unwrap_err();
        assert!(err.contains("expected 7 fields"));

        let err = parse_line::<GroupRecord>("dev:x").unwrap_err();
        assert!(err.contains("expected 4 fields"));
    }

    #[test]
    fn non_numeric_id_rejected() {
        let err = parse_line::<UserRecord>("alice:x:abc:1001::/home/alice:/bin/sh").unwrap_err();
        assert!(err.contains("uid"));
    }

    #[test]
    fn padded_or_signed_id_rejected() {
        let err = parse_line::<UserRecord>("alice:x: 1001:1001::/home/alice:/bin/sh").unwrap_err();
        assert!(err.contains("uid"));

        let err = parse_line::<GroupRecord>("dev:x:+2000:").unwrap_err();
        assert!(err.contains("gid"));
    }

    #[test]
    fn resource_names() {
        assert_eq!(Resource::Users.to_string(), "users");
        assert_eq!(Resource::Groups.name(), "groups");
    }
}
