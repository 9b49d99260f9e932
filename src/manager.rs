//! Identity manager: the public operation surface
//!
//! Every mutation follows the same sequence:
//!
//! 1. validate every name (invalid input stops here, nothing else happens)
//! 2. invalidate the affected cache resources
//! 3. run the external command
//! 4. invalidate the same resources again
//! 5. for creations, look the new entity up through the cache
//!
//! Invalidation happens before the command runs and again once it has
//! finished, whatever its outcome, and is never rolled back. A failed
//! command still forces the next read to go to the file, and a read that
//! overlapped the command cannot leave pre-command content cached.

use crate::audit::AuditLog;
use crate::config::Config;
use crate::directory::{Directory, DirectoryReader, GroupRecord, Resource, UserRecord};
use crate::error::{UserError, UserResult};
use crate::exec::{CommandOutput, CommandRunner, CommandSpec, CommandTable, SystemRunner};
use crate::validate::{validate_name, ValidName};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates reads and mutations of the system user and group files
pub struct IdentityManager {
    directory: Arc<Directory>,
    runner: Arc<dyn CommandRunner>,
    commands: CommandTable,
    audit: AuditLog,
}

impl IdentityManager {
    /// Create a manager from its parts, with audit logging disabled
    pub fn new(
        directory: Arc<Directory>,
        runner: Arc<dyn CommandRunner>,
        commands: CommandTable,
    ) -> Self {
        Self {
            directory,
            runner,
            commands,
            audit: AuditLog::disabled(),
        }
    }

    /// Create a manager that runs the real system tools
    pub fn from_config(config: &Config) -> Self {
        let reader = DirectoryReader::new(
            config.directory.passwd_path.clone(),
            config.directory.group_path.clone(),
        );
        let directory =
            Directory::new(reader).with_single_flight(config.directory.single_flight);

        Self::new(
            Arc::new(directory),
            Arc::new(SystemRunner::new()),
            CommandTable::new(config.commands.clone()),
        )
        .with_audit(AuditLog::new(config))
    }

    /// Replace the audit logger
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = audit;
        self
    }

    /// Get the cached directory
    pub fn directory(&self) -> &Arc<Directory> {
        &self.directory
    }

    /// Check a candidate user name
    pub fn validate_username(name: &str) -> bool {
        validate_name(name)
    }

    // Reads

    /// Get every account
    pub async fn get_users(&self) -> UserResult<Arc<Vec<UserRecord>>> {
        self.directory.records().await
    }

    /// Get one account by name
    pub async fn get_user_info(&self, username: &str) -> UserResult<UserRecord> {
        self.directory
            .lookup(username, |u: &UserRecord| u.username.as_str())
            .await
    }

    /// Get one account by uid
    pub async fn get_user_by_uid(&self, uid: u32) -> UserResult<UserRecord> {
        self.directory.lookup(&uid, |u: &UserRecord| &u.uid).await
    }

    /// Get every group
    pub async fn get_groups(&self) -> UserResult<Arc<Vec<GroupRecord>>> {
        self.directory.records().await
    }

    /// Get one group by name; a missing group is `None`
    pub async fn get_group_info(&self, groupname: &str) -> UserResult<Option<GroupRecord>> {
        self.directory
            .find(groupname, |g: &GroupRecord| g.groupname.as_str())
            .await
    }

    /// Get one group by gid
    pub async fn get_group_by_gid(&self, gid: u32) -> UserResult<GroupRecord> {
        self.directory.lookup(&gid, |g: &GroupRecord| &g.gid).await
    }

    /// Get the groups an account belongs to, primary group included
    pub async fn groups_of_user(&self, username: &str) -> UserResult<Vec<GroupRecord>> {
        let (users, groups) =
            futures_util::try_join!(self.get_users(), self.get_groups())?;

        let user = users
            .iter()
            .find(|u| u.username == username)
            .ok_or_else(|| UserError::NotFound {
                resource: Resource::Users,
                key: username.to_string(),
            })?;

        Ok(groups
            .iter()
            .filter(|g| g.gid == user.gid || g.members.iter().any(|m| m == username))
            .cloned()
            .collect())
    }

    /// Drop every cached resource
    pub async fn refresh(&self) {
        self.directory.cache().invalidate_all().await;
    }

    // Mutations

    /// Create an account with a home directory and no login shell
    pub async fn add_user(&self, username: &str) -> UserResult<UserRecord> {
        let user = ValidName::parse("add_user", username)?;
        let spec = self.commands.create_account(&user);

        self.dispatch("user.added", &[Resource::Users], spec, json!({ "username": username }))
            .await?;
        self.get_user_info(user.as_str()).await
    }

    /// Delete an account and its home directory; returns the tool's stdout
    pub async fn remove_user(&self, username: &str) -> UserResult<String> {
        let user = ValidName::parse("remove_user", username)?;
        let spec = self.commands.delete_account(&user);

        let output = self
            .dispatch("user.removed", &[Resource::Users], spec, json!({ "username": username }))
            .await?;
        Ok(output.stdout)
    }

    /// Set an account password through the interactive password tool
    pub async fn set_password(&self, username: &str, password: &str) -> UserResult<()> {
        let user = ValidName::parse("set_password", username)?;
        if password.is_empty() {
            return Err(UserError::invalid(
                "set_password",
                "",
                "password must not be empty",
            ));
        }

        let spec = self.commands.set_password(&user);
        info!("Setting password for {}", user);

        let result = match self.runner.run_with_stdin(&spec, password).await {
            Ok(signal) if !signal.success() && self.commands.check_password_exit() => {
                let status = signal
                    .code
                    .map_or_else(|| "terminated by signal".to_string(), |c| {
                        format!("exited with code {}", c)
                    });
                Err(UserError::command(&spec.program, &spec.args, status))
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };

        self.record("user.password_set", json!({ "username": username }), &result)
            .await;
        result
    }

    /// Create a group
    pub async fn add_group(&self, groupname: &str) -> UserResult<GroupRecord> {
        let group = ValidName::parse("add_group", groupname)?;
        let spec = self.commands.create_group(&group);

        self.dispatch("group.added", &[Resource::Groups], spec, json!({ "groupname": groupname }))
            .await?;
        self.directory
            .lookup(group.as_str(), |g: &GroupRecord| g.groupname.as_str())
            .await
    }

    /// Delete a group; returns the tool's stdout
    pub async fn remove_group(&self, groupname: &str) -> UserResult<String> {
        let group = ValidName::parse("remove_group", groupname)?;
        let spec = self.commands.delete_group(&group);

        let output = self
            .dispatch(
                "group.removed",
                &[Resource::Groups],
                spec,
                json!({ "groupname": groupname }),
            )
            .await?;
        Ok(output.stdout)
    }

    /// Add an account to a supplementary group; returns the tool's stdout
    pub async fn add_user_to_group(&self, username: &str, groupname: &str) -> UserResult<String> {
        let user = ValidName::parse("add_user_to_group", username)?;
        let group = ValidName::parse("add_user_to_group", groupname)?;
        let spec = self.commands.add_member(&group, &user);

        let output = self
            .dispatch(
                "group.member_added",
                &[Resource::Users, Resource::Groups],
                spec,
                json!({ "username": username, "groupname": groupname }),
            )
            .await?;
        Ok(output.stdout)
    }

    async fn dispatch(
        &self,
        event: &str,
        invalidate: &[Resource],
        spec: CommandSpec,
        target: serde_json::Value,
    ) -> UserResult<CommandOutput> {
        self.invalidate(invalidate).await;

        info!("Running {}", spec);
        let result = self.runner.run(&spec).await;

        // A read that missed while the command ran may have stored the
        // pre-command file under the bumped generation
        self.invalidate(invalidate).await;

        self.record(event, target, &result).await;
        result
    }

    async fn invalidate(&self, resources: &[Resource]) {
        for resource in resources {
            self.directory.cache().invalidate(*resource).await;
            debug!("Invalidated {}", resource);
        }
    }

    async fn record<T>(&self, event: &str, target: serde_json::Value, result: &UserResult<T>) {
        let data = match result {
            Ok(_) => json!({ "target": target, "success": true }),
            Err(e) => json!({ "target": target, "success": false, "error": e.to_string() }),
        };
        self.audit.log(event, &data).await;
    }
}
