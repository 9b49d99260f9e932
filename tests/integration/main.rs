//! Integration tests for linux-user

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const PASSWD: &str = "root:x:0:0:root:/root:/bin/bash\n\
                          alice:x:1001:1001:Alice A,,,:/home/alice:/bin/bash\n";
    const GROUP: &str = "root:x:0:\nalice:x:1001:\ndev:x:2000:alice\nempty:x:2001:\n";

    fn linux_user() -> Command {
        cargo_bin_cmd!("linux-user")
    }

    /// Temp dir holding fixture identity files and a config pointing at them
    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_passwd(PASSWD)
        }

        fn with_passwd(passwd: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let passwd_path = dir.path().join("passwd");
            let group_path = dir.path().join("group");
            std::fs::write(&passwd_path, passwd).unwrap();
            std::fs::write(&group_path, GROUP).unwrap();

            let config = format!(
                "[general]\naudit_log = false\n\n[directory]\npasswd_path = {:?}\ngroup_path = {:?}\n",
                passwd_path.display().to_string(),
                group_path.display().to_string()
            );
            std::fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn cmd(&self) -> Command {
            let mut cmd = linux_user();
            cmd.env_remove("LINUX_USER_CONFIG")
                .arg("--config")
                .arg(self.config_path());
            cmd
        }
    }

    #[test]
    fn help_displays() {
        linux_user()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("manage Linux users and groups"));
    }

    #[test]
    fn version_displays() {
        linux_user()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("linux-user"));
    }

    #[test]
    fn validate_accepts_portable_name() {
        linux_user().args(["validate", "_ok9"]).assert().success();
    }

    #[test]
    fn validate_rejects_uppercase() {
        linux_user()
            .args(["validate", "Root"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid argument"));
    }

    #[test]
    fn users_json() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["users", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"username\": \"alice\""))
            .stdout(predicate::str::contains("\"full_name\": \"Alice A\""));
    }

    #[test]
    fn users_plain() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["users", "--format", "plain"])
            .assert()
            .success()
            .stdout("root\nalice\n");
    }

    #[test]
    fn user_missing_fails() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["user", "nobody"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No such entry in users: nobody"));
    }

    #[test]
    fn group_with_no_members() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["group", "empty", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"members\": []"));
    }

    #[test]
    fn user_groups_lists_primary_and_supplementary() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["user-groups", "alice", "--format", "plain"])
            .assert()
            .success()
            .stdout("alice\ndev\n");
    }

    #[test]
    fn malformed_passwd_reports_line() {
        let fx = Fixture::with_passwd("root:x:0:0:root:/root:/bin/bash\nbroken:x\n");
        fx.cmd()
            .args(["users"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("line 2"));
    }

    #[test]
    fn config_path() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[directory]"))
            .stdout(predicate::str::contains("single_flight = true"));
    }

    #[test]
    fn config_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh").join("config.toml");

        linux_user()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("login_shell = \"/usr/sbin/nologin\""));
    }

    #[test]
    fn config_with_empty_tool_rejected() {
        let fx = Fixture::new();
        let mut config = std::fs::read_to_string(fx.config_path()).unwrap();
        config.push_str("\n[commands]\ngroupadd = \"\"\n");
        std::fs::write(fx.config_path(), config).unwrap();

        fx.cmd()
            .args(["groups"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("commands.groupadd"));
    }

    #[test]
    fn mutation_requires_root() {
        // SAFETY: geteuid has no preconditions
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let fx = Fixture::new();
        fx.cmd()
            .args(["add-user", "bob"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("must be run as root"));
    }
}
