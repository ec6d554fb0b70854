//! Integration tests for Satchel

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated to `temp`: state under it, no config file present
    fn satchel(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("satchel");
        cmd.env_remove("SATCHEL_SESSION")
            .arg("--state-dir")
            .arg(temp.path().join("state"))
            .arg("--config")
            .arg(temp.path().join("config.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("satchel")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("request-scoped session store"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("satchel")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("satchel"));
    }

    #[test]
    fn write_then_read_across_invocations() {
        let temp = TempDir::new().unwrap();

        satchel(&temp).arg("open").assert().success();
        satchel(&temp)
            .args(["write", "user.name", "alice"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Stored user.name"));

        satchel(&temp)
            .args(["read", "user.name"])
            .assert()
            .success()
            .stdout("alice\n");
    }

    #[test]
    fn typed_write_reads_back_as_json() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["write", "cart.count", "3", "--type", "int"])
            .assert()
            .success();

        satchel(&temp)
            .args(["read", "cart", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"count\": 3"));
    }

    #[test]
    fn read_missing_key_fails() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["read", "nothing.here"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Key not set"));
    }

    #[test]
    fn write_empty_value_fails() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["write", "flag", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid argument"));
    }

    #[test]
    fn failed_requests_leave_no_session_behind() {
        let temp = TempDir::new().unwrap();

        for _ in 0..3 {
            satchel(&temp).args(["write", "flag", "0"]).assert().failure();
        }
        satchel(&temp).args(["destroy", ""]).assert().failure();

        let sessions = std::fs::read_dir(temp.path().join("state").join("sessions"))
            .unwrap()
            .count();
        assert_eq!(sessions, 0);
        assert!(!temp.path().join("state").join("cookie").exists());

        satchel(&temp)
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn destroy_removes_key() {
        let temp = TempDir::new().unwrap();

        satchel(&temp).args(["write", "a", "x"]).assert().success();
        satchel(&temp).args(["destroy", "a"]).assert().success();
        satchel(&temp).args(["read", "a"]).assert().failure();
    }

    #[test]
    fn dump_lists_registration_keys() {
        let temp = TempDir::new().unwrap();

        satchel(&temp).args(["write", "a", "x"]).assert().success();
        satchel(&temp)
            .args(["dump", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("session_id"))
            .stdout(predicate::str::contains("session_start"))
            .stdout(predicate::str::contains("a\n"));
    }

    #[test]
    fn close_forgets_session() {
        let temp = TempDir::new().unwrap();

        satchel(&temp).args(["write", "a", "x"]).assert().success();
        satchel(&temp).arg("close").assert().success();

        satchel(&temp)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("No session cookie"));
        satchel(&temp).args(["read", "a"]).assert().failure();
    }

    #[test]
    fn status_unknown_session_fails() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["status", "--session", "no-such-session"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Session not found"));
    }

    #[test]
    fn list_shows_stored_session() {
        let temp = TempDir::new().unwrap();

        satchel(&temp).arg("open").assert().success();
        satchel(&temp)
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }

    #[test]
    fn gc_renews_fresh_session() {
        let temp = TempDir::new().unwrap();

        satchel(&temp).arg("open").assert().success();
        satchel(&temp)
            .args(["gc", "--max-lifetime", "30"])
            .assert()
            .success()
            .stdout(predicate::str::contains("state: active"));
    }

    #[test]
    fn gc_rejects_zero_lifetime() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["gc", "--max-lifetime", "0"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid value"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[session]"));
    }

    #[test]
    fn config_set_persists() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["config", "set", "session.nesting", "uniform"])
            .assert()
            .success();

        satchel(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("nesting = \"uniform\""));
    }

    #[test]
    fn config_refuses_memory_backend() {
        let temp = TempDir::new().unwrap();

        satchel(&temp)
            .args(["config", "set", "session.backend", "memory"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("memory backend"));
        assert!(!temp.path().join("config.toml").exists());
    }
}
