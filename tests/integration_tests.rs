//! Integration tests for shulker
//!
//! These tests drive the built binary: the top-level dispatcher, the
//! forwarded tools, and the fox shell through piped stdin.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DATASET: &str = r#"{
    "title": "Division codes 2023",
    "year": 2023,
    "data": {
        "110000000000": "北京市",
        "110105000000": "朝阳区",
        "120000000000": "天津市"
    }
}"#;

/// A shulker command isolated from the user's config and data directories.
fn shulker(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("shulker");
    cmd.env_remove("SHULKER_CONFIG")
        .env_remove("SHULKER_DISCOVERY")
        .env_remove("SHULKER_DATAPACK")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"));
    cmd
}

fn create_home() -> TempDir {
    TempDir::new().unwrap()
}

/// Helper to create a datapack with one dataset
fn create_datapack(home: &TempDir) -> PathBuf {
    let datapack = home.path().join("codes");
    fs::create_dir_all(&datapack).unwrap();
    fs::write(datapack.join("2023.json"), DATASET).unwrap();
    datapack
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_shulker_help() {
        let home = create_home();
        shulker(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("config"));
    }

    #[test]
    fn test_shulker_version() {
        let home = create_home();
        shulker(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_bare_invocation_lists_tools() {
        let home = create_home();
        shulker(&home)
            .assert()
            .success()
            .stdout(predicate::str::contains("fox"))
            .stdout(predicate::str::contains("wp"));
    }

    #[test]
    fn test_list_shows_descriptions() {
        let home = create_home();
        shulker(&home)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("Enter the fox shell"))
            .stdout(predicate::str::contains("WSL mount paths"));
    }

    #[test]
    fn test_verbose_logs_discovery() {
        let home = create_home();
        shulker(&home)
            .args(["-v", "list"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Loaded command source"));
    }

    #[test]
    fn test_status() {
        let home = create_home();
        shulker(&home)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Shulker Status"))
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
            .stdout(predicate::str::contains("not found, using defaults"));
    }

    #[test]
    fn test_unknown_tool_fails() {
        let home = create_home();
        shulker(&home)
            .arg("nope")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No such command 'nope'"));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let home = create_home();
        shulker(&home)
            .arg("--config")
            .arg(home.path().join("absent.toml"))
            .arg("list")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read config file"));
    }
}

// =============================================================================
// wp Tests
// =============================================================================

mod wp {
    use super::*;

    #[test]
    fn test_wsl_to_windows() {
        let home = create_home();
        shulker(&home)
            .args(["wp", "/mnt/c/Users/me"])
            .assert()
            .success()
            .stdout("C:\\Users\\me\n");
    }

    #[test]
    fn test_windows_to_wsl() {
        let home = create_home();
        shulker(&home)
            .args(["wp", r"D:\Pictures\camera\a.jpg"])
            .assert()
            .success()
            .stdout("/mnt/d/Pictures/camera/a.jpg\n");
    }

    #[test]
    fn test_unconvertible_path_exits_255() {
        let home = create_home();
        shulker(&home)
            .args(["wp", "/home/me"])
            .assert()
            .code(255)
            .stderr(predicate::str::contains("not a Windows mount path in WSL"));
    }

    #[test]
    fn test_prompt_reads_stdin() {
        let home = create_home();
        shulker(&home)
            .arg("wp")
            .write_stdin("/mnt/e/data\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("E:\\data"));
    }

    #[test]
    fn test_help_is_printed_by_tool() {
        let home = create_home();
        shulker(&home)
            .args(["wp", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage: wp"));
    }

    #[test]
    fn test_bad_flag_is_usage_error() {
        let home = create_home();
        shulker(&home)
            .args(["wp", "--bogus"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("--bogus"));
    }
}

// =============================================================================
// Fox Shell Tests
// =============================================================================

mod fox_shell {
    use super::*;

    #[test]
    fn test_help_then_exit() {
        let home = create_home();
        shulker(&home)
            .arg("fox")
            .write_stdin("help\nexit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Welcome to shulker fox shell."))
            .stdout(predicate::str::contains("fox> "))
            .stdout(predicate::str::contains("adc"))
            .stdout(predicate::str::contains("Leave the shell"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let home = create_home();
        shulker(&home)
            .arg("fox")
            .write_stdin("\n   \n")
            .assert()
            .success();
    }

    #[test]
    fn test_unknown_command_warns() {
        let home = create_home();
        shulker(&home)
            .arg("fox")
            .write_stdin("frobnicate\nexit\n")
            .assert()
            .success()
            .stderr(predicate::str::contains("Command not found: frobnicate"));
    }

    #[test]
    fn test_usage_error_stays_in_shell() {
        let home = create_home();
        shulker(&home)
            .arg("fox")
            .write_stdin("adc parse\nhelp\nexit\n")
            .assert()
            .success()
            .stderr(predicate::str::contains("<CODE>"))
            .stdout(predicate::str::contains("Leave the shell"));
    }

    #[test]
    fn test_context_survives_between_commands() {
        let home = create_home();
        let datapack = create_datapack(&home);
        shulker(&home)
            .env("SHULKER_DATAPACK", &datapack)
            .arg("fox")
            .write_stdin("adc load -y\nadc search -n 朝阳\nexit\n")
            .assert()
            .success()
            .stderr(predicate::str::contains("Loaded"))
            .stdout(predicate::str::contains("2023.json | 110105000000\t朝阳区"));
    }

    #[test]
    fn test_fresh_shell_has_no_data() {
        let home = create_home();
        let datapack = create_datapack(&home);
        shulker(&home)
            .env("SHULKER_DATAPACK", &datapack)
            .arg("fox")
            .write_stdin("adc search -n 朝阳\nexit\n")
            .assert()
            .success()
            .stderr(predicate::str::contains("No data loaded."));
    }

    #[test]
    fn test_prompt_from_config() {
        let home = create_home();
        let config = home.path().join("shulker.toml");
        fs::write(&config, "[shell]\nprompt = \"den> \"\nintro = \"\"\n").unwrap();
        shulker(&home)
            .arg("--config")
            .arg(&config)
            .arg("fox")
            .write_stdin("exit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("den> "))
            .stdout(predicate::str::contains("Welcome").not());
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod configuration {
    use super::*;

    #[test]
    fn test_config_init_then_show() {
        let home = create_home();
        let config = home.path().join("nested").join("shulker.toml");

        shulker(&home)
            .arg("--config")
            .arg(&config)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created shulker.toml"));
        assert!(config.exists());

        shulker(&home)
            .arg("--config")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[shell]"))
            .stdout(predicate::str::contains("fox> "))
            .stdout(predicate::str::contains("on_error = \"fail\""));
    }

    #[test]
    fn test_config_init_does_not_overwrite() {
        let home = create_home();
        let config = home.path().join("shulker.toml");
        fs::write(&config, "[shell]\nprompt = \"mine> \"\n").unwrap();

        shulker(&home)
            .arg("--config")
            .arg(&config)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
        assert!(fs::read_to_string(&config).unwrap().contains("mine> "));
    }

    #[test]
    fn test_config_show_without_file() {
        let home = create_home();
        shulker(&home)
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("No shulker.toml found"))
            .stdout(predicate::str::contains("shulker config init"));
    }

    #[test]
    fn test_config_validate() {
        let home = create_home();
        let config = home.path().join("shulker.toml");

        fs::write(&config, "[discovery]\non_error = \"skip\"\n").unwrap();
        shulker(&home)
            .arg("--config")
            .arg(&config)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid."));

        fs::write(&config, "[adc]\ndatapack = \"/definitely/not/here\"\n").unwrap();
        shulker(&home)
            .arg("--config")
            .arg(&config)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("is not a directory"));
    }

    #[test]
    fn test_config_validate_rejects_bad_toml() {
        let home = create_home();
        let config = home.path().join("shulker.toml");
        fs::write(&config, "[discovery]\non_error = \"sometimes\"\n").unwrap();
        shulker(&home)
            .arg("--config")
            .arg(&config)
            .args(["config", "validate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_env_var_is_used() {
        let home = create_home();
        let config = home.path().join("elsewhere.toml");
        fs::write(&config, "[shell]\nprompt = \"env> \"\nintro = \"\"\n").unwrap();
        shulker(&home)
            .env("SHULKER_CONFIG", &config)
            .arg("fox")
            .write_stdin("exit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("env> "));
    }
}
