//! Integration tests for the `provenant` binary.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Env {
    _dir: TempDir,
    journal: PathBuf,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let journal = dir.path().join("registry.pvj");
        Self { _dir: dir, journal }
    }

    fn dir(&self) -> &Path {
        self._dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_provenant"))
            .env_remove("PROVENANT_JOURNAL")
            .env_remove("PROVENANT_IDENTITY")
            .env_remove("PROVENANT_CONFIG")
            .env_remove("PROVENANT_LOG")
            .arg("--journal")
            .arg(&self.journal)
            .args(args)
            .output()
            .unwrap()
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn json(&self, args: &[&str]) -> Value {
        let mut all = vec!["--json"];
        all.extend_from_slice(args);
        serde_json::from_str(&self.ok(&all)).unwrap()
    }

    fn fails(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert_eq!(output.status.code(), Some(1), "{:?} should fail", args);
        String::from_utf8(output.stderr).unwrap()
    }

    fn register(&self, owner: &str, name: &str) -> u64 {
        self.json(&[
            "--as",
            owner,
            "register",
            "--name",
            name,
            "--description",
            "Tin-glazed earthenware",
            "--origin",
            "Delft",
            "--year",
            "1680",
            "--doc-hash",
            "sha256:5d41402a",
        ])["item_id"]
            .as_u64()
            .unwrap()
    }
}

#[test]
fn test_full_lifecycle() {
    let env = Env::new();
    env.ok(&["init", "--admin", "org:museum"]);

    let item = env.register("human:alice", "Vase");
    assert_eq!(item, 1);

    env.ok(&["--as", "org:museum", "authorize", "human:expert"]);
    env.ok(&["--as", "human:expert", "verify", "1"]);
    env.ok(&[
        "--as", "human:alice", "transfer", "1", "--to", "human:bob", "--price", "500",
    ]);

    let item = env.json(&["item", "1"]);
    assert_eq!(item["current_owner"], "human:bob");
    assert_eq!(item["verified"], true);
    assert_eq!(item["verifier"], "human:expert");

    let history = env.json(&["history", "1"]);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["owner"], "human:alice");
    assert_eq!(history[0]["price"], "0");
    assert_eq!(history[1]["owner"], "human:bob");
    assert_eq!(history[1]["price"], "500");

    assert_eq!(env.json(&["total"])["total_items"], 1);
    assert_eq!(env.json(&["owned", "human:bob"])["items"], serde_json::json!([1]));
    assert_eq!(env.json(&["is-verifier", "human:expert"])["authorized"], true);

    let table = env.ok(&["history", "1"]);
    assert!(table.contains("human:alice"));
    assert!(table.contains("500"));

    env.ok(&["audit"]);
}

#[test]
fn test_errors_carry_codes() {
    let env = Env::new();
    env.ok(&["init", "--admin", "org:museum"]);
    env.register("human:alice", "Vase");

    let stderr = env.fails(&["--as", "human:mallory", "verify", "1"]);
    assert!(stderr.contains("UNAUTHORIZED"), "{}", stderr);

    env.ok(&["--as", "org:museum", "verify", "1"]);
    let stderr = env.fails(&["--as", "human:mallory", "verify", "1"]);
    assert!(stderr.contains("ALREADY_VERIFIED"), "{}", stderr);

    let stderr = env.fails(&["item", "7"]);
    assert!(stderr.contains("NOT_FOUND"), "{}", stderr);

    let stderr = env.fails(&["--as", "human:alice", "transfer", "1", "--to", "human:alice"]);
    assert!(stderr.contains("INVALID_TARGET"), "{}", stderr);

    let stderr = env.fails(&["--as", "org:museum", "revoke", "org:museum"]);
    assert!(stderr.contains("CANNOT_REVOKE_ADMIN"), "{}", stderr);

    let stderr = env.fails(&["--as", "org:museum", "revoke", "human:nobody"]);
    assert!(stderr.contains("NOT_AUTHORIZED"), "{}", stderr);

    // Nothing above reached the journal.
    let log = env.ok(&["--json", "log"]);
    assert_eq!(log.lines().count(), 3);
}

#[test]
fn test_mutation_requires_identity() {
    let env = Env::new();
    env.ok(&["init", "--admin", "org:museum"]);
    let stderr = env.fails(&["verify", "1"]);
    assert!(stderr.contains("--as"), "{}", stderr);
}

#[test]
fn test_init_twice_fails() {
    let env = Env::new();
    env.ok(&["init", "--admin", "org:museum"]);
    let stderr = env.fails(&["init", "--admin", "org:other"]);
    assert!(stderr.contains("already initialized"), "{}", stderr);
}

#[test]
fn test_log_filters() {
    let env = Env::new();
    env.ok(&["init", "--admin", "org:museum"]);
    env.register("human:alice", "Vase");
    env.register("human:bob", "Clock");
    env.ok(&["--as", "human:bob", "transfer", "2", "--to", "human:carol", "--price", "90"]);

    let lines = env.ok(&["--json", "log", "--item", "2"]);
    let events: Vec<Value> = lines
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["payload"]["kind"], "item_registered");
    assert_eq!(events[1]["payload"]["kind"], "ownership_transferred");

    let lines = env.ok(&["--json", "log", "--kind", "item_registered", "--actor", "human:alice"]);
    assert_eq!(lines.lines().count(), 1);

    let table = env.ok(&["log"]);
    assert!(table.contains("registry_created"));
    assert!(table.contains("ownership_transferred"));
}

#[test]
fn test_audit_detects_tampering() {
    let env = Env::new();
    env.ok(&["init", "--admin", "org:museum"]);
    env.register("human:alice", "Vase");
    env.ok(&["--as", "human:alice", "transfer", "1", "--to", "human:bob", "--price", "7"]);

    let bytes = fs::read(&env.journal).unwrap();
    let needle = b"\"price\":\"7\"";
    let at = bytes
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap();
    let mut edited = bytes.clone();
    edited[at + needle.len() - 2] = b'1';
    fs::write(&env.journal, edited).unwrap();

    let output = env.run(&["--json", "audit"]);
    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["events"], 3);
    assert_eq!(report["faults"][0]["seq"], 3);
}

#[test]
fn test_config_file_supplies_defaults() {
    let env = Env::new();
    let journal = env.dir().join("from-config.pvj");
    let config = env.dir().join("provenant.toml");
    fs::write(
        &config,
        format!(
            "journal = {:?}\nidentity = \"org:museum\"\n\n[registry]\nmax_year = 1500\n",
            journal.display().to_string()
        ),
    )
    .unwrap();

    let run = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_provenant"))
            .env_remove("PROVENANT_JOURNAL")
            .env_remove("PROVENANT_IDENTITY")
            .env("PROVENANT_CONFIG", &config)
            .args(args)
            .output()
            .unwrap()
    };

    assert!(run(&["init", "--admin", "org:museum"]).status.success());
    assert!(journal.exists());

    let output = run(&[
        "register",
        "--name",
        "Vase",
        "--description",
        "Tin-glazed earthenware",
        "--origin",
        "Delft",
        "--year",
        "1680",
        "--doc-hash",
        "sha256:5d41402a",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("INVALID_FIELD"));

    let output = run(&[
        "register",
        "--name",
        "Amphora",
        "--description",
        "Attic black-figure amphora",
        "--origin",
        "Athens",
        "--year",
        "-540",
        "--doc-hash",
        "sha256:7a1c",
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
