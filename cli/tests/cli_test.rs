//! End-to-end tests for the `levy` binary
//!
//! Each test runs the real binary against a fresh data directory and checks
//! what it prints and what it persists between invocations.

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

const OWNER: &str = "0x0101010101010101010101010101010101010101";
const PAIR: &str = "0x3333333333333333333333333333333333333333";
const ALICE: &str = "0x1111111111111111111111111111111111111111";
const BOB: &str = "0x2222222222222222222222222222222222222222";
const LAUNCH: u64 = 1_700_000_000;

fn levy(dir: &Path, at: u64, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_levy"))
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--at")
        .arg(at.to_string())
        .args(args)
        .output()
        .expect("failed to run levy")
}

fn ok(dir: &Path, at: u64, args: &[&str]) -> String {
    let output = levy(dir, at, args);
    assert!(
        output.status.success(),
        "levy {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(dir: &Path, at: u64, args: &[&str]) -> Value {
    let mut args = args.to_vec();
    args.push("--json");
    serde_json::from_str(&ok(dir, at, &args)).expect("invalid JSON output")
}

fn launched() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();
    ok(path, LAUNCH, &["init"]);
    ok(path, LAUNCH, &["set-pair", PAIR]);
    ok(path, LAUNCH, &["enable-trading"]);
    ok(path, LAUNCH, &["transfer", ALICE, "1000"]);
    dir
}

#[test]
fn test_init_and_info() {
    let dir = tempfile::tempdir().unwrap();
    ok(dir.path(), LAUNCH, &["init"]);

    let info = json(dir.path(), LAUNCH, &["info"]);
    assert_eq!(info["symbol"], "LEVY");
    assert_eq!(info["total_supply"], "1000000000");
    assert_eq!(info["owner"], OWNER);

    // Refuses to clobber existing state
    assert!(!levy(dir.path(), LAUNCH, &["init"]).status.success());
    ok(dir.path(), LAUNCH, &["init", "--force"]);
}

#[test]
fn test_queries_require_init() {
    let dir = tempfile::tempdir().unwrap();
    let output = levy(dir.path(), LAUNCH, &["tax-info"]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_config_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("levy.toml");
    std::fs::write(&config, "[pool]\nadd_liquidity_fee = 900\n").unwrap();

    let output = levy(dir.path(), LAUNCH, &["--config", config.to_str().unwrap(), "init"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"), "stderr: {}", stderr);
    assert!(stderr.contains("Invalid configuration"), "stderr: {}", stderr);
    assert!(!dir.path().join("data").exists());
}

#[test]
fn test_sell_is_taxed() {
    let dir = launched();
    let path = dir.path();

    ok(path, LAUNCH + 100, &["--caller", ALICE, "transfer", PAIR, "100"]);

    let pair = json(path, LAUNCH + 100, &["account", PAIR]);
    assert_eq!(pair["balance"], "95");

    let alice = json(path, LAUNCH + 100, &["account", ALICE]);
    assert_eq!(alice["balance"], "900");
    assert_eq!(alice["tx_count_in_window"], 1);

    let taxes = json(path, LAUNCH + 100, &["tax-info"]);
    assert_eq!(taxes["pending"]["liquidity"], "2");
    assert_eq!(taxes["pending"]["marketing"], "2");
    assert_eq!(taxes["pending"]["burn"], "1");
}

#[test]
fn test_rejected_call_leaves_state() {
    let dir = launched();
    let path = dir.path();

    let output = levy(path, LAUNCH + 100, &["--caller", ALICE, "update-blacklist", BOB]);
    assert!(!output.status.success());

    // Cooldown rejection does not record activity either
    ok(path, LAUNCH + 100, &["--caller", ALICE, "transfer", BOB, "10"]);
    assert!(!levy(path, LAUNCH + 110, &["--caller", ALICE, "transfer", BOB, "10"])
        .status
        .success());

    let bob = json(path, LAUNCH + 110, &["account", BOB]);
    assert_eq!(bob["balance"], "10");
    assert_eq!(bob["blacklisted"], false);

    let history = json(path, LAUNCH + 110, &["history"]);
    assert_eq!(history.as_array().unwrap().len(), 4);
}

#[test]
fn test_history_for_account() {
    let dir = launched();
    let path = dir.path();
    ok(path, LAUNCH + 100, &["--caller", ALICE, "transfer", BOB, "1"]);

    let history = json(path, LAUNCH + 100, &["history", "--account", BOB]);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["operation"], "transfer");
    assert_eq!(entries[0]["receipt"]["from"], ALICE);
}

#[test]
fn test_pool_commands() {
    let dir = launched();
    let path = dir.path();

    ok(path, LAUNCH + 100, &["--caller", ALICE, "pool", "deposit", "400"]);

    let stats = json(path, LAUNCH + 100, &["pool", "stats"]);
    assert_eq!(stats["total_providers"], 1);
    assert_eq!(stats["total_deposited"], "400");
    assert_eq!(stats["reward_rate"], 12);

    let provider = json(path, LAUNCH + 100, &["pool", "provider", ALICE]);
    assert_eq!(provider["deposited"], "400");
    assert_eq!(provider["state"], "Active");

    // Fee ceilings are enforced
    assert!(!levy(path, LAUNCH + 100, &["pool", "update-fees", "--add", "600", "--remove", "2000"])
        .status
        .success());
    ok(path, LAUNCH + 100, &["pool", "update-fees", "--add", "100", "--remove", "200"]);

    ok(path, LAUNCH + 200, &["--caller", ALICE, "pool", "withdraw", "400"]);
    let alice = json(path, LAUNCH + 200, &["account", ALICE]);
    assert_eq!(alice["balance"], "992");
}
