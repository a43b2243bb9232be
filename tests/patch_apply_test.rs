//! End-to-end coverage of the patch pipelines on real files.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;

use nodectl::apply;
use nodectl::errors::PatchError;
use nodectl::output::OutputDestination;
use nodectl::{ConfigTarget, DocumentFormat};

#[ctor::ctor]
fn init() {
    nodectl::util::testing::init_test_setup();
}

/// Build a node home with the standard config files.
fn node_home() -> TempDir {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config");
    fs::create_dir(&config_dir).unwrap();

    fs::write(
        config_dir.join("config.toml"),
        r#"moniker = "node1"
db-backend = "goleveldb"

[p2p]
laddr = "tcp://0.0.0.0:26656"
pex = true

[consensus]
timeout-commit = "5s"
"#,
    )
    .unwrap();

    fs::write(
        config_dir.join("app.toml"),
        r#"halt-height = 0
minimum-gas-prices = "0.02uatom"

[api]
enable = true
address = "tcp://0.0.0.0:1317"
"#,
    )
    .unwrap();

    fs::write(
        config_dir.join("client.toml"),
        "chain-id = \"local-1\"\nkeyring-backend = \"test\"\n",
    )
    .unwrap();

    fs::write(
        config_dir.join("genesis.json"),
        r#"{
  "chain_id": "local-1",
  "app_state": {
    "mint": { "inflation": "0.1" },
    "staking": { "params": { "max_validators": 100 } }
  }
}
"#,
    )
    .unwrap();

    home
}

fn config_path(home: &TempDir) -> PathBuf {
    home.path().join("config").join("config.toml")
}

#[test]
fn moniker_patch_in_place_with_auto_detection() {
    let home = node_home();

    let patched = apply::apply_config_patch(
        home.path(),
        None,
        "moniker = \"node2\"",
        &OutputDestination::InPlace,
    )
    .unwrap();
    assert_eq!(patched, config_path(&home));

    let text = fs::read_to_string(config_path(&home)).unwrap();
    assert!(text.contains("moniker = \"node2\""));
    // everything else untouched
    assert!(text.contains("db-backend = \"goleveldb\""));
    assert!(text.contains("laddr = \"tcp://0.0.0.0:26656\""));
    assert!(text.contains("timeout-commit = \"5s\""));
    assert!(!text.contains("node1"));
}

#[test]
fn in_place_rewrite_preserves_permissions() {
    let home = node_home();
    fs::set_permissions(config_path(&home), fs::Permissions::from_mode(0o640)).unwrap();

    apply::apply_config_patch(
        home.path(),
        None,
        "moniker = \"node2\"",
        &OutputDestination::InPlace,
    )
    .unwrap();

    let mode = fs::metadata(config_path(&home)).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
}

#[test]
fn explicit_target_writes_to_output_file() {
    let home = node_home();
    let out = home.path().join("patched-app.toml");

    apply::apply_config_patch(
        home.path(),
        Some(ConfigTarget::App),
        "halt-height = 100",
        &OutputDestination::File(out.clone()),
    )
    .unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("halt-height = 100"));
    assert!(text.contains("minimum-gas-prices = \"0.02uatom\""));
    let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);

    // the original is untouched
    let original = fs::read_to_string(home.path().join("config").join("app.toml")).unwrap();
    assert!(original.contains("halt-height = 0"));
}

#[test]
fn nested_section_patch_merges_into_existing_section() {
    let home = node_home();

    apply::apply_config_patch(
        home.path(),
        None,
        "[p2p]\npex = false",
        &OutputDestination::InPlace,
    )
    .unwrap();

    let text = fs::read_to_string(config_path(&home)).unwrap();
    assert!(text.contains("pex = false"));
    assert!(text.contains("laddr = \"tcp://0.0.0.0:26656\""));
}

#[test]
fn ambiguous_patch_is_rejected() {
    let home = node_home();

    let err = apply::apply_config_patch(
        home.path(),
        None,
        "moniker = \"node2\"\nchain-id = \"other\"",
        &OutputDestination::InPlace,
    )
    .unwrap_err();
    assert!(matches!(err, PatchError::AmbiguousTarget { .. }));

    // nothing was written
    let text = fs::read_to_string(config_path(&home)).unwrap();
    assert!(text.contains("moniker = \"node1\""));
}

#[test]
fn missing_config_file_surfaces_io_error() {
    let home = TempDir::new().unwrap();

    let err = apply::apply_config_patch(
        home.path(),
        Some(ConfigTarget::Config),
        "moniker = \"node2\"",
        &OutputDestination::InPlace,
    )
    .unwrap_err();
    assert!(matches!(err, PatchError::Io { .. }));
}

#[test]
fn genesis_null_patch_deletes_key() {
    let home = node_home();

    let patched = apply::apply_genesis_patch(
        home.path(),
        r#"{"app_state": {"mint": null}}"#,
        &OutputDestination::InPlace,
    )
    .unwrap();
    assert_eq!(patched, home.path().join("config").join("genesis.json"));

    let text = fs::read_to_string(home.path().join("config").join("genesis.json")).unwrap();
    let tree: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(tree["app_state"].get("mint").is_none());
    assert_eq!(tree["app_state"]["staking"]["params"]["max_validators"], 100);
    assert_eq!(tree["chain_id"], "local-1");
}

#[test]
fn file_patch_selects_codec_by_extension() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("state.json");
    fs::write(&target, r#"{"height": 10, "peers": ["a", "b"]}"#).unwrap();

    apply::apply_file_patch(
        &target,
        r#"{"peers": ["c"]}"#,
        &OutputDestination::InPlace,
    )
    .unwrap();

    let tree: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(tree["height"], 10);
    assert_eq!(tree["peers"], serde_json::json!(["c"]));
}

#[test]
fn file_patch_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("config.yaml");
    fs::write(&target, "a: 1\n").unwrap();

    let err = apply::apply_file_patch(&target, "a = 2", &OutputDestination::InPlace).unwrap_err();
    assert!(matches!(err, PatchError::UnsupportedExtension(ext) if ext == ".yaml"));
}

#[test]
fn sequences_replace_wholesale_through_the_toml_codec() {
    let patched = apply::patch_document_text(
        "ports = [26656, 26657, 26658]\n",
        "ports = [9000]\n",
        DocumentFormat::Toml,
    )
    .unwrap();
    assert!(patched.contains("ports = [9000]"));
    assert!(!patched.contains("26656"));
}

#[test]
fn read_patch_source_trims_whitespace() {
    let dir = TempDir::new().unwrap();
    let patch = dir.path().join("patch.toml");
    fs::write(&patch, "\n  moniker = \"node2\"\n\n").unwrap();

    let text = apply::read_patch_source(Some(&patch)).unwrap();
    assert_eq!(text, "moniker = \"node2\"");
}

#[test]
fn whitespace_only_patch_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let patch = dir.path().join("patch.toml");
    fs::write(&patch, "  \n\t\n").unwrap();

    let text = apply::read_patch_source(Some(&patch)).unwrap();
    assert!(text.is_empty());
}

#[test]
fn malformed_patch_surfaces_decode_error() {
    let home = node_home();

    let err = apply::apply_config_patch(
        home.path(),
        Some(ConfigTarget::Config),
        "moniker = ",
        &OutputDestination::InPlace,
    )
    .unwrap_err();
    assert!(matches!(err, PatchError::TomlDecode { .. }));
}
