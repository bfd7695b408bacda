#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Base command: explicit root, and HOME pointed at an (uncreated) subdir
/// so the host's user-level specialist overlay cannot leak in.
fn conductor(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("conductor").unwrap();
    cmd.current_dir(dir.path())
        .env("CONDUCTOR_ROOT", dir.path())
        .env("HOME", dir.path().join("_home"));
    cmd
}

fn init_project(dir: &TempDir) {
    conductor(dir).arg("init").assert().success();
}

fn write_config(dir: &TempDir, content: &str) {
    std::fs::write(dir.path().join(".conductor/config.yaml"), content).unwrap();
}

// ---------------------------------------------------------------------------
// conductor init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_scaffolding() {
    let dir = TempDir::new().unwrap();
    conductor(&dir).arg("init").assert().success();

    assert!(dir.path().join(".conductor").is_dir());
    assert!(dir.path().join(".conductor/config.yaml").exists());
    assert!(dir.path().join(".conductor/patterns/general.md").exists());
    for file in [
        "orchestration/generalist.yaml",
        "technical/frontend-engineer.yaml",
        "technical/backend-engineer.yaml",
        "domain/security-auditor.yaml",
        "cognitive/system-architect.yaml",
    ] {
        assert!(
            dir.path().join(".conductor/specialists").join(file).exists(),
            "missing starter specialist {file}"
        );
    }
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    conductor(&dir).arg("init").assert().success();
    conductor(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .conductor/config.yaml"));
}

#[test]
fn init_preserves_edited_specialists() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let path = dir
        .path()
        .join(".conductor/specialists/orchestration/generalist.yaml");
    std::fs::write(&path, "id: generalist\ntags: [general, coding, edited]\n").unwrap();

    conductor(&dir).arg("init").assert().success();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("edited"));
}

// ---------------------------------------------------------------------------
// conductor classify
// ---------------------------------------------------------------------------

#[test]
fn classify_reports_full_intent_as_json() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let assert = conductor(&dir)
        .args(["classify", "Build a React dashboard with authentication", "--json"])
        .assert()
        .success();
    let intent: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(intent["category"], "build");
    assert_eq!(intent["complexity"], "multi_agent");
    assert_eq!(intent["domains"][0], "frontend");
    assert_eq!(intent["domains"][1], "security");
}

#[test]
fn classify_prints_readable_text() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["classify", "fix the bug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("category:   debug"))
        .stdout(predicate::str::contains("complexity: focused"));
}

#[test]
fn classify_without_init_fails() {
    let dir = TempDir::new().unwrap();
    conductor(&dir)
        .args(["classify", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// conductor route
// ---------------------------------------------------------------------------

#[test]
fn route_prints_plan_and_command() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["route", "Fix the login bug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("specialists: system-architect"))
        .stdout(predicate::str::contains("tool:        single_agent"))
        .stdout(predicate::str::contains("--specialists system-architect"))
        .stdout(predicate::str::contains("claude --print"));
}

#[test]
fn route_multi_domain_request_goes_to_swarm() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let assert = conductor(&dir)
        .args(["route", "Build a React dashboard with authentication", "--json"])
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(value["plan"]["tool"], "swarm");
    assert_eq!(value["command"]["program"], "claude-flow");

    // coding → generalist, frontend → frontend-engineer, security →
    // security-auditor, plus frontend-engineer's partner one level deep.
    let specialists: Vec<&str> = value["plan"]["specialists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        specialists,
        vec![
            "generalist",
            "frontend-engineer",
            "security-auditor",
            "backend-engineer"
        ]
    );
    assert_eq!(value["plan"]["args"]["agents"], "4");
    assert_eq!(value["plan"]["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn route_tool_override_forces_swarm() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let assert = conductor(&dir)
        .args(["route", "tweak wording please", "--tool", "swarm", "--json"])
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(value["plan"]["specialists"][0], "generalist");
    assert_eq!(value["plan"]["tool"], "swarm");
    assert_eq!(value["plan"]["args"]["agents"], "1");
}

#[test]
fn route_rejects_unknown_tool() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["route", "anything", "--tool", "quantum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tool"));
}

#[test]
fn route_exec_propagates_success() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write_config(
        &dir,
        "version: 1\nproject:\n  name: demo\nfallback_specialist: generalist\ntools:\n  single_agent:\n    program: echo\n",
    );

    conductor(&dir)
        .args(["route", "hello world", "--exec"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn route_exec_propagates_failure_code() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write_config(
        &dir,
        "version: 1\nproject:\n  name: demo\nfallback_specialist: generalist\ntools:\n  single_agent:\n    program: false\n",
    );

    conductor(&dir)
        .args(["route", "anything", "--exec"])
        .assert()
        .failure()
        .code(1);
}

// ---------------------------------------------------------------------------
// conductor resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_prints_section_fragment() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["resolve", "@patterns/general.md#working-agreements"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep changes small"))
        .stdout(predicate::str::contains("Component Structure").not());
}

#[test]
fn resolve_missing_reference_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["resolve", "@missing/doc.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reference not found"));
}

// ---------------------------------------------------------------------------
// conductor specialist
// ---------------------------------------------------------------------------

#[test]
fn specialist_list_shows_table() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["specialist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("frontend-engineer"))
        .stdout(predicate::str::contains("backend, api"));
}

#[test]
fn specialist_show_prints_definition() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["specialist", "show", "backend-engineer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id: backend-engineer"))
        .stdout(predicate::str::contains("devops-engineer"));
}

#[test]
fn specialist_show_unknown_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["specialist", "show", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("specialist not found"));
}

#[test]
fn user_overlay_adds_but_never_shadows() {
    let dir = TempDir::new().unwrap();
    let user_specialists = dir.path().join("_home/.conductor/specialists");
    std::fs::create_dir_all(&user_specialists).unwrap();
    std::fs::write(
        user_specialists.join("docs-writer.yaml"),
        "id: docs-writer\ntags: [docs]\n",
    )
    .unwrap();
    std::fs::write(
        user_specialists.join("generalist.yaml"),
        "id: generalist\ntags: [shadowed]\n",
    )
    .unwrap();
    init_project(&dir);

    let assert = conductor(&dir)
        .args(["specialist", "list", "--json"])
        .assert()
        .success();
    let defs: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let ids: Vec<&str> = defs
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();

    assert!(ids.contains(&"docs-writer"));
    let generalist = defs
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"] == "generalist")
        .unwrap();
    assert_eq!(generalist["tags"][0], "general");
}

// ---------------------------------------------------------------------------
// conductor config validate
// ---------------------------------------------------------------------------

#[test]
fn config_validate_passes_after_init() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    conductor(&dir)
        .args(["config", "validate"])
        .assert()
        .success();
}

#[test]
fn config_validate_fails_on_undefined_fallback() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write_config(
        &dir,
        "version: 1\nproject:\n  name: demo\nfallback_specialist: missing-person\n",
    );

    conductor(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing-person"))
        .stderr(predicate::str::contains("config validation found errors"));
}
