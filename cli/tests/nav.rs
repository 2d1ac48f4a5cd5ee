use std::path::Path;

use anyhow::Result;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;
use tempfile::TempDir;

const CATALOG: &str = r#"
[[sections]]
title = "Home"
route = "/"

[[sections]]
title = "Card 2"

[[sections.subsections]]
title = "Chat Bot"
route = "/docsearch"
persona = "Strategist"

[[sections]]
title = "Admin"

[[sections.subsections]]
title = "Database Management"
route = "/raganalytics"
"#;

fn ragdesk_command(workdir: &Path) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("ragdesk")?;
    cmd.current_dir(workdir).env("RUST_LOG", "warn");
    Ok(cmd)
}

fn write_catalog(dir: &TempDir) -> Result<String> {
    let path = dir.path().join("catalog.toml");
    std::fs::write(&path, CATALOG)?;
    Ok(path.display().to_string())
}

#[test]
fn guest_only_sees_ordinary_sections() -> Result<()> {
    let dir = TempDir::new()?;
    let catalog = write_catalog(&dir)?;

    let mut cmd = ragdesk_command(dir.path())?;
    cmd.args(["nav", "show", "--role", "Guest", "--catalog", &catalog])
        .assert()
        .success()
        .stdout(contains("Card 2").and(contains("Chat Bot")))
        .stdout(contains("Database Management").not());

    Ok(())
}

#[test]
fn document_owner_json_lists_visible_sections() -> Result<()> {
    let dir = TempDir::new()?;
    let catalog = write_catalog(&dir)?;

    let mut cmd = ragdesk_command(dir.path())?;
    let output = cmd
        .args([
            "nav",
            "show",
            "--role",
            "Document Owner",
            "--catalog",
            &catalog,
            "--json",
        ])
        .output()?;
    assert!(output.status.success());

    let sections: JsonValue = serde_json::from_slice(&output.stdout)?;
    let titles: Vec<&str> = sections
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|section| section["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Card 2"]);

    Ok(())
}

#[test]
fn select_prints_the_target() -> Result<()> {
    let dir = TempDir::new()?;
    let catalog = write_catalog(&dir)?;

    let mut cmd = ragdesk_command(dir.path())?;
    cmd.args(["nav", "select", "--catalog", &catalog, "1", "0"])
        .assert()
        .success()
        .stdout(contains("route: /raganalytics"));

    Ok(())
}

#[test]
fn select_out_of_range_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let catalog = write_catalog(&dir)?;

    let mut cmd = ragdesk_command(dir.path())?;
    cmd.args(["nav", "select", "--role", "Guest", "--catalog", &catalog, "1", "0"])
        .assert()
        .failure()
        .stderr(contains("section index 1 out of bounds (len 1)"));

    Ok(())
}

#[test]
fn builtin_cards_open_and_choose_task() -> Result<()> {
    let dir = TempDir::new()?;

    let mut cmd = ragdesk_command(dir.path())?;
    cmd.args(["nav", "cards", "--open", "1", "--task", "0"])
        .assert()
        .success()
        .stdout(contains("Chat Bot").and(contains("route: /docsearch")));

    let mut inactive = ragdesk_command(dir.path())?;
    inactive
        .args(["nav", "cards", "--open", "1", "--task", "1"])
        .assert()
        .failure()
        .stderr(contains("is not active"));

    Ok(())
}

#[test]
fn catalog_path_comes_from_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    write_catalog(&dir)?;
    std::fs::write(dir.path().join("ragdesk.toml"), "catalog = \"catalog.toml\"\n")?;

    let mut cmd = ragdesk_command(dir.path())?;
    cmd.args(["nav", "show"])
        .assert()
        .success()
        .stdout(contains("Database Management"))
        .stdout(contains("Upload Documents").not());

    Ok(())
}
