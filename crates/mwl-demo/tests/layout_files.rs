//! `mwl` commands against layout, config and size files on disk.

use std::fs;

use clap::Parser;
use mwl_core::geometry::Rect;
use mwl_demo::DemoError;
use mwl_demo::cli::{ArrangeArgs, CheckArgs, Cli, Commands, OutputFormat, arrange, check, run};
use mwl_demo::layout::read_saved_sizes;
use mwl_demo::script::DragScript;
use mwl_layout::SizeToken;
use tempfile::tempdir;

const SIDEBAR_JSON: &str = r#"{
    "root": {
        "type": "container", "key": "row", "axis": "horizontal", "split": true,
        "children": [
            {"type": "leaf", "key": "nav", "size": 200, "min_size": 120},
            {"type": "leaf", "key": "content", "fill": true}
        ]
    }
}"#;

fn arrange_args() -> ArrangeArgs {
    ArrangeArgs {
        layout: None,
        config: None,
        viewport: Rect::from_size(1000, 600),
        drags: Vec::new(),
        hide: Vec::new(),
        sizes: None,
        save_sizes: None,
        format: OutputFormat::Json,
    }
}

#[test]
fn json_layout_with_toml_config_override() {
    let dir = tempdir().expect("tempdir");
    let layout = dir.path().join("sidebar.json");
    let config = dir.path().join("config.toml");
    fs::write(&layout, SIDEBAR_JSON).expect("write layout");
    fs::write(&config, "divider_size = 10\n").expect("write config");

    let report = arrange(&ArrangeArgs {
        layout: Some(layout),
        config: Some(config),
        ..arrange_args()
    })
    .expect("arrange");
    assert_eq!(report.dividers.len(), 1);
    assert_eq!(report.dividers[0].rect, Rect::new(200, 0, 10, 600));
    let content = report.regions.iter().find(|r| r.key == "content").expect("content");
    assert_eq!(content.rect, Rect::new(210, 0, 790, 600));
}

#[test]
fn saved_sizes_survive_a_restart() {
    let dir = tempdir().expect("tempdir");
    let layout = dir.path().join("sidebar.json");
    let sizes = dir.path().join("sizes.json");
    fs::write(&layout, SIDEBAR_JSON).expect("write layout");

    let first = arrange(&ArrangeArgs {
        layout: Some(layout.clone()),
        drags: vec!["row:0:+100".parse::<DragScript>().expect("script")],
        save_sizes: Some(sizes.clone()),
        ..arrange_args()
    })
    .expect("arrange with drag");
    let nav = first.regions.iter().find(|r| r.key == "nav").expect("nav");
    assert_eq!(nav.rect.width, 300);

    let saved = read_saved_sizes(&sizes).expect("saved sizes");
    assert_eq!(saved["row"][0].size, SizeToken::Fixed(300.0));
    assert_eq!(saved["row"][0].min_size, 120);

    let second = arrange(&ArrangeArgs {
        layout: Some(layout),
        sizes: Some(sizes),
        ..arrange_args()
    })
    .expect("arrange with saved sizes");
    let nav = second.regions.iter().find(|r| r.key == "nav").expect("nav");
    assert_eq!(nav.rect, Rect::new(0, 0, 300, 600));
}

#[test]
fn drag_respects_minimum_of_the_shrinking_side() {
    let dir = tempdir().expect("tempdir");
    let layout = dir.path().join("sidebar.json");
    fs::write(&layout, SIDEBAR_JSON).expect("write layout");

    let report = arrange(&ArrangeArgs {
        layout: Some(layout),
        drags: vec!["row:0:-500".parse::<DragScript>().expect("script")],
        ..arrange_args()
    })
    .expect("arrange");
    let nav = report.regions.iter().find(|r| r.key == "nav").expect("nav");
    assert_eq!(nav.rect.width, 120);
}

#[test]
fn check_reports_problems_with_exit_code() {
    let dir = tempdir().expect("tempdir");
    let layout = dir.path().join("broken.toml");
    fs::write(
        &layout,
        r#"
        [config]
        divider_size = 0

        [root]
        type = "container"
        key = "root"

        [[root.children]]
        type = "leaf"
        key = "twin"

        [[root.children]]
        type = "leaf"
        key = "twin"
        "#,
    )
    .expect("write layout");

    let problems = check(&CheckArgs {
        layout: Some(layout.clone()),
        config: None,
    })
    .expect("check");
    assert_eq!(problems.len(), 2);

    let cli = Cli::try_parse_from(["mwl", "check", "--layout", layout.to_str().expect("utf-8 path")])
        .expect("parse");
    assert!(matches!(cli.command, Commands::Check(_)));
    let error = run(cli).expect_err("problems fail the command");
    assert_eq!(error.exit_code(), 3);
}

#[test]
fn invalid_config_fails_arrange() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"split_default_size": "150%"}"#).expect("write config");
    let error = arrange(&ArrangeArgs {
        config: Some(config),
        ..arrange_args()
    })
    .expect_err("invalid config");
    assert_eq!(error.exit_code(), 3);
}

#[test]
fn missing_layout_file() {
    let dir = tempdir().expect("tempdir");
    let error = arrange(&ArrangeArgs {
        layout: Some(dir.path().join("absent.toml")),
        ..arrange_args()
    })
    .expect_err("missing layout");
    assert!(matches!(error, DemoError::MissingPath { .. }));
    assert_eq!(error.exit_code(), 1);
}
