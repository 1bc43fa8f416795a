//! Layout description files and tree edits applied before arranging.
//!
//! A layout file holds an optional `[config]` table and the `[root]` node:
//!
//! ```toml
//! [config]
//! divider_size = 6
//!
//! [root]
//! type = "container"
//! key = "root"
//! axis = "vertical"
//!
//! [[root.children]]
//! type = "leaf"
//! key = "header"
//! size = "auto"
//! content_height = 40
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as TOML.

use std::collections::BTreeMap;
use std::path::Path;

use mwl_layout::{CommittedSize, Composer, LayoutConfig, LayoutNode, Region, apply_overrides};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, Result};

/// Committed child sizes per split container, keyed by container key.
pub type SavedSizes = BTreeMap<String, Vec<CommittedSize>>;

/// A layout description with the engine configuration it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFile {
    #[serde(default)]
    pub config: LayoutConfig,
    pub root: LayoutNode,
}

impl LayoutFile {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DemoError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Problems that make the layout unusable, in tree order.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems: Vec<String> = self
            .config
            .validate()
            .into_iter()
            .map(|problem| format!("config: {problem}"))
            .collect();

        let mut seen = FxHashSet::default();
        let mut reported = FxHashSet::default();
        self.root.visit(&mut |node| {
            let Some(key) = node.key() else {
                return;
            };
            if !seen.insert(key) && reported.insert(key) {
                problems.push(format!("duplicate node key {key:?}"));
            }
        });

        self.root.visit(&mut |node| {
            if let LayoutNode::Container {
                key,
                split: true,
                children,
                ..
            } = node
            {
                if children.is_empty() {
                    problems.push(format!("split container {key:?} has no children"));
                }
            }
        });

        problems
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Copy of `node` without the descendants keyed in `hidden`.
///
/// The root itself is never removed. Returns the keys that matched nothing.
pub fn hide_nodes(node: &LayoutNode, hidden: &[String]) -> (LayoutNode, Vec<String>) {
    let mut matched = FxHashSet::default();
    let pruned = prune(node, hidden, &mut matched);
    let unmatched = hidden
        .iter()
        .filter(|key| !matched.contains(key.as_str()))
        .cloned()
        .collect();
    (pruned, unmatched)
}

fn prune<'a>(node: &LayoutNode, hidden: &'a [String], matched: &mut FxHashSet<&'a str>) -> LayoutNode {
    let mut node = node.clone();
    if let LayoutNode::Container { children, .. } = &mut node {
        let mut kept = Vec::with_capacity(children.len());
        for child in children.iter() {
            let hit = child
                .key()
                .and_then(|key| hidden.iter().find(|h| h.as_str() == key));
            match hit {
                Some(key) => {
                    matched.insert(key.as_str());
                }
                None => kept.push(prune(child, hidden, matched)),
            }
        }
        *children = kept;
    }
    node
}

/// Replay saved sizes onto the children of matching containers.
///
/// Returns the number of children whose size was overridden.
pub fn apply_saved_sizes(node: &mut LayoutNode, saved: &SavedSizes) -> usize {
    let LayoutNode::Container { key, children, .. } = node else {
        return 0;
    };
    let mut applied = 0;
    if let Some(committed) = saved.get(key.as_str()) {
        let mut regions: Vec<Region> = children.iter().map(LayoutNode::region).collect();
        applied += apply_overrides(&mut regions, committed);
        for (child, region) in children.iter_mut().zip(regions) {
            if let LayoutNode::Leaf { size, min_size, .. }
            | LayoutNode::Container { size, min_size, .. } = child
            {
                *size = region.size;
                *min_size = region.min_size;
            }
        }
    }
    for child in children.iter_mut() {
        applied += apply_saved_sizes(child, saved);
    }
    applied
}

/// Committed sizes of every split container in `root`.
#[must_use]
pub fn saved_sizes(composer: &Composer, root: &LayoutNode) -> SavedSizes {
    let mut saved = SavedSizes::new();
    root.visit(&mut |node| {
        if let LayoutNode::Container {
            key, split: true, ..
        } = node
        {
            if let Some(split) = composer.split(key) {
                saved.insert(key.clone(), split.committed_sizes());
            }
        }
    });
    saved
}

pub fn read_saved_sizes(path: &Path) -> Result<SavedSizes> {
    if !path.exists() {
        return Err(DemoError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

pub fn write_saved_sizes(path: &Path, saved: &SavedSizes) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(saved)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use mwl_core::geometry::{Axis, Rect};
    use mwl_layout::{DividerCallbacks, SizeToken};

    use super::*;

    fn two_pane() -> LayoutNode {
        LayoutNode::split(
            "row",
            Axis::Horizontal,
            vec![
                LayoutNode::leaf("left").with_fill(),
                LayoutNode::leaf("right").with_size(200u32).with_min_size(100),
            ],
        )
    }

    #[test]
    fn toml_layout_with_config_table() {
        let file = LayoutFile::from_toml_str(
            r#"
            [config]
            divider_size = 2

            [root]
            type = "container"
            key = "row"
            axis = "horizontal"
            split = true

            [[root.children]]
            type = "leaf"
            key = "left"
            fill = true

            [[root.children]]
            type = "leaf"
            key = "right"
            size = 200
            min_size = 100
            "#,
        )
        .expect("parse");
        assert_eq!(file.config.divider_size, 2);
        assert_eq!(file.root, two_pane());
    }

    #[test]
    fn config_table_is_optional() {
        let file = LayoutFile::from_json_str(
            r#"{"root": {"type": "leaf", "key": "only", "size": "50%"}}"#,
        )
        .expect("parse");
        assert_eq!(file.config, LayoutConfig::default());
        assert_eq!(file.root, LayoutNode::leaf("only").with_size("50%"));
    }

    #[test]
    fn problems_report_duplicates_and_bad_config() {
        let file = LayoutFile {
            config: LayoutConfig {
                divider_size: 0,
                ..LayoutConfig::default()
            },
            root: LayoutNode::container(
                "root",
                Axis::Vertical,
                vec![
                    LayoutNode::leaf("a"),
                    LayoutNode::leaf("a"),
                    LayoutNode::leaf("a"),
                    LayoutNode::split("empty", Axis::Horizontal, Vec::new()),
                ],
            ),
        };
        assert_eq!(
            file.problems(),
            vec![
                "config: divider_size must be > 0".to_owned(),
                "duplicate node key \"a\"".to_owned(),
                "split container \"empty\" has no children".to_owned(),
            ]
        );
    }

    #[test]
    fn hide_removes_descendants_and_reports_unknown_keys() {
        let (pruned, unknown) =
            hide_nodes(&two_pane(), &["right".to_owned(), "missing".to_owned()]);
        let LayoutNode::Container { children, .. } = &pruned else {
            panic!("root stays a container");
        };
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].key(), Some("left"));
        assert_eq!(unknown, vec!["missing".to_owned()]);
    }

    #[test]
    fn saved_sizes_replay_a_drag() {
        let root = two_pane();
        let viewport = Rect::from_size(1004, 300);
        let mut composer = Composer::default();
        composer.arrange(&root, viewport);
        let split = composer.split_mut("row").expect("row split");
        assert!(split.on_drag_start(0));
        split.on_drag(0, -100);
        split.on_drag_finish(0);
        let saved = saved_sizes(&composer, &root);
        assert_eq!(
            saved["row"].iter().map(|c| c.key.as_str()).collect::<Vec<_>>(),
            ["left", "right"]
        );

        let mut replayed = root.clone();
        assert_eq!(apply_saved_sizes(&mut replayed, &saved), 2);
        let arrangement = Composer::default().arrange(&replayed, viewport);
        assert_eq!(arrangement.rect("right"), Some(Rect::new(704, 0, 300, 300)));
        let LayoutNode::Container { children, .. } = &replayed else {
            panic!("root stays a container");
        };
        assert_eq!(
            children[1],
            LayoutNode::leaf("right").with_size(SizeToken::Fixed(300.0)).with_min_size(100)
        );
    }

    #[test]
    fn saved_sizes_round_trip_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sizes.json");
        let mut saved = SavedSizes::new();
        saved.insert(
            "row".to_owned(),
            vec![CommittedSize {
                key: "left".to_owned(),
                size: SizeToken::Flex(3.0),
                min_size: 5,
            }],
        );
        write_saved_sizes(&path, &saved).expect("write");
        assert_eq!(read_saved_sizes(&path).expect("read"), saved);
    }

    #[test]
    fn missing_files_are_reported_by_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.toml");
        let error = LayoutFile::from_path(&path).expect_err("missing");
        assert!(matches!(error, DemoError::MissingPath { .. }));
    }
}
