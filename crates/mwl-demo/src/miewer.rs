//! The built-in Miewer panel arrangement.
//!
//! ```text
//! miewer (vertical)
//! ├── header                 auto
//! └── body (horizontal split, fill)
//!     ├── main (vertical split, fill)
//!     │   ├── sequences      auto       optional
//!     │   ├── viewer         spacer
//!     │   ├── selection-info auto
//!     │   └── terminal       20%, min 150  optional
//!     └── right              300px, min 300  optional
//! ```

use mwl_core::geometry::Axis;
use mwl_layout::{LayoutConfig, LayoutNode};

use crate::layout::LayoutFile;

pub const HEADER_HEIGHT: u32 = 48;
pub const SEQUENCES_HEIGHT: u32 = 96;
pub const SELECTION_INFO_HEIGHT: u32 = 28;

/// Panels the application can toggle off.
pub const OPTIONAL_PANELS: [&str; 3] = ["sequences", "terminal", "right"];

#[must_use]
pub fn miewer_layout() -> LayoutNode {
    LayoutNode::container(
        "miewer",
        Axis::Vertical,
        vec![
            LayoutNode::leaf("header")
                .with_size("auto")
                .with_content(0, HEADER_HEIGHT),
            LayoutNode::split(
                "body",
                Axis::Horizontal,
                vec![
                    LayoutNode::split(
                        "main",
                        Axis::Vertical,
                        vec![
                            LayoutNode::leaf("sequences")
                                .with_size("auto")
                                .with_content(0, SEQUENCES_HEIGHT),
                            LayoutNode::spacer("viewer"),
                            LayoutNode::leaf("selection-info")
                                .with_size("auto")
                                .with_content(0, SELECTION_INFO_HEIGHT),
                            LayoutNode::leaf("terminal")
                                .with_size("20%")
                                .with_min_size(150),
                        ],
                    )
                    .with_fill(),
                    LayoutNode::leaf("right").with_size(300u32).with_min_size(300),
                ],
            )
            .with_fill(),
        ],
    )
}

#[must_use]
pub fn miewer_file() -> LayoutFile {
    LayoutFile {
        config: LayoutConfig::default(),
        root: miewer_layout(),
    }
}
