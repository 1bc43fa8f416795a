#![forbid(unsafe_code)]

//! `mwl`: command-line driver for the Miewer layout engine.
//!
//! Loads a layout description, arranges it in a viewport through
//! [`mwl_layout::Composer`], replays scripted divider drags through the
//! pointer protocol, and prints rectangles, grid templates and committed
//! sizes.

pub mod cli;
pub mod error;
pub mod layout;
pub mod miewer;
pub mod report;
pub mod script;

pub use cli::run_from_env;
pub use error::{DemoError, Result};
