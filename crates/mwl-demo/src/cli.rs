use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use mwl_core::geometry::Rect;
use mwl_layout::{Composer, LayoutConfig};
use tracing_subscriber::EnvFilter;

use crate::error::{DemoError, Result};
use crate::layout::{
    LayoutFile, apply_saved_sizes, hide_nodes, read_saved_sizes, saved_sizes, write_saved_sizes,
};
use crate::miewer::miewer_file;
use crate::report::ArrangeReport;
use crate::script::{DragScript, replay};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "MWL_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "mwl",
    about = "Arrange Miewer panel layouts and replay divider drags",
    version
)]
pub struct Cli {
    /// Log filter directive, e.g. `mwl.resize=trace`. Overrides MWL_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Arrange a layout in a viewport and print rectangles and templates.
    Arrange(ArrangeArgs),

    /// Validate a layout file and its engine configuration.
    Check(CheckArgs),

    /// Print the built-in Miewer layout as JSON.
    #[command(name = "print-layout")]
    PrintLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct ArrangeArgs {
    /// Layout file (TOML, or JSON by extension). Defaults to the built-in
    /// Miewer layout.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Engine configuration file replacing the layout's `[config]` table.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "1280x800", value_parser = parse_viewport)]
    pub viewport: Rect,

    /// Drag a divider, in order: `CONTAINER:SLOT:DELTA`.
    #[arg(long = "drag", value_name = "CONTAINER:SLOT:DELTA")]
    pub drags: Vec<DragScript>,

    /// Remove the node with this key before arranging.
    #[arg(long = "hide", value_name = "KEY")]
    pub hide: Vec<String>,

    /// Committed sizes to replay, as written by `--save-sizes`.
    #[arg(long)]
    pub sizes: Option<PathBuf>,

    /// Write the committed sizes of every split container after the drags.
    #[arg(long = "save-sizes")]
    pub save_sizes: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Layout file to check. Defaults to the built-in Miewer layout.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Engine configuration file replacing the layout's `[config]` table.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Arrange(args) => {
            let format = args.format;
            let report = arrange(&args)?;
            match format {
                OutputFormat::Text => print!("{}", report.render_text()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(())
        }
        Commands::Check(args) => {
            let problems = check(&args)?;
            if problems.is_empty() {
                println!("ok");
                return Ok(());
            }
            for problem in &problems {
                println!("{problem}");
            }
            Err(DemoError::exit(
                3,
                format!("{} problem(s) found", problems.len()),
            ))
        }
        Commands::PrintLayout => {
            println!("{}", serde_json::to_string_pretty(&miewer_file())?);
            Ok(())
        }
    }
}

/// Install the stderr log subscriber. `directive` wins over `MWL_LOG`.
pub fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|error| DemoError::invalid(format!("log filter {directive:?}: {error}")))?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| DemoError::exit(1, format!("failed to install logger: {error}")))
}

fn parse_viewport(s: &str) -> std::result::Result<Rect, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width {width:?}"))?;
    let height = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height {height:?}"))?;
    Ok(Rect::from_size(width, height))
}

fn load(layout: Option<&Path>, config: Option<&Path>) -> Result<LayoutFile> {
    let mut file = match layout {
        Some(path) => LayoutFile::from_path(path)?,
        None => miewer_file(),
    };
    if let Some(path) = config {
        if !path.exists() {
            return Err(DemoError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        file.config = LayoutConfig::from_file(path)?;
    }
    Ok(file)
}

/// Arrange, replay drags, and collect the report.
pub fn arrange(args: &ArrangeArgs) -> Result<ArrangeReport> {
    let file = load(args.layout.as_deref(), args.config.as_deref())?;
    let problems = file.config.validate();
    if !problems.is_empty() {
        return Err(DemoError::exit(
            3,
            format!("invalid layout config: {}", problems.join("; ")),
        ));
    }

    let (mut root, unmatched) = hide_nodes(&file.root, &args.hide);
    for key in &unmatched {
        tracing::warn!(target: "mwl.demo", key = %key, "no node to hide");
    }
    if let Some(path) = &args.sizes {
        let applied = apply_saved_sizes(&mut root, &read_saved_sizes(path)?);
        tracing::debug!(target: "mwl.demo", applied, "saved sizes replayed");
    }

    let mut composer = Composer::new(file.config);
    let mut arrangement = composer.arrange(&root, args.viewport);
    let mut drags = Vec::with_capacity(args.drags.len());
    for script in &args.drags {
        drags.push(replay(&mut composer, &arrangement, script)?);
        arrangement = composer.arrange(&root, args.viewport);
    }

    if let Some(path) = &args.save_sizes {
        write_saved_sizes(path, &saved_sizes(&composer, &root))?;
    }
    Ok(ArrangeReport::collect(
        &composer,
        &root,
        args.viewport,
        arrangement,
        drags,
    ))
}

/// Problems found in the layout; empty when it is usable.
pub fn check(args: &CheckArgs) -> Result<Vec<String>> {
    Ok(load(args.layout.as_deref(), args.config.as_deref())?.problems())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn arrange_args(argv: &[&str]) -> ArrangeArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).expect("parse");
        match cli.command {
            Commands::Arrange(args) => args,
            other => panic!("expected arrange, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn arrange_defaults() {
        let args = arrange_args(&["mwl", "arrange"]);
        assert_eq!(args.viewport, Rect::from_size(1280, 800));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.layout.is_none());
        assert!(args.drags.is_empty());
    }

    #[test]
    fn arrange_collects_repeated_flags() {
        let args = arrange_args(&[
            "mwl",
            "arrange",
            "--viewport",
            "1024x768",
            "--drag",
            "body:0:-50",
            "--drag",
            "main:2:+30",
            "--hide",
            "sequences",
            "--format",
            "json",
        ]);
        assert_eq!(args.viewport, Rect::from_size(1024, 768));
        assert_eq!(args.drags.len(), 2);
        assert_eq!(args.drags[1].delta, 30);
        assert_eq!(args.hide, vec!["sequences".to_owned()]);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn global_log_flag_parses_after_subcommand() {
        let cli = Cli::try_parse_from(["mwl", "check", "--log", "mwl.resize=trace"]).expect("parse");
        assert_eq!(cli.log.as_deref(), Some("mwl.resize=trace"));
    }

    #[test]
    fn bad_viewport_is_rejected() {
        assert!(Cli::try_parse_from(["mwl", "arrange", "--viewport", "wide"]).is_err());
        assert!(parse_viewport("10x").is_err());
        assert_eq!(parse_viewport("640X480"), Ok(Rect::from_size(640, 480)));
    }

    #[test]
    fn hiding_the_side_panel_gives_main_the_width() {
        let args = arrange_args(&["mwl", "arrange", "--hide", "right"]);
        let report = arrange(&args).expect("arrange");
        let main = report.regions.iter().find(|r| r.key == "main").expect("main");
        assert_eq!(main.rect, Rect::new(0, 48, 1280, 752));
        assert!(report.dividers.iter().all(|d| d.container != "body"));
    }

    #[test]
    fn builtin_layout_checks_clean() {
        let args = CheckArgs {
            layout: None,
            config: None,
        };
        assert!(check(&args).expect("check").is_empty());
    }
}
