//! Raypath CLI - inspect recorded light paths from the command line.

use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use raypath::prelude::*;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("RAYPATH_BUILD_DATE"), ")");

#[derive(Parser, Debug)]
#[command(name = "raypath", version = VERSION, about = "Inspect light paths recorded by a path tracer")]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the paths recorded for a pixel.
    #[command(alias = "p")]
    Paths(PixelArgs),
    /// Print one node of the node table.
    #[command(alias = "n")]
    Node(NodeArgs),
    /// Rebuild one path as line segments.
    #[command(alias = "s")]
    Segments(SegmentArgs),
    /// Check that the database has the expected table layout.
    #[command(alias = "c")]
    Check(DbArgs),
    /// Open the interactive viewer.
    #[command(alias = "v")]
    View(ViewArgs),
}

#[derive(Args, Debug)]
struct DbArgs {
    /// Ray database (falls back to $RAYPATH_DB).
    #[arg(env = "RAYPATH_DB")]
    db: PathBuf,
}

#[derive(Args, Debug)]
struct PixelArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Pixel row.
    row: i32,
    /// Pixel column.
    col: i32,
}

#[derive(Args, Debug)]
struct NodeArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Node id.
    id: i64,
}

#[derive(Args, Debug)]
struct SegmentArgs {
    #[command(flatten)]
    pixel: PixelArgs,
    /// Index of the path within the pixel.
    path: usize,
    /// Keep tracer units instead of applying the display scale.
    #[arg(long)]
    raw: bool,
    /// Print JSON instead of a table.
    #[arg(short, long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Database to open on start.
    #[arg(env = "RAYPATH_DB")]
    db: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The viewer installs its own subscriber
    if !matches!(cli.cmd, Command::View(_)) {
        init_logging(cli.verbose, cli.quiet);
    }

    match cli.cmd {
        Command::Paths(args) => cmd_paths(args),
        Command::Node(args) => cmd_node(args),
        Command::Segments(args) => cmd_segments(args),
        Command::Check(args) => cmd_check(args),
        Command::View(args) => cmd_view(args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(args: &DbArgs, verify_schema: bool) -> anyhow::Result<Inspector> {
    let config = InspectorConfig { verify_schema, ..InspectorConfig::default() };
    Inspector::open(&args.db, config).with_context(|| format!("failed to open {}", args.db.display()))
}

fn cmd_paths(args: PixelArgs) -> anyhow::Result<()> {
    let inspector = open(&args.db, true)?;
    let paths = inspector.paths().select_paths(args.row, args.col)?;

    println!("Pixel ({}, {}): {} path(s)", args.row, args.col, paths.len());
    for (i, path) in paths.iter().enumerate() {
        let marker = if path.is_consistent() { "" } else { "  [count mismatch]" };
        println!("  [{i}] {} nodes: {:?}{}", path.node_count(), path.path_node_ids, marker);
    }

    inspector.close()?;
    Ok(())
}

fn cmd_node(args: NodeArgs) -> anyhow::Result<()> {
    let inspector = open(&args.db, true)?;
    let Some(node) = inspector.nodes().get_node(args.id)? else {
        bail!("node {} not found", args.id);
    };

    println!("{}", node.detail());
    inspector.close()?;
    Ok(())
}

fn cmd_segments(args: SegmentArgs) -> anyhow::Result<()> {
    let pixel = &args.pixel;
    let inspector = open(&pixel.db, true)?;

    let mut selection = SelectionController::new();
    selection.set_pixel(&inspector, pixel.row, pixel.col)?;
    if selection.choose_path(&inspector, args.path)? == Transition::Ignored {
        bail!(
            "path index {} out of range, pixel ({}, {}) has {} path(s)",
            args.path,
            pixel.row,
            pixel.col,
            selection.path_count()
        );
    }

    let Some(geometry) = selection.geometry() else {
        bail!("no geometry for path {}", args.path);
    };
    let segments = if args.raw {
        geometry.segments.clone()
    } else {
        inspector.display_transform().apply_all(&geometry.segments)
    };

    if args.json {
        let out = serde_json::json!({
            "row": pixel.row,
            "col": pixel.col,
            "path": args.path,
            "node_ids": selection.chosen_path().map(|p| p.path_node_ids.clone()).unwrap_or_default(),
            "skipped": geometry.skipped,
            "segments": segments
                .iter()
                .map(|s| [s.start.to_array(), s.end.to_array()])
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "Path {} of pixel ({}, {}): {} segment(s){}",
            args.path,
            pixel.row,
            pixel.col,
            segments.len(),
            if args.raw { "" } else { " (display scale)" }
        );
        for (i, s) in segments.iter().enumerate() {
            println!(
                "  [{i:>3}] ({:>10.4} {:>10.4} {:>10.4}) -> ({:>10.4} {:>10.4} {:>10.4})",
                s.start.x, s.start.y, s.start.z, s.end.x, s.end.y, s.end.z
            );
        }
        if !geometry.skipped.is_empty() {
            println!("Missing nodes: {:?}", geometry.skipped);
        }
    }

    inspector.close()?;
    Ok(())
}

fn cmd_check(args: DbArgs) -> anyhow::Result<()> {
    let inspector = open(&args, false)?;
    let store = inspector.executor();

    for table in ["node", "path"] {
        let columns = store.table_columns(table)?;
        println!("{:<5} {} column(s)", table, columns.len());
    }

    match store.verify_schema() {
        Ok(()) => println!("OK"),
        Err(e) => bail!("{}: {}", args.db.display(), e),
    }

    inspector.close()?;
    Ok(())
}

#[cfg(feature = "viewer")]
fn cmd_view(args: ViewArgs) -> anyhow::Result<()> {
    raypath::viewer::run(args.db)
}

#[cfg(not(feature = "viewer"))]
fn cmd_view(_args: ViewArgs) -> anyhow::Result<()> {
    bail!("viewer not available, rebuild with: cargo build --features viewer")
}
