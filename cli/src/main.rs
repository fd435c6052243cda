use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use roomplan::doc::Document;
use roomplan::engine::EngineCore;
use roomplan::export::ImportError;
use roomplan::measure;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid snap distance {0}; expected a non-negative number")]
    InvalidSnapDistance(f64),
    #[error("no room with id {0:?} in the plan")]
    UnknownRoom(String),
}

#[derive(Parser, Debug)]
#[command(name = "roomplan", about = "Convert and inspect room floor plans")]
struct Cli {
    /// Position snap threshold stored in the plan settings.
    #[arg(long, env = "ROOMPLAN_SNAP_DISTANCE")]
    snap_distance: Option<f64>,

    /// Room to work on; defaults to the plan's active room.
    #[arg(long, global = true)]
    room: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a plan as a standalone SVG drawing.
    Svg(ConvertArgs),
    /// Convert a plan to the JSON plan file format.
    Json(ConvertArgs),
    /// Convert a plan to room markup.
    Markup(ConvertArgs),
    /// Print the nearest wall and neighbour distance for every item.
    Measure(InputArgs),
    /// List the preset library stored in a plan.
    Presets(InputArgs),
    /// List the rooms of a plan; the active one is marked with `*`.
    Rooms(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input file, or `-` for stdin.
    #[arg(default_value = "-")]
    input: String,

    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    source: InputArgs,

    /// Output file; stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// JSON when the input starts with `{`, markup otherwise.
    Auto,
    Markup,
    Json,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "roomplan=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Some(distance) = cli.snap_distance {
        if !distance.is_finite() || distance < 0.0 {
            return Err(CliError::InvalidSnapDistance(distance));
        }
    }

    let options = LoadOptions { snap_distance: cli.snap_distance, room: cli.room };
    match cli.command {
        Command::Svg(args) => {
            let core = load(&args.source, &options)?;
            write_output(args.output.as_deref(), &core.export_svg())
        }
        Command::Json(args) => {
            let core = load(&args.source, &options)?;
            write_output(args.output.as_deref(), &core.export_json()?)
        }
        Command::Markup(args) => {
            let core = load(&args.source, &options)?;
            write_output(args.output.as_deref(), &core.export_markup())
        }
        Command::Measure(args) => {
            let core = load(&args, &options)?;
            print_measurements(core.document());
            Ok(())
        }
        Command::Presets(args) => {
            let core = load(&args, &options)?;
            for category in &core.plan().library.categories {
                for preset in &category.presets {
                    println!(
                        "{}\t{}\t{}\t{} x {}\t{}",
                        category.label,
                        preset.id,
                        preset.kind.tag(),
                        preset.w,
                        preset.h,
                        preset.label
                    );
                }
            }
            Ok(())
        }
        Command::Rooms(args) => {
            let core = load(&args, &options)?;
            let doc = core.document();
            for (index, room) in doc.rooms().iter().enumerate() {
                let marker = if index == doc.active_index() { "*" } else { " " };
                println!("{marker} {}\t{}\t{} items", room.id, room.name, room.items.len());
            }
            Ok(())
        }
    }
}

struct LoadOptions {
    snap_distance: Option<f64>,
    room: Option<String>,
}

fn load(args: &InputArgs, options: &LoadOptions) -> Result<EngineCore, CliError> {
    let text = read_input(&args.input)?;
    let format = match args.format {
        Format::Auto if text.trim_start().starts_with('{') => Format::Json,
        Format::Auto => Format::Markup,
        other => other,
    };

    let mut core = EngineCore::new();
    let actions = match format {
        Format::Json => core.import_json(&text)?,
        Format::Markup | Format::Auto => core.apply_markup(&text),
    };
    debug!(?format, actions = actions.len(), "plan loaded");

    if let Some(id) = options.room.as_deref() {
        if core.document().active_room_id() != id && core.set_active_room(id).is_empty() {
            return Err(CliError::UnknownRoom(id.to_owned()));
        }
    }
    if let Some(distance) = options.snap_distance {
        let actions = core.set_snap_distance(distance);
        debug!(distance, actions = actions.len(), "snap distance set");
    }
    info!(
        room = %core.document().room().name,
        items = core.document().len(),
        "plan ready"
    );
    Ok(core)
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::Read { path: "stdin".to_owned(), source })?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    if let Some(path) = path {
        fs::write(path, content)?;
        info!(path = %path.display(), bytes = content.len(), "wrote output");
        return Ok(());
    }
    let mut out = io::stdout().lock();
    out.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn print_measurements(doc: &Document) {
    let unit = &doc.room().unit;
    for item in doc.items() {
        let found = measure::measure(doc, &item.id);
        let wall = found
            .wall
            .map_or_else(|| "-".to_owned(), |m| format!("{:.1} {unit}", m.distance));
        let neighbour = found
            .neighbour
            .and_then(|(id, m)| doc.get(&id).map(|other| format!("{:.1} {unit} to {}", m.distance, other.label)))
            .unwrap_or_else(|| "-".to_owned());
        println!("{}\t{}\twall {wall}\tnearest {neighbour}", item.kind.tag(), item.label);
    }
}
