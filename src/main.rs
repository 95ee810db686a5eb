use std::fs;
use std::io::{self, Read};

use canvas3d::camera::Preset;
use canvas3d::config::{ConfigError, RendererConfig};
use canvas3d::depth::{depth_key, paint_order};
use canvas3d::engine::{EngineCore, SceneInputs};
use canvas3d::map::{FloorId, MapDescription, PathPoint, Toggles};
use canvas3d::surface::{RecordingSurface, SurfaceError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("output encoding failed: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "floorview", about = "Inspect isometric multi-floor map scenes")]
struct Cli {
    /// Map description JSON file, or - for stdin.
    #[arg(long, env = "FLOORVIEW_MAP")]
    map: String,

    /// Route JSON file: an array of `{x, y, floor}` or `[x, y, floor]`.
    #[arg(long)]
    path: Option<String>,

    /// Renderer config JSON file.
    #[arg(long, env = "FLOORVIEW_CONFIG")]
    config: Option<String>,

    /// Log library debug output to stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List floors with room counts.
    Floors,
    /// Print the render list built for a floor.
    Scene(ViewArgs),
    /// Print the paint order with depth keys.
    Order(ViewArgs),
    /// Paint onto a recording surface and print the draw calls.
    Paint(PaintArgs),
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    /// Floor being viewed; falls back to the lowest floor.
    #[arg(long, default_value_t = 1)]
    floor: FloorId,

    #[arg(long, default_value_t = false)]
    hide_connections: bool,

    #[arg(long, default_value_t = false)]
    hide_labels: bool,

    #[arg(long, default_value_t = false)]
    hide_path: bool,
}

impl ViewArgs {
    fn toggles(&self) -> Toggles {
        Toggles {
            show_connections: !self.hide_connections,
            show_labels: !self.hide_labels,
            show_path: !self.hide_path,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct PaintArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Camera preset: reset, top, side or perspective.
    #[arg(long, default_value = "reset")]
    preset: Preset,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Print call counts and drawn text instead of every call.
    #[arg(long, default_value_t = false)]
    summary: bool,
}

/// One row of `order` output.
#[derive(Debug, Serialize)]
struct OrderEntry {
    pass: &'static str,
    object: &'static str,
    floor_id: FloorId,
    depth: f64,
}

/// `paint --summary` output.
#[derive(Debug, Serialize)]
struct PaintSummary<'a> {
    calls: usize,
    max_depth: usize,
    transformed: bool,
    texts: Vec<&'a str>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    let map = parse_map(&read_source(&cli.map)?)?;
    let path = match cli.path.as_deref() {
        Some(source) => parse_path(&read_source(source)?)?,
        None => Vec::new(),
    };
    let config = match cli.config.as_deref() {
        Some(source) => RendererConfig::from_json(&read_source(source)?)?,
        None => RendererConfig::default(),
    };
    tracing::debug!(floors = map.floors.len(), steps = path.len(), "inputs loaded");

    let output = run(&cli.command, map, path, config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(command: &Command, map: MapDescription, path: Vec<PathPoint>, config: RendererConfig) -> Result<Value, CliError> {
    match command {
        Command::Floors => Ok(serde_json::to_value(map.floor_descriptors())?),
        Command::Scene(view) => {
            let core = EngineCore::create(scene_inputs(map, path, view), config);
            Ok(serde_json::to_value(core.objects())?)
        }
        Command::Order(view) => {
            let core = EngineCore::create(scene_inputs(map, path, view), config);
            Ok(serde_json::to_value(order_entries(&core))?)
        }
        Command::Paint(args) => {
            let mut core = EngineCore::create(scene_inputs(map, path, &args.view), config);
            core.apply_preset(args.preset);
            core.mark_surface_ready(args.width, args.height, args.dpr);

            let mut surface = RecordingSurface::new();
            core.paint(&mut surface)?;
            if args.summary {
                let summary = PaintSummary {
                    calls: surface.calls.len(),
                    max_depth: surface.max_depth(),
                    transformed: surface.has_transform(),
                    texts: surface.texts(),
                };
                return Ok(serde_json::to_value(summary)?);
            }
            Ok(serde_json::to_value(&surface.calls)?)
        }
    }
}

fn scene_inputs(map: MapDescription, path: Vec<PathPoint>, view: &ViewArgs) -> SceneInputs {
    if !map.has_floor(view.floor) {
        tracing::warn!(requested = view.floor, "floor not in map; using lowest floor");
    }
    SceneInputs { map, current_floor: view.floor, path, toggles: view.toggles() }
}

fn order_entries(core: &EngineCore) -> Vec<OrderEntry> {
    let order = paint_order(core.objects());
    let floors = order.floors.iter().map(|o| ("floors", *o));
    let objects = order.objects.iter().map(|o| ("objects", *o));
    floors
        .chain(objects)
        .map(|(pass, obj)| OrderEntry { pass, object: obj.kind_name(), floor_id: obj.floor_id, depth: depth_key(obj) })
        .collect()
}

fn read_source(source: &str) -> Result<String, CliError> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| CliError::Io { path: "stdin".to_owned(), source: err })?;
        return Ok(raw);
    }
    fs::read_to_string(source).map_err(|err| CliError::Io { path: source.to_owned(), source: err })
}

fn parse_map(raw: &str) -> Result<MapDescription, CliError> {
    MapDescription::from_json(raw).map_err(|source| CliError::Json { what: "map", source })
}

fn parse_path(raw: &str) -> Result<Vec<PathPoint>, CliError> {
    serde_json::from_str(raw).map_err(|source| CliError::Json { what: "path", source })
}
