//! `tacmap` command-line entry point.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tacmap_app::commands::{self, RenderJob};
use tacmap_app::{AppConfig, AppResult, ShortcutRegistry};

#[derive(Debug, Parser)]
#[command(name = "tacmap", version, about = "Tactical floor-plan annotation tool")]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Asset directory with maps/ and icons.
    #[arg(long, global = true)]
    assets: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate an exported document and summarize it.
    Check { document: PathBuf },
    /// Render one floor of a document to PNG or SVG.
    Render {
        document: PathBuf,
        #[arg(long)]
        map: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        floor: Option<i32>,
        #[arg(long)]
        out: PathBuf,
        /// Output size as WIDTHxHEIGHT.
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,
    },
    /// Rewrite a document in canonical form into the export directory.
    Export {
        document: PathBuf,
        #[arg(long)]
        map: Option<String>,
        /// Export directory; defaults to the config's, then Downloads.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// List the maps in the catalog.
    Maps,
    /// Print the editor shortcuts.
    Shortcuts,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value}"))?;
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|e| format!("{s}: {e}"));
    match (parse(w)?, parse(h)?) {
        (0, _) | (_, 0) => Err("size must be non-zero".to_string()),
        size => Ok(size),
    }
}

fn load_config(cli: &Cli) -> AppResult<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(assets) = &cli.assets {
        config.asset_root = assets.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> AppResult<()> {
    let mut config = load_config(&cli)?;
    match cli.command {
        Command::Check { document } => {
            let summary = commands::check(&document)?;
            print!("{summary}");
        }
        Command::Render {
            document,
            map,
            floor,
            out,
            size,
        } => {
            if let Some((width, height)) = size {
                config.width = width;
                config.height = height;
            }
            commands::render(
                config,
                &RenderJob {
                    document,
                    map,
                    floor,
                    out,
                },
            )?;
        }
        Command::Export { document, map, dir } => {
            if dir.is_some() {
                config.export_dir = dir;
            }
            let path = commands::export(config, &document, map.as_deref())?;
            println!("{}", path.display());
        }
        Command::Maps => {
            let catalog = tacmap_core::MapCatalog::load(&config.asset_root);
            for map in catalog.maps() {
                let floors: Vec<String> = map.floors.iter().map(|f| f.floor_number.to_string()).collect();
                println!("{:20} floors {}", map.id, floors.join(", "));
            }
        }
        Command::Shortcuts => ShortcutRegistry::print_all(),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
