//! FieldCover CLI - Command-line interface
//!
//! Generates coverage points for a survey area and tracks visits from a
//! stream of position fixes.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::{PatternArg, UnitsArg};
use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use commands::track::TrackArgs;

#[derive(Parser)]
#[command(name = "fieldcover")]
#[command(version, about = "Plan and track field survey coverage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file if none exists
    Init,

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate coverage points for a survey polygon
    Generate {
        /// GeoJSON file holding the survey polygon (Feature, FeatureCollection or geometry)
        #[arg(long)]
        polygon: PathBuf,

        /// Output project file (default: <name>.geojson in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Project name (default: polygon file name)
        #[arg(long)]
        name: Option<String>,

        /// Distance between points, in --units
        #[arg(long)]
        spacing: Option<f64>,

        /// Unit of --spacing
        #[arg(long, value_enum)]
        units: Option<UnitsArg>,

        /// Grid lattice
        #[arg(long, value_enum)]
        pattern: Option<PatternArg>,

        /// Grid rotation in degrees counter-clockwise
        #[arg(long)]
        rotation: Option<f64>,

        /// Inward margin from the boundary in meters
        #[arg(long)]
        margin: Option<f64>,

        /// Place points along roads downloaded from Overpass
        #[arg(long)]
        roads: bool,

        /// Place points along roads read from a GeoJSON file instead
        #[arg(long, value_name = "FILE")]
        roads_file: Option<PathBuf>,
    },

    /// Track visits from JSON-lines position fixes
    Track {
        /// Project file written by `generate`
        #[arg(long)]
        project: PathBuf,

        /// File of JSON-lines fixes, or - for stdin
        #[arg(long, default_value = "-")]
        fixes: String,

        /// Visit distance in meters
        #[arg(long)]
        threshold: Option<f64>,

        /// Ignore fixes with a worse accuracy (meters)
        #[arg(long)]
        accuracy_ceiling: Option<f64>,
    },

    /// Show a project's settings, point count and bounds
    Info {
        /// Project file
        #[arg(long)]
        project: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
        Commands::Generate {
            polygon,
            output,
            name,
            spacing,
            units,
            pattern,
            rotation,
            margin,
            roads,
            roads_file,
        } => commands::generate::run(GenerateArgs {
            polygon,
            output,
            name,
            spacing,
            units,
            pattern,
            rotation,
            margin,
            roads,
            roads_file,
        }),
        Commands::Track {
            project,
            fixes,
            threshold,
            accuracy_ceiling,
        } => commands::track::run(TrackArgs {
            project,
            fixes,
            threshold,
            accuracy_ceiling,
        }),
        Commands::Info { project } => commands::info::run(&project),
    };

    if let Err(e) = result {
        e.exit();
    }
}
