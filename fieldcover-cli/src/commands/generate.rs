//! Generate command - lay out coverage points over a survey polygon.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use tracing::info;

use fieldcover::coverage::{GenerationConfig, Generator};
use fieldcover::project::{parse_polygon, parse_roads, ProjectDocument, UNTITLED_PROJECT};
use fieldcover::roads::{AsyncReqwestClient, OverpassRoadSource, RoadSource, StaticRoadSource};

use super::common::{read_text, resolve_generation_config, GenerationOverrides, PatternArg, UnitsArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the generate command.
pub struct GenerateArgs {
    pub polygon: PathBuf,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub spacing: Option<f64>,
    pub units: Option<UnitsArg>,
    pub pattern: Option<PatternArg>,
    pub rotation: Option<f64>,
    pub margin: Option<f64>,
    pub roads: bool,
    pub roads_file: Option<PathBuf>,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("generate");
    let config = runner.config();

    let overrides = GenerationOverrides {
        spacing: args.spacing,
        units: args.units,
        pattern: args.pattern,
        rotation: args.rotation,
        margin: args.margin,
        roads: args.roads || args.roads_file.is_some(),
    };
    let generation = resolve_generation_config(&overrides, config);

    let polygon = parse_polygon(&read_text(&args.polygon)?)?;

    let mut generator = Generator::new().with_road_timeout(config.roads.timeout());
    if generation.use_road_network {
        let source: Arc<dyn RoadSource> = match &args.roads_file {
            Some(path) => {
                let roads = parse_roads(&read_text(path)?)?;
                println!("Loaded {} roads from {}", roads.len(), path.display());
                Arc::new(StaticRoadSource::new(roads))
            }
            None => {
                println!("Downloading road network from {}...", config.roads.overpass_url);
                let client = AsyncReqwestClient::with_timeout(config.roads.timeout_secs)?;
                Arc::new(OverpassRoadSource::with_url(client, config.roads.overpass_url.clone()))
            }
        };
        generator = generator.with_road_source(source);
    }

    let runtime = runner.runtime()?;
    let points = runtime.block_on(generator.generate(&polygon, &generation))?;

    let name = args
        .name
        .unwrap_or_else(|| project_name_from_path(&args.polygon));
    let document = ProjectDocument::new(name, polygon, generation.clone(), points);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(document.file_name()));
    document.save(&output)?;

    info!(
        points = document.points.len(),
        output = %output.display(),
        "Project written"
    );

    print_summary(&document, &generation, &output);
    Ok(())
}

/// Project name from the polygon file stem.
fn project_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED_PROJECT.to_string())
}

fn print_summary(document: &ProjectDocument, generation: &GenerationConfig, output: &Path) {
    let mode = if generation.use_road_network {
        "along roads".to_string()
    } else {
        format!(
            "{} grid, rotated {}°, margin {} m",
            generation.pattern, generation.rotation_degrees, generation.margin_meters
        )
    };

    println!();
    println!("{}", style(&document.name).bold());
    println!(
        "  Spacing:  {} {} ({})",
        generation.spacing, generation.units, mode
    );
    if document.points.is_empty() {
        println!(
            "  Points:   {}",
            style("0 - the area is too small for this spacing or has no roads").yellow()
        );
    } else {
        println!("  Points:   {}", style(document.points.len()).green().bold());
    }
    println!("  Saved to: {}", output.display());
}
