//! Info command - describe a project file.

use std::path::Path;

use console::style;

use fieldcover::project::ProjectDocument;

use crate::error::CliError;

/// Run the info command.
pub fn run(path: &Path) -> Result<(), CliError> {
    let document = ProjectDocument::load(path)?;
    let config = &document.config;
    let bounds = document.polygon.bounding_box();

    println!("{}", style(&document.name).bold());
    println!("  File:      {}", path.display());
    println!("  Created:   {}", document.created_at.to_rfc3339());
    println!("  Updated:   {}", document.updated_at.to_rfc3339());
    println!();
    println!("{}", style("Settings").bold());
    println!("  Spacing:   {} {}", config.spacing, config.units);
    if config.use_road_network {
        println!("  Mode:      along roads");
    } else {
        println!("  Mode:      {} grid", config.pattern);
        println!("  Rotation:  {}°", config.rotation_degrees);
        println!("  Margin:    {} m", config.margin_meters);
    }
    println!();
    println!("{}", style("Coverage").bold());
    println!("  Points:    {}", document.points.len());
    println!(
        "  Bounds:    {:.6}, {:.6} to {:.6}, {:.6} (lon, lat)",
        bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
    );
    if !document.polygon.holes().is_empty() {
        println!("  Holes:     {}", document.polygon.holes().len());
    }

    Ok(())
}
