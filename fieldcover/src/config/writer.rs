//! `ConfigFile` → commented INI text.

use super::keys::path_to_display;
use super::settings::ConfigFile;

/// Render `config` with a comment above every key.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let generation = &config.generation;
    let tracking = &config.tracking;

    format!(
        r#"[generation]
; Distance between neighbouring coverage points, in `units`
spacing = {}
; Unit of spacing: m or km
units = {}
; Grid lattice:
;   rect - square grid
;   hex  - hexagonal tiling centres (denser, more even coverage)
pattern = {}
; Grid rotation in degrees counter-clockwise, 0 up to 360
rotation = {}
; Keep points this many meters inside the survey boundary
margin_meters = {}
; Place points along the road network instead of a grid (true/false)
; Ignores pattern, rotation and margin_meters
use_roads = {}

[tracking]
; A point counts as visited when a fix comes within this many meters
visit_threshold_meters = {}
; Fixes reporting a worse accuracy than this (meters) are ignored
accuracy_ceiling_meters = {}

[roads]
; Overpass API interpreter endpoint used to download roads
overpass_url = {}
; Give up on a road download after this many seconds
timeout_secs = {}

[logging]
; Directory for daily log files
directory = {}
; Log level: trace, debug, info, warn, error (RUST_LOG overrides)
level = {}
"#,
        generation.spacing,
        generation.units.suffix(),
        generation.pattern.as_str(),
        generation.rotation_degrees,
        generation.margin_meters,
        generation.use_road_network,
        tracking.visit_threshold_meters,
        tracking.accuracy_ceiling_meters,
        config.roads.overpass_url,
        config.roads.timeout_secs,
        path_to_display(&config.logging.directory),
        config.logging.level,
    )
}
