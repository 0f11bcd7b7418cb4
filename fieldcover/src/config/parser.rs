//! `Ini` → `ConfigFile`.

use ini::Ini;

use super::file::ConfigError;
use super::keys::ConfigKey;
use super::settings::ConfigFile;

/// Overlay the values found in `ini` onto the defaults.
///
/// Blank values are treated as absent. Unknown sections and keys are
/// ignored so that older binaries can read newer files.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigError> {
    let mut config = ConfigFile::default();

    for key in ConfigKey::all() {
        let Some(value) = ini
            .section(Some(key.section()))
            .and_then(|section| section.get(key.key_name()))
        else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }

        key.set(&mut config, value).map_err(|e| ConfigError::InvalidValue {
            section: key.section().to_string(),
            key: key.key_name().to_string(),
            value: value.to_string(),
            reason: match e {
                ConfigError::ValidationFailed { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::GridPattern;

    #[test]
    fn test_empty_ini_is_default() {
        let config = parse_ini(&Ini::new()).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_overlay_and_blank_values() {
        let ini = Ini::load_from_str(
            "[generation]\npattern = HEX\nrotation =\n\n[roads]\ntimeout_secs = 5\n[extra]\nfoo = bar\n",
        )
        .unwrap();
        let config = parse_ini(&ini).unwrap();
        assert_eq!(config.generation.pattern, GridPattern::Hexagonal);
        assert_eq!(config.generation.rotation_degrees, 0.0);
        assert_eq!(config.roads.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_number() {
        let ini = Ini::load_from_str("[tracking]\naccuracy_ceiling_meters = lots\n").unwrap();
        let err = parse_ini(&ini).unwrap_err();
        assert!(err.to_string().contains("tracking.accuracy_ceiling_meters = 'lots'"));
    }
}
