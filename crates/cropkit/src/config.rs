// Author: Dustin Pilgrim
// License: MIT

use std::env;
use std::path::{Path, PathBuf};

use cropkit_core::CropSettings;
use rune_cfg::RuneConfig;

use crate::paths;

#[derive(Debug, Clone)]
pub struct CropkitConfig {
    pub crop: CropSettings,
    pub output_directory: PathBuf,
}

impl Default for CropkitConfig {
    fn default() -> Self {
        Self {
            crop: CropSettings::default(),
            output_directory: paths::default_output_dir(),
        }
    }
}

/// Missing file means defaults.
pub fn load(path: &Path) -> Result<CropkitConfig, String> {
    if !path.exists() {
        return Ok(CropkitConfig::default());
    }

    let rc = RuneConfig::from_file(path).map_err(|e| format!("failed to read config: {e}"))?;

    let cfg = parse_config(&rc)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn parse_config(rc: &RuneConfig) -> Result<CropkitConfig, String> {
    let mut cfg = CropkitConfig::default();

    if !rc.has("cropkit") {
        return Ok(cfg);
    }

    if let Some(w) = get_number(rc, "cropkit.minimum_width")? {
        cfg.crop.minimum_size.w = w;
    }
    if let Some(h) = get_number(rc, "cropkit.minimum_height")? {
        cfg.crop.minimum_size.h = h;
    }
    if let Some(inset) = get_number(rc, "cropkit.inset")? {
        cfg.crop.inset = inset;
    }
    if let Some(target) = get_number(rc, "cropkit.touch_target")? {
        cfg.crop.touch_target = target;
    }

    if let Some(dir) = rc
        .get_optional::<String>("cropkit.output_directory")
        .map_err(|e| format!("config error at cropkit.output_directory: {e}"))?
    {
        cfg.output_directory = expand_env(&dir);
    }

    Ok(cfg)
}

fn get_number(rc: &RuneConfig, key: &str) -> Result<Option<f64>, String> {
    rc.get_optional::<f64>(key)
        .map_err(|e| format!("config error at {key}: {e}"))
}

pub fn validate(cfg: &CropkitConfig) -> Result<(), String> {
    let checks = [
        ("cropkit.minimum_width", cfg.crop.minimum_size.w),
        ("cropkit.minimum_height", cfg.crop.minimum_size.h),
        ("cropkit.inset", cfg.crop.inset),
    ];
    for (key, v) in checks {
        if !v.is_finite() || v < 0.0 {
            return Err(format!(
                "config error at {key}: expected a non-negative number, got {v}"
            ));
        }
    }

    let t = cfg.crop.touch_target;
    if !t.is_finite() || t <= 0.0 {
        return Err(format!(
            "config error at cropkit.touch_target: expected a positive number, got {t}"
        ));
    }

    Ok(())
}

fn expand_env(s: &str) -> PathBuf {
    let mut out = s.to_string();

    if out.contains("$env.HOME") {
        if let Ok(home) = env::var("HOME") {
            out = out.replace("$env.HOME", &home);
        }
    }

    PathBuf::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(&dir.path().join("nope.rune")).unwrap();
        assert_eq!(cfg.crop, CropSettings::default());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(validate(&CropkitConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_names_bad_key() {
        let mut cfg = CropkitConfig::default();
        cfg.crop.inset = -1.0;
        let err = validate(&cfg).unwrap_err();
        assert!(err.contains("cropkit.inset"), "{err}");

        let mut cfg = CropkitConfig::default();
        cfg.crop.minimum_size.h = f64::NAN;
        let err = validate(&cfg).unwrap_err();
        assert!(err.contains("cropkit.minimum_height"), "{err}");

        let mut cfg = CropkitConfig::default();
        cfg.crop.touch_target = 0.0;
        let err = validate(&cfg).unwrap_err();
        assert!(err.contains("cropkit.touch_target"), "{err}");
    }

    #[test]
    fn test_expand_env_leaves_plain_paths() {
        assert_eq!(expand_env("/srv/crops"), PathBuf::from("/srv/crops"));
    }
}
