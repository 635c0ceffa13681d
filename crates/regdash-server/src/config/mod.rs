//! Dashboard config loader (strict parsing).

pub mod schema;

use std::fs;

use regdash_core::error::{RegdashError, Result};

pub use schema::{
    AuthSection, DashboardConfig, FormSection, LoaderSection, LogSection, ServerSection,
    TokenConfig,
};

pub fn load_from_file(path: &str) -> Result<DashboardConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RegdashError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<DashboardConfig> {
    let cfg: DashboardConfig = serde_yaml::from_str(s)
        .map_err(|e| RegdashError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
