use std::collections::HashSet;

use chrono::FixedOffset;
use serde::Deserialize;

use regdash_core::error::{RegdashError, Result};
use regdash_core::model::NewRegistration;
use regdash_core::{UnknownRangePolicy, WeekStart};

use crate::auth::Role;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub loader: LoaderSection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub form: FormSection,

    #[serde(default)]
    pub seed: Vec<NewRegistration>,

    #[serde(default)]
    pub log: LogSection,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RegdashError::UnsupportedVersion);
        }

        self.loader.validate()?;
        self.auth.validate()?;
        self.form.validate()?;

        for (i, row) in self.seed.iter().enumerate() {
            row.validate(self.form.total_steps)
                .map_err(|e| RegdashError::BadRequest(format!("seed[{i}]: {e}")))?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderSection {
    /// Quiescence interval before a load actually fetches.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_page")]
    pub default_page: u32,

    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: u32,

    #[serde(default)]
    pub week_start: WeekStart,

    #[serde(default)]
    pub unknown_range: UnknownRangePolicy,

    /// Offset of the dashboard's wall clock (calendar windows start at local midnight).
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_page: default_page(),
            default_limit: default_limit(),
            max_page_limit: default_max_page_limit(),
            week_start: WeekStart::default(),
            unknown_range: UnknownRangePolicy::default(),
            utc_offset_minutes: 0,
        }
    }
}

impl LoaderSection {
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms > 10_000 {
            return Err(RegdashError::BadRequest(
                "loader.debounce_ms must be between 0 and 10000".into(),
            ));
        }
        if !(1..=1000).contains(&self.max_page_limit) {
            return Err(RegdashError::BadRequest(
                "loader.max_page_limit must be between 1 and 1000".into(),
            ));
        }
        if self.default_limit == 0 || self.default_limit > self.max_page_limit {
            return Err(RegdashError::BadRequest(
                "loader.default_limit must be between 1 and loader.max_page_limit".into(),
            ));
        }
        if self.default_page == 0 {
            return Err(RegdashError::BadRequest(
                "loader.default_page must be at least 1".into(),
            ));
        }
        if !(-720..=840).contains(&self.utc_offset_minutes) {
            return Err(RegdashError::BadRequest(
                "loader.utc_offset_minutes must be between -720 and 840".into(),
            ));
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            RegdashError::BadRequest(format!(
                "loader.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }
}

fn default_debounce_ms() -> u64 {
    300
}
fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    10
}
fn default_max_page_limit() -> u32 {
    100
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for t in &self.tokens {
            if t.token.trim().is_empty() || t.user_id.trim().is_empty() {
                return Err(RegdashError::BadRequest(
                    "auth.tokens entries need a non-empty token and user_id".into(),
                ));
            }
            if !seen.insert(t.token.as_str()) {
                return Err(RegdashError::BadRequest(format!(
                    "auth.tokens contains a duplicate token for user {}",
                    t.user_id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSection {
    #[serde(default = "default_total_steps")]
    pub total_steps: u32,
}

impl Default for FormSection {
    fn default() -> Self {
        Self {
            total_steps: default_total_steps(),
        }
    }
}

impl FormSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=50).contains(&self.total_steps) {
            return Err(RegdashError::BadRequest(
                "form.total_steps must be between 1 and 50".into(),
            ));
        }
        Ok(())
    }
}

fn default_total_steps() -> u32 {
    4
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".into()
}
