use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::variance::VarianceThresholds;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    // Attendance badges
    pub variance_major_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            rate_protected_per_min: 1000,
            variance_major_minutes: VarianceThresholds::default().major_minutes,
        }
    }
}

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Config::default();
        Ok(Self {
            server_addr: var_or("SERVER_ADDR", defaults.server_addr)?,
            api_prefix: var_or("API_PREFIX", defaults.api_prefix)?,
            log_dir: var_or("LOG_DIR", defaults.log_dir)?,
            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", defaults.rate_protected_per_min)?,
            variance_major_minutes: var_or("VARIANCE_MAJOR_MINUTES", defaults.variance_major_minutes)?,
        })
    }

    pub fn variance_thresholds(&self) -> VarianceThresholds {
        VarianceThresholds {
            major_minutes: self.variance_major_minutes,
        }
    }
}
