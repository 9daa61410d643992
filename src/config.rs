use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::anyhow;

use crate::inject::{API_BASE_URL, APP_NAME, PINCODE_API_URL};

/// Paths of the two API resources, versions included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    pub students: String,
    pub checkins: String,
}

impl ApiRoutes {
    pub fn new(student_version: &str, checkins_version: &str) -> Self {
        Self {
            students: format!("/api/v{}/students", student_version),
            checkins: format!("/api/v{}/checkins", checkins_version),
        }
    }
}

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub student_api_version: String,
    pub checkins_api_version: String,
    pub frontend_dir: PathBuf,
    pub api_base_url: Option<String>,
    pub pincode_api_url: Option<String>,
    pub app_name: Option<String>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?,
            student_api_version: try_load(&lookup, "STUDENT_API_VERSION", "0")?,
            checkins_api_version: try_load(&lookup, "CHECKINS_API_VERSION", "0")?,
            frontend_dir: try_load(&lookup, "FRONTEND_DIR", "frontend/dist")?,
            api_base_url: lookup("API_BASE_URL"),
            pincode_api_url: lookup("PINCODE_API_URL"),
            app_name: lookup("APP_NAME"),
        })
    }

    pub fn routes(&self) -> ApiRoutes {
        ApiRoutes::new(&self.student_api_version, &self.checkins_api_version)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.frontend_dir.join("assets")
    }

    /// Placeholder names baked into the frontend bundle and what replaces
    /// them. Unset values are left out.
    pub fn placeholders(&self) -> Vec<(&'static str, String)> {
        [
            (API_BASE_URL, &self.api_base_url),
            (PINCODE_API_URL, &self.pincode_api_url),
            (APP_NAME, &self.app_name),
        ]
        .into_iter()
        .filter_map(|(placeholder, value)| value.clone().map(|value| (placeholder, value)))
        .collect()
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        log::warn!("{} not set, using default: {}", key, default);
        default.to_string()
    });
    raw.parse()
        .map_err(|e| anyhow!("Invalid {} value `{}`: {}", key, raw, e))
}
