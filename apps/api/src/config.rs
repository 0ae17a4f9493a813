use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::imaging::{FontPaths, RenderLimits};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub font_dir: PathBuf,
    pub sinhala_font: String,
    pub latin_font: String,
    pub latin_bold_font: String,
    pub max_titles_per_batch: usize,
    pub max_image_dimension: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: string_or("RUST_LOG", "info"),
            font_dir: PathBuf::from(string_or("FONT_DIR", "public/fonts")),
            sinhala_font: string_or("SINHALA_FONT", "IskoolaPotaRegular.ttf"),
            latin_font: string_or("LATIN_FONT", "OpenSans-Regular.ttf"),
            latin_bold_font: string_or("LATIN_BOLD_FONT", "OpenSans-Bold.ttf"),
            max_titles_per_batch: parse_or(&lookup, "MAX_TITLES_PER_BATCH", 50)?,
            max_image_dimension: parse_or(&lookup, "MAX_IMAGE_DIMENSION", 4096)?,
        })
    }

    pub fn font_paths(&self) -> FontPaths {
        FontPaths {
            sinhala: self.font_dir.join(&self.sinhala_font),
            latin_regular: self.font_dir.join(&self.latin_font),
            latin_bold: self.font_dir.join(&self.latin_bold_font),
        }
    }

    pub fn render_limits(&self) -> RenderLimits {
        RenderLimits {
            max_titles: self.max_titles_per_batch,
            max_dimension: self.max_image_dimension,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
