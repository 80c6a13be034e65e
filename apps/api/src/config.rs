use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// When set, entities come from this NER service instead of the built-in rules.
    pub ner_endpoint: Option<String>,
    pub pdftoppm_bin: String,
    pub tesseract_bin: String,
    pub ocr_dpi: u32,
    pub ocr_lang: String,
    pub match_all_sections: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            ner_endpoint: std::env::var("NER_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            pdftoppm_bin: env_or("PDFTOPPM_BIN", "pdftoppm"),
            tesseract_bin: env_or("TESSERACT_BIN", "tesseract"),
            ocr_dpi: parse_env("OCR_DPI", 200)?,
            ocr_lang: env_or("OCR_LANG", "eng"),
            match_all_sections: parse_env("MATCH_ALL_SECTIONS", false)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
