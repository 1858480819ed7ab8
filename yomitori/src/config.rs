use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub selection: SelectionConfig,
    pub filter: FilterConfig,
    pub backend: BackendConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// Aspect-ratio cutoff above which a selection is classified as
    /// vertical (column-like) text.
    pub orientation_ratio: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Luminance cutoff for binarization; pixels strictly above it become
    /// white, everything else black.
    pub threshold: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Whole-page OCR endpoint (JSON body).
    pub page_url: String,
    /// Cropped-region OCR endpoint (multipart body).
    pub region_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub words_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selection: SelectionConfig {
                orientation_ratio: parse_env_or("YOMITORI_ORIENTATION_RATIO", 1.5),
            },
            filter: FilterConfig {
                threshold: parse_env_or("YOMITORI_BINARIZE_THRESHOLD", 140),
            },
            backend: BackendConfig {
                page_url: env::var("YOMITORI_PAGE_URL")
                    .unwrap_or_else(|_| "http://localhost:5000/ocr".to_string()),
                region_url: env::var("YOMITORI_REGION_URL")
                    .unwrap_or_else(|_| "http://localhost:5001/ocr_local".to_string()),
                timeout_secs: parse_env_or("YOMITORI_TIMEOUT", 30),
            },
            store: StoreConfig {
                words_path: env::var("YOMITORI_WORDS_PATH")
                    .unwrap_or_else(|_| "saved_words.json".to_string()),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
