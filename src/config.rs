//! Runtime configuration from `SOMNUS_*` environment variables.
//!
//! Supported:
//! - `SOMNUS_MODEL_PATH` (default `models`)
//! - `SOMNUS_SCORING_ENGINE=rules|model` (default `rules`)
//! - `SOMNUS_LANGUAGE=en|id` (default `en`)
//! - `SOMNUS_REQUIRE_MANIFEST=true|false` (default `false`)
//! - `SOMNUS_LOG_MODE=auto|file|stdout` (default `auto`)
//! - `SOMNUS_LOG_FILE` (default `somnus.log`)
//!
//! Unparseable values are ignored with a warning.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::Language;

/// Which scorer produces the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringEngine {
    #[default]
    Rules,
    Model,
}

impl FromStr for ScoringEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" | "rule" => Ok(Self::Rules),
            "model" => Ok(Self::Model),
            other => Err(format!("unknown scoring engine '{other}'")),
        }
    }
}

impl fmt::Display for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(format!("unknown log mode '{other}'")),
        }
    }
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model_path: PathBuf,
    pub engine: ScoringEngine,
    pub language: Language,
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models"),
            engine: ScoringEngine::Rules,
            language: Language::English,
            require_manifest: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("somnus.log"),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("SOMNUS_MODEL_PATH") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.model_path = PathBuf::from(v);
            }
        }

        if let Some(v) = lookup("SOMNUS_SCORING_ENGINE") {
            cfg.engine = parse_or_warn("SOMNUS_SCORING_ENGINE", &v, cfg.engine);
        }

        if let Some(v) = lookup("SOMNUS_LANGUAGE") {
            cfg.language = parse_or_warn("SOMNUS_LANGUAGE", &v, cfg.language);
        }

        if let Some(v) = lookup("SOMNUS_REQUIRE_MANIFEST") {
            match parse_bool(&v) {
                Some(b) => cfg.require_manifest = b,
                None => tracing::warn!("Ignoring SOMNUS_REQUIRE_MANIFEST: expected true/false"),
            }
        }

        if let Some(v) = lookup("SOMNUS_LOG_MODE") {
            cfg.log_mode = parse_or_warn("SOMNUS_LOG_MODE", &v, cfg.log_mode);
        }

        if let Some(v) = lookup("SOMNUS_LOG_FILE") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.log_file = PathBuf::from(v);
            }
        }

        cfg
    }
}

fn parse_or_warn<T>(key: &str, raw: &str, fallback: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!("Ignoring {}: {}", key, e);
        fallback
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
