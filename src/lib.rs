//! # Somnus
//!
//! Terminal questionnaire that screens for insomnia risk.
//!
//! This crate provides:
//! - Validation of the eleven-field sleep and health questionnaire
//! - A rule-based risk scorer with tiered, localized advice
//! - An optional trained logistic-regression model behind a port
//! - Terminal UI for local use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and pure logic (answers, features, scoring, advice)
//! - `ports`: Trait definitions for trained classifiers
//! - `adapters`: Concrete implementations (JSON model artifact, log sanitizing)
//! - `application`: Assessment service and page session
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Answers, Assessment, RiskLabel, RiskResult};

/// Result type for Somnus operations
pub type Result<T> = std::result::Result<T, SomnusError>;

/// Main error type for Somnus
#[derive(Debug, thiserror::Error)]
pub enum SomnusError {
    #[error("Invalid answers: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("Model artifact error: {0}")]
    Artifact(#[from] ports::ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
