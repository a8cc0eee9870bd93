//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundary between
//! the application and externally trained artifacts.

mod classifier;

pub use classifier::{ArtifactError, InsomniaClassifier};
