//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the screening flow and the page session.

mod assessment;
mod session;

pub use assessment::{AssessmentService, Outcome};
pub use session::{transition, Navigation, Page, Session};
