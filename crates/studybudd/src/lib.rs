//! StudyBudd - AI-powered study planner.
//!
//! Free-text study activities become structured events in a spreadsheet, can
//! be pushed to Google Calendar, and a separate locator flow finds or routes
//! to educational institutions.

pub mod calendar;
pub mod cards;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod locator;
pub mod maps;
pub mod model;
pub mod render;
pub mod sheet;

// Re-export commonly used types for easier testing
pub use config::Credentials;
pub use error::StudybuddError;
pub use llm::{GeminiClient, LlmClient};
pub use model::{EventRecord, PlaceResult, Priority, RouteResult};
pub use sheet::PlanSheet;
