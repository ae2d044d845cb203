#![forbid(unsafe_code)]

//! Core domain model and rule engine for recipe conversion presets.
//!
//! This crate provides:
//! - Domain types (tags, groups, selections, adjustments)
//! - Preset catalog
//! - Rule sets and the conflict resolver
//! - Disabled/locked predicates and the toggle flow
//! - Label formatting
//! - Conversion request payload
//! - Persistence (saved selection, request journal)

pub mod types;
pub mod error;
pub mod catalog;
pub mod rules;
pub mod resolver;
pub mod predicates;
pub mod labels;
pub mod request;
pub mod config;
pub mod logging;
pub mod state;
pub mod journal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, PresetCatalog};
pub use rules::{Reciprocity, RuleSet, RuleVariant};
pub use resolver::resolve;
pub use predicates::{disabled_for, locked_for, toggle, Toggle};
pub use labels::{format_adjustments, label_for};
pub use request::{ConversionRequest, NutritionTargets};
pub use config::Config;
pub use state::SavedSelection;
pub use journal::{load_recent_records, JsonlSink, RequestRecord, RequestSink};
