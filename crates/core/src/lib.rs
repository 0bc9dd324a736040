//! Deterministic core of the crmpilot assistant.
//!
//! Everything in this crate is pure text processing plus configuration:
//! field extraction, intent classification, and the `AppConfig` contract.
//! No network or filesystem access happens here (beyond reading the config
//! file at startup), which keeps the request-interpretation rules trivially
//! testable.

pub mod config;
pub mod domain;
pub mod extract;
pub mod intent;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::{ExtractMode, ExtractedFields, FieldKey};
pub use extract::{extract_contact_fields, extract_deal_fields, extract_email};
pub use intent::{classify, mentions_crm, Intent};
