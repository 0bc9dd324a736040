//! Request interpretation and dispatch.
//!
//! This crate turns one free-text request into at most two actions:
//!
//! 1. **CRM action** (`actions`) - classify the request, extract fields,
//!    call the CRM collaborator, and report a typed outcome.
//! 2. **Notification** (`notifier`) - if the request names an email address,
//!    send a completion email summarizing what happened.
//!
//! The `dispatcher` module sequences the two and renders everything into the
//! single prose reply the front end prints.
//!
//! # Safety Principle
//!
//! The LLM is a bystander. An [`llm::LlmClient`] is constructed at bootstrap
//! and carried by the dispatcher, but no routing, extraction, or CRM
//! decision ever consults it - every behavior here is deterministic regex
//! and keyword matching, and stays reproducible under test.

pub mod actions;
pub mod dispatcher;
pub mod llm;
pub mod notifier;

pub use actions::{CrmActionError, CrmActionHandler, CrmOutcome};
pub use dispatcher::{Dispatcher, NO_ACTION_MESSAGE};
pub use llm::{LlmClient, OpenAiClient};
pub use notifier::{NotificationOutcome, NotificationTrigger, NOTIFICATION_SUBJECT};
