//! Issue triage automation for GitHub-hosted projects.
//!
//! This crate provides:
//! - Issue-template parsing (impacted plugins, platforms, impact/workaround answers)
//! - The priority decision table mapping those answers to a tier
//! - Label-state checks over the fresh label list merged with the in-flight event
//! - A Projects v2 board client (schema resolution, item lookup, field mutation)
//! - The per-event orchestrator tying the pipeline together

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Async API methods can fail in the usual transport ways

pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod labels;
pub mod priority;
pub mod template;
pub mod triage;
pub mod webhook;

pub use client::GitHubClient;
pub use config::Config;
pub use error::Error;
pub use priority::PriorityTier;
pub use triage::{Outcome, Triage};
pub use webhook::IssueEvent;
