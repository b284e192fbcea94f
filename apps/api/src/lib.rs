//! Zeroname API — CV / job-posting compatibility analysis.
//!
//! Accepts a résumé and a job description (files or pasted text), extracts
//! their text, forwards them to an LLM provider, and returns a structured
//! compatibility report. The heavy lifting is delegated: extraction to
//! `pdf-extract`/`docx-rs`, the analysis itself to the model provider behind
//! the `provider::AnalysisProvider` trait.

pub mod analysis;
pub mod capture;
pub mod client;
pub mod config;
pub mod db;
pub mod document;
pub mod errors;
pub mod provider;
pub mod routes;
pub mod state;
