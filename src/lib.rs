//! BankBench - Bank Product Comparison Core
//!
//! Reconciles backend comparison data for a set of banks, a product, and a
//! set of criteria, and turns backend analysis records into short insights.
//!
//! ## Core Features
//!
//! - **Fetch Orchestration**: last-request-wins retrieval with periodic refresh
//! - **Winner Evaluation**: per-criterion best-performer sets for highlighting
//! - **Insight Aggregation**: categorized text blocks with a fixed fallback
//! - **Explicit Demo Data**: synthetic matrices that are always flagged
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use bankbench::{FetchOptions, FetchOrchestrator, HttpClient, Selection};
//!
//! let client = Arc::new(HttpClient::new(&config.api)?);
//! let mut orchestrator = FetchOrchestrator::new(client, FetchOptions::default());
//! if let Some(cycle) = orchestrator.set_selection(selection) {
//!     cycle.await?;
//! }
//! let snapshot = orchestrator.snapshot();
//! ```
//!
//! ## Modules
//!
//! - [`fetch`]: Fetch state machine, orchestrator, refresh timer
//! - [`evaluate`]: Winner sets and win counts
//! - [`insights`]: Analysis record aggregation
//! - [`client`]: Backend traits and the reqwest client
//! - [`config`]: Layered configuration

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod demo;
pub mod evaluate;
pub mod fetch;
pub mod insights;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{BenchError, ErrorCategory, Result, SelectionIssue};

// Data Model
pub use types::{
    AnalysisRecord, AnalysisType, ComparisonMatrix, ConfidenceMap, Criterion, Entity,
    FetchResult, InsightBlock, InsightCategory, Selection, SourceRecord,
};

// =============================================================================
// Reconciliation Re-exports
// =============================================================================

pub use client::{
    ComparisonQuery, ComparisonSource, HttpClient, InsightQuery, InsightSource,
    SharedComparisonSource, SharedInsightSource,
};
pub use evaluate::{WinCount, WinnerTable, win_counts, winners};
pub use fetch::{CycleOutcome, FetchOptions, FetchOrchestrator, FetchPhase, FetchSnapshot};
pub use insights::{InsightFeed, InsightReport, aggregate, fallback_insights};
