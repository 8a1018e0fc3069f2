//! Fetch State Machine
//!
//! ## States
//!
//! - **Idle**: Nothing requested yet, or the in-flight cycle was invalidated
//! - **Fetching**: A request with sequence number `seq` is outstanding
//! - **Settled**: The latest request finished, successfully or not
//!
//! ## Transitions
//!
//! ```text
//! Idle/Settled --[begin]--> Fetching{seq+1}
//! Fetching{n}  --[begin]--> Fetching{n+1}            (n is superseded)
//! Fetching{n}  --[apply(n, Ok)]--> Settled(Success)
//! Fetching{n}  --[apply(n, Err)]--> Settled(Failure)
//! any          --[apply(m != latest)]--> unchanged   (stale response dropped)
//! Fetching{n}  --[invalidate]--> Idle
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{BenchError, ComparisonMatrix, ConfidenceMap, FetchResult, SourceRecord};

/// How the latest cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Settled {
    Success,
    Failure,
}

/// Lifecycle phase of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum FetchPhase {
    Idle,
    Fetching { seq: u64 },
    Settled { outcome: Settled },
}

impl std::fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Fetching { seq } => write!(f, "FETCHING(#{})", seq),
            Self::Settled {
                outcome: Settled::Success,
            } => write!(f, "SETTLED(success)"),
            Self::Settled {
                outcome: Settled::Failure,
            } => write!(f, "SETTLED(failure)"),
        }
    }
}

/// What happened to one fetch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Preconditions not met; no request was made
    Skipped,
    /// Response applied as the new result
    Applied,
    /// Request failed; held data flagged synthetic
    Failed(String),
    /// Response belonged to a superseded request and was dropped
    Discarded,
}

/// Owned fetch state with explicit transitions.
///
/// Sequence numbers only grow; only a response carrying the latest
/// number may change the held result.
#[derive(Debug, Clone)]
pub struct FetchState {
    phase: FetchPhase,
    result: FetchResult,
    error: Option<String>,
    latest_seq: u64,
}

impl FetchState {
    pub fn new() -> Self {
        Self {
            phase: FetchPhase::Idle,
            result: FetchResult::empty(),
            error: None,
            latest_seq: 0,
        }
    }

    /// Start a cycle: supersede anything in flight, clear the error.
    pub fn begin(&mut self) -> u64 {
        self.latest_seq += 1;
        self.phase = FetchPhase::Fetching {
            seq: self.latest_seq,
        };
        self.error = None;
        self.latest_seq
    }

    /// Drop interest in any in-flight request without starting a new one.
    pub fn invalidate(&mut self) {
        self.latest_seq += 1;
        if matches!(self.phase, FetchPhase::Fetching { .. }) {
            self.phase = FetchPhase::Idle;
        }
    }

    /// Apply the response of request `seq`.
    ///
    /// On failure the previous matrix is kept but marked synthetic.
    pub fn apply(
        &mut self,
        seq: u64,
        outcome: std::result::Result<FetchResult, BenchError>,
    ) -> CycleOutcome {
        if seq != self.latest_seq || !self.is_loading() {
            return CycleOutcome::Discarded;
        }

        match outcome {
            Ok(result) => {
                self.result = result;
                self.error = None;
                self.phase = FetchPhase::Settled {
                    outcome: Settled::Success,
                };
                CycleOutcome::Applied
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(message.clone());
                self.result.is_synthetic = true;
                self.phase = FetchPhase::Settled {
                    outcome: Settled::Failure,
                };
                CycleOutcome::Failed(message)
            }
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FetchPhase::Fetching { .. })
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn result(&self) -> &FetchResult {
        &self.result
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> FetchSnapshot {
        FetchSnapshot {
            result: self.result.clone(),
            loading: self.is_loading(),
            error: self.error.clone(),
            phase: self.phase,
        }
    }
}

impl Default for FetchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view handed to presentation code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchSnapshot {
    pub result: FetchResult,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: FetchPhase,
}

impl FetchSnapshot {
    pub fn data(&self) -> &ComparisonMatrix {
        &self.result.matrix
    }

    pub fn sources(&self) -> &[SourceRecord] {
        &self.result.sources
    }

    pub fn confidence(&self) -> &ConfidenceMap {
        &self.result.confidence
    }

    pub fn last_fetch_time(&self) -> Option<DateTime<Utc>> {
        self.result.fetched_at
    }

    pub fn is_mock(&self) -> bool {
        !self.result.is_authoritative()
    }

    pub fn note(&self) -> Option<&str> {
        self.result.note.as_deref()
    }
}
