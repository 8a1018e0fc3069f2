//! Data Fetch Orchestration
//!
//! Retrieves the comparison matrix for the current selection and keeps the
//! held [`FetchResult`] consistent while selections change faster than the
//! network answers.
//!
//! ## Triggers
//!
//! - selection change ([`FetchOrchestrator::set_selection`])
//! - enabling fetch ([`FetchOrchestrator::set_options`])
//! - explicit [`FetchOrchestrator::refetch`]
//! - refresh timer tick
//!
//! Every trigger follows the same rules: no request unless enabled with a
//! non-empty selection, one request per trigger, and only the most recently
//! issued request may change state.
//!
//! [`FetchResult`]: crate::types::FetchResult

mod refresh;
mod state;

pub use state::{CycleOutcome, FetchPhase, FetchSnapshot, FetchState, Settled};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{ComparisonQuery, SharedComparisonSource};
use crate::config::FetchConfig;
use crate::types::{FetchResult, Result, Selection};
use refresh::RefreshTimer;

/// Fetch switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub enabled: bool,
    /// 0 disables periodic refresh
    pub refetch_interval_ms: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            refetch_interval_ms: 0,
        }
    }
}

impl FetchOptions {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            enabled: config.enabled,
            refetch_interval_ms: config.refetch_interval_ms,
        }
    }

    pub fn with_interval_ms(mut self, refetch_interval_ms: u64) -> Self {
        self.refetch_interval_ms = refetch_interval_ms;
        self
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Refresh period, if periodic refresh applies
    pub fn refresh_period(&self) -> Option<Duration> {
        (self.enabled && self.refetch_interval_ms > 0)
            .then(|| Duration::from_millis(self.refetch_interval_ms))
    }
}

// =============================================================================
// Shared Core
// =============================================================================

struct Core {
    state: FetchState,
    selection: Selection,
    enabled: bool,
}

/// State reachable from spawned cycles and the refresh task
struct Shared {
    source: SharedComparisonSource,
    core: Mutex<Core>,
    updates: watch::Sender<FetchSnapshot>,
    lifetime: CancellationToken,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Fetch state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn publish(&self, core: &Core) {
        self.updates.send_replace(core.state.snapshot());
    }

    /// Take a sequence number if the preconditions hold.
    fn begin(&self) -> Option<(u64, ComparisonQuery)> {
        if self.lifetime.is_cancelled() {
            return None;
        }

        let mut core = self.lock();
        if !core.enabled || !core.selection.is_fetchable() {
            debug!(
                "Fetch skipped (enabled: {}, banks: {}, criteria: {})",
                core.enabled,
                core.selection.entities().len(),
                core.selection.criteria().len()
            );
            return None;
        }

        let seq = core.state.begin();
        let query = ComparisonQuery::from_selection(&core.selection);
        self.publish(&core);

        debug!(
            "Fetch #{} via {}: banks={} criteria={} product={}",
            seq,
            self.source.name(),
            query.banks,
            query.criteria,
            query.product
        );
        Some((seq, query))
    }

    async fn run(&self, seq: u64, query: ComparisonQuery) -> CycleOutcome {
        let outcome = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => return CycleOutcome::Discarded,
            outcome = self.source.fetch_comparison(&query) => outcome,
        };
        self.complete(seq, outcome)
    }

    fn complete(&self, seq: u64, outcome: Result<FetchResult>) -> CycleOutcome {
        if self.lifetime.is_cancelled() {
            return CycleOutcome::Discarded;
        }

        let mut core = self.lock();
        let outcome = core.state.apply(seq, outcome);

        match &outcome {
            CycleOutcome::Applied => {
                let result = core.state.result();
                info!(
                    "Fetch #{} applied: {} banks, {} sources{}",
                    seq,
                    result.matrix.entity_count(),
                    result.sources.len(),
                    if result.is_synthetic { " (mock)" } else { "" }
                );
            }
            CycleOutcome::Failed(message) => {
                warn!("Fetch #{} failed, keeping previous data: {}", seq, message);
            }
            CycleOutcome::Discarded => {
                debug!(
                    "Fetch #{} superseded by #{}, response dropped",
                    seq,
                    core.state.latest_seq()
                );
                return outcome;
            }
            CycleOutcome::Skipped => {}
        }

        self.publish(&core);
        outcome
    }

    async fn cycle(&self) -> CycleOutcome {
        match self.begin() {
            Some((seq, query)) => self.run(seq, query).await,
            None => CycleOutcome::Skipped,
        }
    }

    /// Supersede whatever is in flight without starting a new request.
    fn invalidate(&self, core: &mut Core) {
        core.state.invalidate();
        self.publish(core);
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Owns one fetch state and its refresh timer.
///
/// Must be used inside a tokio runtime. Dropping the orchestrator cancels
/// the timer and suppresses results of requests still in flight.
pub struct FetchOrchestrator {
    shared: Arc<Shared>,
    options: FetchOptions,
    timer: Option<RefreshTimer>,
}

impl FetchOrchestrator {
    /// Starts idle with an empty selection; nothing is fetched until a
    /// selection is set.
    pub fn new(source: SharedComparisonSource, options: FetchOptions) -> Self {
        let state = FetchState::new();
        let (updates, _) = watch::channel(state.snapshot());

        let shared = Arc::new(Shared {
            source,
            core: Mutex::new(Core {
                state,
                selection: Selection::default(),
                enabled: options.enabled,
            }),
            updates,
            lifetime: CancellationToken::new(),
        });

        let mut orchestrator = Self {
            shared,
            options,
            timer: None,
        };
        orchestrator.rearm_timer();
        orchestrator
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<FetchSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn snapshot(&self) -> FetchSnapshot {
        self.shared.lock().state.snapshot()
    }

    pub fn selection(&self) -> Selection {
        self.shared.lock().selection.clone()
    }

    pub fn options(&self) -> FetchOptions {
        self.options
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.lifetime.is_cancelled()
    }

    /// Whether a refresh timer is currently running
    pub fn timer_active(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Replace the selection.
    ///
    /// An unchanged selection is a no-op. Otherwise in-flight requests are
    /// superseded, a new cycle is spawned when the selection is fetchable,
    /// and the refresh timer restarts its period.
    pub fn set_selection(&mut self, selection: Selection) -> Option<JoinHandle<CycleOutcome>> {
        {
            let mut core = self.shared.lock();
            if core.selection == selection {
                return None;
            }
            core.selection = selection;
            self.shared.invalidate(&mut core);
        }

        let handle = self.spawn_cycle();
        self.rearm_timer();
        handle
    }

    /// Apply new switches. Disabling supersedes in-flight requests;
    /// enabling from disabled starts a cycle.
    pub fn set_options(&mut self, options: FetchOptions) -> Option<JoinHandle<CycleOutcome>> {
        if options == self.options {
            return None;
        }

        let was_enabled = self.options.enabled;
        self.options = options;

        {
            let mut core = self.shared.lock();
            core.enabled = options.enabled;
            if !options.enabled {
                self.shared.invalidate(&mut core);
            }
        }

        self.rearm_timer();

        if options.enabled && !was_enabled {
            self.spawn_cycle()
        } else {
            None
        }
    }

    /// Run one cycle now and wait for it.
    pub async fn refetch(&self) -> CycleOutcome {
        self.shared.cycle().await
    }

    /// Cancel the timer and ignore any response still in flight.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.shared.lifetime.cancel();
        debug!("Fetch orchestrator shut down");
    }

    fn spawn_cycle(&self) -> Option<JoinHandle<CycleOutcome>> {
        let (seq, query) = self.shared.begin()?;
        let shared = Arc::clone(&self.shared);
        Some(tokio::spawn(async move { shared.run(seq, query).await }))
    }

    fn rearm_timer(&mut self) {
        self.timer = None;

        if self.shared.lifetime.is_cancelled() {
            return;
        }

        if let Some(period) = self.options.refresh_period() {
            let timer = RefreshTimer::start(Arc::clone(&self.shared), period);
            debug!("Refresh every {}ms", timer.period().as_millis());
            self.timer = Some(timer);
        }
    }
}

impl Drop for FetchOrchestrator {
    fn drop(&mut self) {
        self.shared.lifetime.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ComparisonSource;
    use crate::types::{BenchError, ComparisonMatrix, Criterion, Entity, SourceRecord};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn remote_for(query: &ComparisonQuery) -> FetchResult {
        let mut matrix = ComparisonMatrix::new();
        for bank in query.banks.split(',') {
            matrix.set(bank, "cost", true);
        }
        FetchResult {
            matrix,
            sources: vec![SourceRecord::new(Some(1), "Banki.ru", "https://banki.ru")],
            fetched_at: Some(Utc::now()),
            is_synthetic: false,
            ..FetchResult::empty()
        }
    }

    /// Answers from a script, then with a result for the queried banks
    #[derive(Default)]
    struct ScriptedSource {
        calls: AtomicUsize,
        script: Mutex<VecDeque<std::result::Result<(), String>>>,
    }

    impl ScriptedSource {
        fn with_script(steps: Vec<std::result::Result<(), String>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(steps.into()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ComparisonSource for ScriptedSource {
        async fn fetch_comparison(&self, query: &ComparisonQuery) -> Result<FetchResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
            match step {
                Ok(()) => Ok(remote_for(query)),
                Err(message) => Err(BenchError::Transport(message)),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Holds each request until its gate (keyed by banks) is released
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    }

    impl GatedSource {
        fn gate(&self, banks: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(banks.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl ComparisonSource for GatedSource {
        async fn fetch_comparison(&self, query: &ComparisonQuery) -> Result<FetchResult> {
            let gate = self.gates.lock().unwrap().remove(&query.banks);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(remote_for(query))
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    fn selection(banks: &[&str]) -> Selection {
        Selection::new(
            banks.iter().map(|id| Entity::new(*id, *id)).collect::<Vec<_>>(),
            vec![Criterion::new("cost", "Cost")],
            "deposits",
        )
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_call() {
        let source = Arc::new(ScriptedSource::default());
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let handle = orchestrator.set_selection(Selection::new(
            vec![],
            vec![Criterion::new("cost", "Cost")],
            "deposits",
        ));

        assert!(handle.is_none());
        assert_eq!(orchestrator.refetch().await, CycleOutcome::Skipped);
        assert_eq!(source.calls(), 0);

        let snapshot = orchestrator.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.phase, FetchPhase::Idle);
    }

    #[tokio::test]
    async fn test_disabled_makes_no_call() {
        let source = Arc::new(ScriptedSource::default());
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::disabled());

        assert!(orchestrator.set_selection(selection(&["sber", "vtb"])).is_none());
        assert_eq!(orchestrator.refetch().await, CycleOutcome::Skipped);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_selection_change_fetches_once() {
        let source = Arc::new(ScriptedSource::default());
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let handle = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        assert!(orchestrator.snapshot().loading);
        assert_eq!(handle.await.unwrap(), CycleOutcome::Applied);

        let snapshot = orchestrator.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        assert!(!snapshot.is_mock());
        assert!(snapshot.data().get("vtb", "cost"));
        assert_eq!(source.calls(), 1);

        // Same selection again is not a dependency change
        assert!(orchestrator.set_selection(selection(&["sber", "vtb"])).is_none());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_retains_previous_data() {
        let source = Arc::new(ScriptedSource::with_script(vec![
            Ok(()),
            Err("network unreachable".into()),
        ]));
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let handle = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        assert_eq!(handle.await.unwrap(), CycleOutcome::Applied);
        let before = orchestrator.snapshot();

        let outcome = orchestrator.refetch().await;
        assert_eq!(outcome, CycleOutcome::Failed("network unreachable".into()));

        let after = orchestrator.snapshot();
        assert_eq!(after.error.as_deref(), Some("network unreachable"));
        assert!(after.is_mock());
        assert!(!after.loading);
        assert_eq!(after.data(), before.data());
        assert_eq!(after.sources(), before.sources());
        assert_eq!(
            after.phase,
            FetchPhase::Settled {
                outcome: Settled::Failure
            }
        );
    }

    #[tokio::test]
    async fn test_refetch_after_failure_clears_error() {
        let source = Arc::new(ScriptedSource::with_script(vec![Err("timeout".into())]));
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let handle = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        assert!(matches!(handle.await.unwrap(), CycleOutcome::Failed(_)));
        assert!(orchestrator.snapshot().data().is_empty());

        assert_eq!(orchestrator.refetch().await, CycleOutcome::Applied);
        let snapshot = orchestrator.snapshot();
        assert!(snapshot.error.is_none());
        assert!(!snapshot.is_mock());
    }

    #[tokio::test]
    async fn test_late_response_of_superseded_selection_discarded() {
        let source = Arc::new(GatedSource::default());
        let release_a = source.gate("sber,vtb");
        let release_b = source.gate("alpha,tinkoff");
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let first = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        let second = orchestrator.set_selection(selection(&["alpha", "tinkoff"])).unwrap();

        release_b.send(()).unwrap();
        assert_eq!(second.await.unwrap(), CycleOutcome::Applied);

        release_a.send(()).unwrap();
        assert_eq!(first.await.unwrap(), CycleOutcome::Discarded);

        let snapshot = orchestrator.snapshot();
        assert!(snapshot.data().contains_entity("alpha"));
        assert!(!snapshot.data().contains_entity("sber"));
    }

    #[tokio::test]
    async fn test_early_response_of_superseded_selection_discarded() {
        let source = Arc::new(GatedSource::default());
        let release_a = source.gate("sber,vtb");
        let release_b = source.gate("alpha,tinkoff");
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let first = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        let second = orchestrator.set_selection(selection(&["alpha", "tinkoff"])).unwrap();

        release_a.send(()).unwrap();
        assert_eq!(first.await.unwrap(), CycleOutcome::Discarded);
        assert!(orchestrator.snapshot().loading);

        release_b.send(()).unwrap();
        assert_eq!(second.await.unwrap(), CycleOutcome::Applied);
        assert!(orchestrator.snapshot().data().contains_entity("tinkoff"));
    }

    #[tokio::test]
    async fn test_disable_suppresses_in_flight_result() {
        let source = Arc::new(GatedSource::default());
        let release = source.gate("sber,vtb");
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let handle = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        orchestrator.set_options(FetchOptions::disabled());
        assert_eq!(orchestrator.snapshot().phase, FetchPhase::Idle);

        release.send(()).unwrap();
        assert_eq!(handle.await.unwrap(), CycleOutcome::Discarded);
        assert!(orchestrator.snapshot().data().is_empty());
    }

    #[tokio::test]
    async fn test_enabling_triggers_cycle() {
        let source = Arc::new(ScriptedSource::default());
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::disabled());
        orchestrator.set_selection(selection(&["sber", "vtb"]));

        let handle = orchestrator.set_options(FetchOptions::default()).unwrap();
        assert_eq!(handle.await.unwrap(), CycleOutcome::Applied);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_suppresses_in_flight_result() {
        let source = Arc::new(GatedSource::default());
        let release = source.gate("sber,vtb");
        let mut orchestrator = FetchOrchestrator::new(source.clone(), FetchOptions::default());

        let handle = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        orchestrator.shutdown();
        let _ = release.send(());

        assert_eq!(handle.await.unwrap(), CycleOutcome::Discarded);
        assert!(orchestrator.is_shut_down());
        assert_eq!(orchestrator.refetch().await, CycleOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_subscribers_see_settled_snapshot() {
        let source = Arc::new(ScriptedSource::default());
        let mut orchestrator = FetchOrchestrator::new(source, FetchOptions::default());
        let mut updates = orchestrator.subscribe();

        let handle = orchestrator.set_selection(selection(&["sber", "vtb"])).unwrap();
        handle.await.unwrap();

        updates.changed().await.unwrap();
        let snapshot = updates.borrow_and_update().clone();
        assert!(!snapshot.loading);
        assert!(snapshot.data().contains_entity("sber"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_timer_and_zero_interval_cancels() {
        let source = Arc::new(ScriptedSource::default());
        let mut orchestrator = FetchOrchestrator::new(
            source.clone(),
            FetchOptions::default().with_interval_ms(1000),
        );
        assert!(orchestrator.timer_active());

        orchestrator.set_selection(selection(&["sber", "vtb"]));
        tokio::time::sleep(Duration::from_millis(3500)).await;
        // Initial cycle plus ticks at 1s, 2s, 3s
        assert_eq!(source.calls(), 4);

        orchestrator.set_options(FetchOptions::default().with_interval_ms(0));
        assert!(!orchestrator.timer_active());

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_orchestrator_stops_timer() {
        let source = Arc::new(ScriptedSource::default());
        let mut orchestrator = FetchOrchestrator::new(
            source.clone(),
            FetchOptions::default().with_interval_ms(500),
        );
        orchestrator.set_selection(selection(&["sber", "vtb"]));
        tokio::time::sleep(Duration::from_millis(1200)).await;
        let calls = source.calls();
        assert_eq!(calls, 3);

        drop(orchestrator);
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(source.calls(), calls);
    }

    #[test]
    fn test_options_refresh_period() {
        assert_eq!(FetchOptions::default().refresh_period(), None);
        assert_eq!(
            FetchOptions::default().with_interval_ms(250).refresh_period(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(FetchOptions::disabled().with_interval_ms(250).refresh_period(), None);

        let config = FetchConfig {
            enabled: false,
            refetch_interval_ms: 1000,
        };
        assert_eq!(
            FetchOptions::from_config(&config),
            FetchOptions::disabled().with_interval_ms(1000)
        );
    }
}
