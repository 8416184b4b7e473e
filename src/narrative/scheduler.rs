//! Debounced commentary with supersession
//!
//! Each `(scenario, kind)` pair has a generation counter. Submitting a new
//! request bumps it; a task whose generation is no longer current either
//! skips the call (superseded during debounce) or drops its result
//! (superseded while the call was in flight). In-flight calls are never
//! cancelled.

use super::{
    Commentary, CommentaryRequest, CommentaryService, NarrativeKind, Narrator,
    GENERIC_FAILURE_MESSAGE,
};
use crate::engine::Scenario;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error};

type Slot = (Scenario, NarrativeKind);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentaryOutcome {
    /// The latest request for its slot finished
    Ready(Commentary),
    /// A newer request for the same slot replaced this one
    Superseded,
}

pub struct CommentaryScheduler<N: ?Sized> {
    service: Arc<CommentaryService<N>>,
    debounce: Duration,
    generations: Arc<HashMap<Slot, AtomicU64>>,
}

impl<N: Narrator + ?Sized + 'static> CommentaryScheduler<N> {
    pub fn new(service: CommentaryService<N>, debounce: Duration) -> Self {
        let generations: HashMap<Slot, AtomicU64> = Scenario::ALL
            .iter()
            .flat_map(|scenario| {
                NarrativeKind::ALL
                    .iter()
                    .map(move |kind| ((*scenario, *kind), AtomicU64::new(0)))
            })
            .collect();

        Self {
            service: Arc::new(service),
            debounce,
            generations: Arc::new(generations),
        }
    }

    /// Queue a request, superseding any earlier one for the same scenario
    /// and kind
    pub fn submit(&self, request: CommentaryRequest) -> CommentaryHandle {
        let slot = (request.scenario, request.kind);
        let generation = self
            .generations
            .get(&slot)
            .map(|counter| counter.fetch_add(1, Ordering::SeqCst) + 1)
            .unwrap_or(0);

        let service = Arc::clone(&self.service);
        let generations = Arc::clone(&self.generations);
        let debounce = self.debounce;

        let task = tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }

            if !is_current(&generations, slot, generation) {
                debug!(
                    scenario = %slot.0,
                    kind = %slot.1,
                    generation = generation,
                    "Commentary superseded before dispatch"
                );
                return CommentaryOutcome::Superseded;
            }

            let commentary = service.commentary(&request).await;

            if is_current(&generations, slot, generation) {
                CommentaryOutcome::Ready(commentary)
            } else {
                debug!(
                    scenario = %slot.0,
                    kind = %slot.1,
                    generation = generation,
                    "Discarding stale commentary"
                );
                CommentaryOutcome::Superseded
            }
        });

        CommentaryHandle {
            slot,
            generation,
            generations: Arc::clone(&self.generations),
            task,
        }
    }

    /// Current generation for a slot, 0 before the first submission
    pub fn generation(&self, scenario: Scenario, kind: NarrativeKind) -> u64 {
        self.generations
            .get(&(scenario, kind))
            .map(|counter| counter.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

fn is_current(generations: &HashMap<Slot, AtomicU64>, slot: Slot, generation: u64) -> bool {
    generations
        .get(&slot)
        .map(|counter| counter.load(Ordering::SeqCst) == generation)
        .unwrap_or(false)
}

/// Pending commentary for one submission
pub struct CommentaryHandle {
    slot: Slot,
    generation: u64,
    generations: Arc<HashMap<Slot, AtomicU64>>,
    task: JoinHandle<CommentaryOutcome>,
}

impl CommentaryHandle {
    pub fn scenario(&self) -> Scenario {
        self.slot.0
    }

    pub fn kind(&self) -> NarrativeKind {
        self.slot.1
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer request has been submitted for this slot
    pub fn is_current(&self) -> bool {
        is_current(&self.generations, self.slot, self.generation)
    }

    /// Wait for the task to settle
    pub async fn outcome(self) -> CommentaryOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    scenario = %self.slot.0,
                    kind = %self.slot.1,
                    error = %e,
                    "Commentary task failed"
                );
                if self.slot.1.is_decorative() {
                    CommentaryOutcome::Ready(Commentary::Empty)
                } else {
                    CommentaryOutcome::Ready(Commentary::Unavailable(GENERIC_FAILURE_MESSAGE))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::engine::{compute_roi, RoiParameters, ScenarioReport};
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct EchoNarrator {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl Narrator for EchoNarrator {
        async fn generate(&self, request: &CommentaryRequest) -> Result<String, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            Ok(format!("{} #{}", request.kind, call))
        }
    }

    fn scheduler(
        debounce_ms: u64,
        delay_ms: u64,
    ) -> (CommentaryScheduler<EchoNarrator>, Arc<EchoNarrator>) {
        let narrator = Arc::new(EchoNarrator {
            calls: AtomicUsize::new(0),
            delay: Duration::from_millis(delay_ms),
        });
        let service = CommentaryService::new(narrator.clone(), RetryConfig::default());
        (
            CommentaryScheduler::new(service, Duration::from_millis(debounce_ms)),
            narrator,
        )
    }

    fn request(kind: NarrativeKind) -> CommentaryRequest {
        let report = ScenarioReport::Roi(compute_roi(&RoiParameters::default()));
        CommentaryRequest::new(&report, kind)
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_during_debounce_skips_call() {
        let (scheduler, narrator) = scheduler(1500, 10);

        let first = scheduler.submit(request(NarrativeKind::Analysis));
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = scheduler.submit(request(NarrativeKind::Analysis));

        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(first.outcome().await, CommentaryOutcome::Superseded);
        assert_eq!(
            second.outcome().await,
            CommentaryOutcome::Ready(Commentary::Text("analysis #1".to_string()))
        );
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_in_flight_discards_result() {
        let (scheduler, narrator) = scheduler(0, 1000);

        let first = scheduler.submit(request(NarrativeKind::ExecutiveSummary));
        // let the first call start
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = scheduler.submit(request(NarrativeKind::ExecutiveSummary));

        assert_eq!(first.outcome().await, CommentaryOutcome::Superseded);
        assert!(matches!(second.outcome().await, CommentaryOutcome::Ready(_)));
        // the in-flight call was not cancelled
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kinds_do_not_supersede_each_other() {
        let (scheduler, _narrator) = scheduler(100, 10);

        let analysis = scheduler.submit(request(NarrativeKind::Analysis));
        let graph = scheduler.submit(request(NarrativeKind::GraphTrend));

        assert!(matches!(analysis.outcome().await, CommentaryOutcome::Ready(_)));
        assert!(matches!(graph.outcome().await, CommentaryOutcome::Ready(_)));
        assert_eq!(scheduler.generation(Scenario::Roi, NarrativeKind::Analysis), 1);
        assert_eq!(scheduler.generation(Scenario::Rag, NarrativeKind::Analysis), 0);
    }
}
