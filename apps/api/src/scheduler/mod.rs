//! Auto-Search Scheduler — one recurring apply timer per active user session.
//!
//! The registry is process-wide and not persisted: a restart drops every
//! timer, and sessions re-establish them on their next start. Starting a user
//! who already has a timer cancels and replaces it, so at most one timer per
//! user ever exists.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use crate::apply::engine::ApplyEngine;

/// Batch target each scheduled tick requests from the Apply Engine.
pub const TICK_BATCH_SIZE: u32 = 30;
const TICK_ROLE_FILTER: &str = "all";

#[derive(Clone)]
pub struct AutoSearchScheduler {
    engine: Arc<ApplyEngine>,
    period: Duration,
    timers: Arc<Mutex<HashMap<Uuid, watch::Sender<()>>>>,
}

impl AutoSearchScheduler {
    pub fn new(engine: Arc<ApplyEngine>, period: Duration) -> Self {
        Self {
            engine,
            period,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers a recurring apply timer for the user, replacing any existing
    /// one. The first tick fires one period after start, and ticks for a
    /// single user never overlap: each tick awaits the engine to completion
    /// before the next is scheduled.
    pub async fn start(&self, user_id: Uuid) {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        tokio::spawn(run_timer(
            Arc::clone(&self.engine),
            user_id,
            self.period,
            shutdown_rx,
        ));

        let mut timers = self.timers.lock().await;
        if let Some(previous) = timers.insert(user_id, shutdown_tx) {
            // The old timer sees the signal at its next tick boundary; a tick
            // already running finishes first.
            let _ = previous.send(());
            info!("Replaced existing auto-search timer for user {user_id}");
        } else {
            info!("Auto-search started for user {user_id}");
        }
    }

    /// Cancels the user's timer if present. A stop for a user with no timer
    /// is a no-op. Only future ticks are prevented; an in-flight tick runs to
    /// completion before the timer task exits.
    pub async fn stop(&self, user_id: Uuid) {
        let mut timers = self.timers.lock().await;
        if let Some(shutdown) = timers.remove(&user_id) {
            let _ = shutdown.send(());
            info!("Auto-search stopped for user {user_id}");
        }
    }

    pub async fn is_active(&self, user_id: Uuid) -> bool {
        self.timers.lock().await.contains_key(&user_id)
    }

    pub async fn active_count(&self) -> usize {
        self.timers.lock().await.len()
    }
}

/// The per-user timer loop. Shutdown is observed only between ticks: the
/// select races the interval against the signal, so a tick whose engine call
/// is already underway always completes before the loop can exit. The loop
/// also exits if the sender side is dropped.
async fn run_timer(
    engine: Arc<ApplyEngine>,
    user_id: Uuid,
    period: Duration,
    mut shutdown: watch::Receiver<()>,
) {
    let mut interval = tokio::time::interval(period);
    // interval's first tick completes immediately; consume it so the
    // schedule starts one period out.
    interval.tick().await;
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = interval.tick() => {
                match engine
                    .auto_apply(user_id, TICK_BATCH_SIZE, TICK_ROLE_FILTER)
                    .await
                {
                    Ok(report) => info!(
                        "Scheduled tick applied to {} jobs for user {user_id} \
                         (remaining quota {})",
                        report.applied.len(),
                        report.remaining_quota
                    ),
                    // Tick failures never cancel the schedule.
                    Err(e) => warn!("Scheduled tick failed for user {user_id}: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::scoring::RandomBandScorer;
    use crate::jobs::source::JobSourceClient;
    use sqlx::postgres::PgPoolOptions;

    // A lazy pool never connects unless a query runs; with a 2h period no
    // tick fires inside these tests, so no database is needed.
    fn make_engine() -> Arc<ApplyEngine> {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/jobpilot_test")
            .expect("lazy pool");
        Arc::new(ApplyEngine::new(
            pool,
            JobSourceClient::new(None),
            Arc::new(RandomBandScorer),
            30,
            "India".to_string(),
        ))
    }

    fn make_scheduler() -> AutoSearchScheduler {
        AutoSearchScheduler::new(make_engine(), Duration::from_millis(7_200_000))
    }

    #[tokio::test]
    async fn test_start_registers_one_timer() {
        let scheduler = make_scheduler();
        let user = Uuid::new_v4();
        scheduler.start(user).await;
        assert!(scheduler.is_active(user).await);
        assert_eq!(scheduler.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_start_twice_keeps_exactly_one_timer() {
        let scheduler = make_scheduler();
        let user = Uuid::new_v4();
        scheduler.start(user).await;
        scheduler.start(user).await;
        assert_eq!(scheduler.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_stop_removes_timer() {
        let scheduler = make_scheduler();
        let user = Uuid::new_v4();
        scheduler.start(user).await;
        scheduler.stop(user).await;
        assert!(!scheduler.is_active(user).await);
        assert_eq!(scheduler.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_stop_without_timer_is_noop() {
        let scheduler = make_scheduler();
        scheduler.stop(Uuid::new_v4()).await;
        assert_eq!(scheduler.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_timers_are_per_user() {
        let scheduler = make_scheduler();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        scheduler.start(a).await;
        scheduler.start(b).await;
        scheduler.stop(a).await;
        assert!(!scheduler.is_active(a).await);
        assert!(scheduler.is_active(b).await);
    }

    // Stopping must end the loop gracefully, never tear the task down at an
    // arbitrary await point. A graceful exit joins with Ok; an aborted task
    // would join with a cancellation error.
    #[tokio::test]
    async fn test_shutdown_signal_ends_loop_without_cancelling_task() {
        let (tx, rx) = watch::channel(());
        let handle = tokio::spawn(run_timer(
            make_engine(),
            Uuid::new_v4(),
            Duration::from_millis(7_200_000),
            rx,
        ));
        tx.send(()).expect("receiver alive");
        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    // The replace path drops the old sender once the new timer is installed;
    // the orphaned loop must also exit on its own.
    #[tokio::test]
    async fn test_dropped_sender_ends_loop() {
        let (tx, rx) = watch::channel(());
        let handle = tokio::spawn(run_timer(
            make_engine(),
            Uuid::new_v4(),
            Duration::from_millis(7_200_000),
            rx,
        ));
        drop(tx);
        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }
}
