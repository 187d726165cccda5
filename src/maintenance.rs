//! Background housekeeping: purge expired cache rows and sweep stale cooldowns.
//!
//! Both are best effort; readers already treat stale entries as absent.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::cache::TtlCache;
use crate::cooldown::CooldownGate;

/// Handle to the running sweep tasks. Dropping it aborts them; prefer `shutdown`.
pub struct Maintenance {
    stop: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Maintenance {
    /// Spawn the sweeps on the current tokio runtime.
    pub fn start(
        cache: TtlCache,
        cooldown: Arc<CooldownGate>,
        cache_every: Duration,
        cooldown_every: Duration,
    ) -> Self {
        let (stop, rx) = watch::channel(false);

        let cache_task = spawn_periodic("cache-purge", cache_every, rx.clone(), move || {
            let cache = cache.clone();
            async move {
                // Purging rewrites the snapshot file; keep it off the async workers
                match tokio::task::spawn_blocking(move || cache.purge_expired_now()).await {
                    Ok(Ok(n)) => log::info!("maintenance: purged {n} expired cache entries"),
                    Ok(Err(e)) => log::error!("maintenance: cache purge failed: {e}"),
                    Err(e) => log::error!("maintenance: cache purge task failed: {e}"),
                }
            }
        });

        let cooldown_task = spawn_periodic("cooldown-sweep", cooldown_every, rx, move || {
            let cooldown = cooldown.clone();
            async move {
                let n = cooldown.sweep();
                log::info!("maintenance: evicted {n} stale cooldown entries, {} remain", cooldown.len());
            }
        });

        Self { stop, tasks: vec![cache_task, cooldown_task] }
    }

    /// Signal both sweeps to stop and wait for them.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                log::warn!("maintenance: task ended abnormally: {e}");
            }
        }
        log::info!("maintenance: stopped");
    }
}

impl Drop for Maintenance {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn spawn_periodic<F, Fut>(name: &'static str, every: Duration, mut stop: watch::Receiver<bool>, mut job: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let every = every.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing is stale at startup
        ticker.tick().await;
        log::debug!("maintenance: {name} every {}s", every.as_secs());
        loop {
            tokio::select! {
                _ = ticker.tick() => job().await,
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    })
}
