//! Interval job runner on top of Tokio.
//!
//! Each job gets its own task. A job first runs one full interval after it is added, then
//! on every tick. Ticks missed while a run is still in progress are skipped rather than
//! replayed in a burst.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[async_trait]
pub trait Job: Send + Sync {
    async fn run(&self);
}

/// Handle to one scheduled job.
#[derive(Debug)]
pub struct JobHandle {
    name: String,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl JobHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the job and waits for an in-flight run to finish.
    pub async fn remove(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        debug!("Job {} removed", self.name);
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    jobs: Vec<JobHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `job` on `interval`. Must be called inside a Tokio runtime.
    pub fn add_job(&mut self, name: &str, interval: Duration, job: Arc<dyn Job>) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run_job(name.to_string(), interval, job, stop_rx));

        debug!("Job {} scheduled every {:?}", name, interval);
        self.jobs.push(JobHandle {
            name: name.to_string(),
            stop_tx,
            task: Some(task),
        });
    }

    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name()).collect()
    }

    /// Removes a single job by name. Returns `false` when no such job exists.
    pub async fn remove_job(&mut self, name: &str) -> bool {
        match self.jobs.iter().position(|j| j.name == name) {
            Some(index) => {
                self.jobs.remove(index).remove().await;
                true
            }
            None => false,
        }
    }

    pub async fn shutdown(&mut self) {
        for job in self.jobs.drain(..) {
            job.remove().await;
        }
        debug!("Scheduler shut down");
    }
}

async fn run_job(
    name: String,
    interval: Duration,
    job: Arc<dyn Job>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    // 第一次 tick 會立即觸發，先略過
    ticker.tick().await;
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // 只會送出 true，通道關閉也視為停止
            _ = stop_rx.changed() => {
                debug!("Job {} received shutdown signal", name);
                break;
            }
            _ = ticker.tick() => {
                debug!("Running job {}", name);
                job.run().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl Job for CountingJob {
        async fn run(&self) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_runs_on_interval() {
        let job = Arc::new(CountingJob {
            runs: AtomicUsize::new(0),
        });
        let mut scheduler = Scheduler::new();
        scheduler.add_job("count", Duration::from_secs(10), job.clone());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 3);

        scheduler.shutdown().await;
        assert!(scheduler.job_names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_job_stops() {
        let job = Arc::new(CountingJob {
            runs: AtomicUsize::new(0),
        });
        let mut scheduler = Scheduler::new();
        scheduler.add_job("count", Duration::from_secs(1), job.clone());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(scheduler.remove_job("count").await);
        let runs = job.runs.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), runs);
        assert!(!scheduler.remove_job("count").await);
    }
}
