use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::job_runner::JobRunner;

/// Background loop that drains queued job items.
pub struct ExtractionWorker {
    runner: Arc<JobRunner>,
    poll_interval: Duration,
    batch_size: usize,
    shutdown: watch::Receiver<bool>,
}

impl ExtractionWorker {
    pub fn new(
        runner: Arc<JobRunner>,
        poll_interval: Duration,
        batch_size: usize,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            runner,
            poll_interval,
            batch_size: batch_size.max(1),
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            batch_size = self.batch_size,
            "Extraction worker started"
        );
        while !self.stopping() {
            let processed = self.poll_once().await;
            if processed == 0 && !self.idle().await {
                break;
            }
        }
        tracing::info!("Extraction worker stopped");
    }

    /// One batch of queued items, processed sequentially. Returns how many
    /// items this worker actually claimed.
    pub async fn poll_once(&self) -> usize {
        let items = match self
            .runner
            .job_repository()
            .list_queued(self.batch_size)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list queued items");
                return 0;
            }
        };

        let mut processed = 0;
        for item in &items {
            if self.stopping() {
                break;
            }
            match self.runner.process_item(item).await {
                Ok(Some(_)) => processed += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, item_id = %item.id.as_uuid(), "Item processing failed");
                }
            }
        }
        processed
    }

    fn stopping(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleeps one poll interval; `false` when shutdown was signalled meanwhile.
    async fn idle(&mut self) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(self.poll_interval) => true,
            changed = self.shutdown.changed() => changed.is_ok() && !*self.shutdown.borrow(),
        }
    }
}
