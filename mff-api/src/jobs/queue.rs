use shared_types::{BookingRequest, EventRequest, NewContactSubmission};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::NotificationDispatcher;

/// Work handed from a request handler to the background worker
#[derive(Debug, Clone)]
pub enum NotificationJob {
    EventRequest(EventRequest),
    Booking { id: i64, booking: BookingRequest },
    Contact { id: i64, submission: NewContactSubmission },
}

impl NotificationJob {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationJob::EventRequest(_) => "event_request",
            NotificationJob::Booking { .. } => "booking",
            NotificationJob::Contact { .. } => "contact",
        }
    }
}

#[derive(Debug)]
struct QueuedJob {
    id: Uuid,
    job: NotificationJob,
}

/// Sending half of the notification queue. Jobs run one at a time, in the
/// order they were accepted, after the HTTP response has gone out.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<QueuedJob>,
}

impl NotificationQueue {
    /// Starts the worker and returns the queue feeding it
    pub fn spawn(dispatcher: Arc<NotificationDispatcher>) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<QueuedJob>();

        let handle = tokio::spawn(async move {
            while let Some(queued) = receiver.recv().await {
                tracing::info!("Running {} notification job {}", queued.job.kind(), queued.id);
                let report = dispatcher.dispatch(&queued.job).await;
                report.log(queued.id);
            }
            tracing::info!("Notification queue closed");
        });

        (Self { sender }, handle)
    }

    /// Queue a job; the returned id shows up in the worker's log lines
    pub fn enqueue(&self, job: NotificationJob) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        self.sender
            .send(QueuedJob { id, job })
            .map_err(|_| anyhow::anyhow!("Notification worker is not running"))?;
        Ok(id)
    }
}
