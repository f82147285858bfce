//! Bounded job queue decoupling webhook ingress from job execution.
//!
//! The webhook handler enqueues and returns; worker tasks drain the queue
//! and run each job to completion. The bound gives the ingress path
//! backpressure instead of unbounded fire-and-forget spawning.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::models::ChangeSet;
use crate::services::job::CommitEmissionsJob;

/// One scheduled unit of work: a push event's change-set for one repository.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub id: Uuid,
    pub repo_folder: PathBuf,
    pub changeset: ChangeSet,
    pub repo_name: String,
}

impl JobRequest {
    pub fn new(repo_folder: PathBuf, changeset: ChangeSet, repo_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            repo_folder,
            changeset,
            repo_name,
        }
    }
}

/// Submission errors surfaced to the ingress handler.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("job queue is full")]
    QueueFull,

    #[error("job queue is shut down")]
    Closed,
}

/// Handle for submitting jobs to the worker pool. Cheap to clone.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<JobRequest>,
}

impl JobQueue {
    /// Start `workers` worker tasks draining a queue of the given capacity.
    ///
    /// Jobs run to completion; there is no cancellation of in-flight jobs.
    /// A job failure is reported to the log sink and the worker moves on.
    pub fn start(job: Arc<CommitEmissionsJob>, workers: usize, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel::<JobRequest>(capacity);
        let rx = Arc::new(Mutex::new(rx));

        for worker_id in 0..workers.max(1) {
            let rx = rx.clone();
            let job = job.clone();
            tokio::spawn(async move {
                loop {
                    // Hold the receiver lock only while waiting, not while
                    // running the job, so workers process in parallel.
                    let request = { rx.lock().await.recv().await };
                    let Some(request) = request else {
                        break;
                    };

                    info!(
                        worker_id,
                        job_id = %request.id,
                        repo_name = %request.repo_name,
                        "job started"
                    );

                    match job
                        .run(&request.repo_folder, &request.changeset, &request.repo_name)
                        .await
                    {
                        Ok(result) => {
                            info!(
                                worker_id,
                                job_id = %request.id,
                                targets = result.len(),
                                "job completed"
                            );
                        }
                        Err(e) => {
                            // Best-effort delivery: this job's entry is
                            // dropped, later jobs are unaffected.
                            error!(
                                worker_id,
                                job_id = %request.id,
                                error = %e,
                                "job failed"
                            );
                        }
                    }
                }
            });
        }

        Self { tx }
    }

    /// Enqueue a job without blocking the caller.
    pub fn submit(&self, request: JobRequest) -> Result<(), SubmitError> {
        self.tx.try_send(request).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SubmitError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SubmitError::Closed,
        })
    }
}
