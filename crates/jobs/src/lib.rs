use parking_lot::Mutex;
use sched_core::{OptimizationResult, OptimizeEnvelope, Optimizer};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;
use uuid::Uuid;

/// Finished jobs kept by default before the oldest is dropped.
pub const DEFAULT_RETAIN: usize = 1_000;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done { result: OptimizationResult },
    Failed { message: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Done { .. } | JobStatus::Failed { .. })
    }
}

/// Statuses by job id. Pending jobs are always kept; finished ones are
/// evicted oldest first once more than `retain` of them exist.
struct Board {
    statuses: HashMap<String, JobStatus>,
    finished: VecDeque<String>,
    retain: usize,
}

impl Board {
    fn new(retain: usize) -> Self {
        Self {
            statuses: HashMap::new(),
            finished: VecDeque::new(),
            retain,
        }
    }

    fn start(&mut self, id: &str) {
        if let Some(status) = self.statuses.get_mut(id) {
            *status = JobStatus::Running;
        }
    }

    fn finish(&mut self, id: String, status: JobStatus) {
        self.statuses.insert(id.clone(), status);
        self.finished.push_back(id);
        while self.finished.len() > self.retain {
            let Some(oldest) = self.finished.pop_front() else {
                break;
            };
            self.statuses.remove(&oldest);
            debug!(job = %oldest, "evicted finished job");
        }
    }
}

/// Runs each optimization on its own task; statuses stay queryable until
/// the retention limit pushes them out.
#[derive(Clone)]
pub struct InMemJobs<O: Optimizer> {
    board: Arc<Mutex<Board>>,
    optimizer: Arc<O>,
}

impl<O: Optimizer> InMemJobs<O> {
    pub fn new(optimizer: O) -> Self {
        Self::with_retention(optimizer, DEFAULT_RETAIN)
    }

    pub fn with_retention(optimizer: O, retain: usize) -> Self {
        Self {
            board: Arc::new(Mutex::new(Board::new(retain))),
            optimizer: Arc::new(optimizer),
        }
    }

    pub fn enqueue(&self, env: OptimizeEnvelope) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.board.lock().statuses.insert(id.clone(), JobStatus::Queued);
        tokio::spawn(run(self.board.clone(), self.optimizer.clone(), id.clone(), env));
        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.board.lock().statuses.get(id).cloned()
    }

    /// Number of statuses currently held, pending and finished.
    pub fn retained(&self) -> usize {
        self.board.lock().statuses.len()
    }
}

async fn run<O: Optimizer>(
    board: Arc<Mutex<Board>>,
    optimizer: Arc<O>,
    id: String,
    env: OptimizeEnvelope,
) {
    board.lock().start(&id);
    let status = match optimizer.optimize(env).await {
        Ok(result) => {
            info!(job = %id, score = result.score, success = result.success, "job done");
            JobStatus::Done { result }
        }
        Err(e) => {
            error!(?e, job = %id, "job failed");
            JobStatus::Failed {
                message: e.to_string(),
            }
        }
    };
    board.lock().finish(id, status);
}
