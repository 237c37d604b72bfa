use crate::config::Settings;
use jobs::InMemJobs;
use solver_heur::HeurOptimizer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<InMemJobs<HeurOptimizer>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let jobs = InMemJobs::with_retention(HeurOptimizer::new(), settings.jobs_retain);
        Self { jobs: Arc::new(jobs) }
    }
}
