//! In-memory job registry shared by the submission path and the orchestrator.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::job::{Job, JobParams, JobStatus, JobUpdate};

/// Concurrency-safe store of job records, keyed by identifier.
///
/// One registry per running process, constructed at startup and passed to
/// whichever component needs it. Mutations to a job are serialized through
/// the registry lock; reads hand out cloned snapshots so observers never see
/// a partially merged record.
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    fn read_jobs(&self) -> RwLockReadGuard<'_, HashMap<String, Job>> {
        match self.jobs.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job registry lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write_jobs(&self) -> RwLockWriteGuard<'_, HashMap<String, Job>> {
        match self.jobs.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job registry lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Creates a fresh pending job and returns the full record.
    pub fn create(&self, params: JobParams) -> Job {
        let job = Job::new(params);
        self.write_jobs().insert(job.job_id.clone(), job.clone());
        job
    }

    /// Returns a snapshot of a job by ID.
    pub fn get(&self, job_id: &str) -> Option<Job> {
        self.read_jobs().get(job_id).cloned()
    }

    /// Merges a partial update into the stored record and returns the merged
    /// snapshot, or `None` when the identifier is unknown.
    ///
    /// Log entries in `update.append_logs` are concatenated onto the stored
    /// trail — an update can only ever grow the log.
    pub fn update(&self, job_id: &str, update: JobUpdate) -> Option<Job> {
        let mut jobs = self.write_jobs();
        let job = jobs.get_mut(job_id)?;
        job.apply_update(update);
        Some(job.clone())
    }

    /// Returns all jobs, newest first.
    pub fn list_all(&self) -> Vec<Job> {
        let jobs = self.read_jobs();
        let mut result: Vec<Job> = jobs.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    /// Returns the count of jobs by status: (pending, processing, completed, failed).
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let jobs = self.read_jobs();
        let mut pending = 0;
        let mut processing = 0;
        let mut completed = 0;
        let mut failed = 0;

        for job in jobs.values() {
            match job.status {
                JobStatus::Pending => pending += 1,
                JobStatus::Processing => processing += 1,
                JobStatus::Completed => completed += 1,
                JobStatus::Failed => failed += 1,
            }
        }

        (pending, processing, completed, failed)
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
