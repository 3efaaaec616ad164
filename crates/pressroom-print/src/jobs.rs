// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-printer job taxonomy.
//
// One backing map holds every job keyed by descending job-id; two id sets
// index the active and completed jobs.  Every mutation keeps
// `all = active ∪ completed` with `active ∩ completed = ∅`, and all three
// views iterate newest first.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use pressroom_core::error::{CoreError, Result};
use pressroom_core::types::{JobId, WhichJobs};

/// What a client supplies when submitting a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub name: String,
    pub username: String,
    pub document_format: String,
}

impl Default for JobRequest {
    fn default() -> Self {
        Self {
            name: "Untitled".into(),
            username: "anonymous".into(),
            document_format: "application/octet-stream".into(),
        }
    }
}

/// A job owned by one printer.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub uuid: String,
    pub name: String,
    pub username: String,
    pub document_format: String,
    pub created_at: DateTime<Utc>,
    /// Set when the job moves to the completed view.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// The all / active / completed views over one printer's jobs.
#[derive(Debug)]
pub struct JobTaxonomy {
    jobs: BTreeMap<Reverse<JobId>, Job>,
    active: BTreeSet<Reverse<JobId>>,
    completed: BTreeSet<Reverse<JobId>>,
    next_job_id: u32,
}

impl Default for JobTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTaxonomy {
    /// Empty taxonomy whose first job gets id 1.
    pub fn new() -> Self {
        Self {
            jobs: BTreeMap::new(),
            active: BTreeSet::new(),
            completed: BTreeSet::new(),
            next_job_id: 1,
        }
    }

    /// The id the next inserted job will receive.
    pub fn next_job_id(&self) -> JobId {
        JobId(self.next_job_id)
    }

    /// Allocate an id and add the job to the all and active views.
    ///
    /// `uuid` is called with the allocated id to produce the `job-uuid`.
    pub fn insert(&mut self, request: JobRequest, uuid: impl FnOnce(JobId) -> String) -> JobId {
        let id = JobId(self.next_job_id);
        self.next_job_id += 1;

        let job = Job {
            id,
            uuid: uuid(id),
            name: request.name,
            username: request.username,
            document_format: request.document_format,
            created_at: Utc::now(),
            completed_at: None,
        };

        self.jobs.insert(Reverse(id), job);
        self.active.insert(Reverse(id));
        debug!(job_id = %id, "job added to taxonomy");
        id
    }

    /// Move an active job to the completed view.
    ///
    /// Completing a job twice is a caller error and is reported, not ignored.
    pub fn complete(&mut self, id: JobId) -> Result<()> {
        let Some(job) = self.jobs.get_mut(&Reverse(id)) else {
            return Err(CoreError::JobNotFound(id));
        };
        if !self.active.remove(&Reverse(id)) {
            return Err(CoreError::JobNotActive(id));
        }

        job.completed_at = Some(Utc::now());
        self.completed.insert(Reverse(id));
        debug!(job_id = %id, "job completed");
        Ok(())
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&Reverse(id))
    }

    /// Every job, newest first.
    pub fn all(&self) -> impl Iterator<Item = &Job> + '_ {
        self.jobs.values()
    }

    /// Jobs not yet completed, newest first.
    pub fn active(&self) -> impl Iterator<Item = &Job> + '_ {
        self.active.iter().filter_map(|id| self.jobs.get(id))
    }

    /// Completed jobs, newest first.
    pub fn completed(&self) -> impl Iterator<Item = &Job> + '_ {
        self.completed.iter().filter_map(|id| self.jobs.get(id))
    }

    /// Jobs matching a `which-jobs` selector, newest first.
    pub fn select(&self, which: WhichJobs) -> Vec<&Job> {
        match which {
            WhichJobs::All => self.all().collect(),
            WhichJobs::NotCompleted => self.active().collect(),
            WhichJobs::Completed => self.completed().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Drop every job.  The id allocator keeps counting so ids are never reused.
    pub fn clear(&mut self) {
        self.active.clear();
        self.completed.clear();
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> JobRequest {
        JobRequest {
            name: name.into(),
            ..JobRequest::default()
        }
    }

    fn insert(taxonomy: &mut JobTaxonomy, name: &str) -> JobId {
        taxonomy.insert(request(name), |id| format!("urn:uuid:test-{id}"))
    }

    fn ids<'a>(jobs: impl Iterator<Item = &'a Job>) -> Vec<u32> {
        jobs.map(|job| job.id.0).collect()
    }

    fn assert_partition(taxonomy: &JobTaxonomy) {
        let active: BTreeSet<u32> = ids(taxonomy.active()).into_iter().collect();
        let completed: BTreeSet<u32> = ids(taxonomy.completed()).into_iter().collect();
        let all: BTreeSet<u32> = ids(taxonomy.all()).into_iter().collect();

        assert!(active.is_disjoint(&completed));
        assert_eq!(active.union(&completed).copied().collect::<BTreeSet<_>>(), all);
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut taxonomy = JobTaxonomy::new();
        assert_eq!(taxonomy.next_job_id(), JobId(1));
        assert_eq!(insert(&mut taxonomy, "a"), JobId(1));
        assert_eq!(insert(&mut taxonomy, "b"), JobId(2));
        assert_eq!(taxonomy.next_job_id(), JobId(3));
    }

    #[test]
    fn insert_adds_to_all_and_active_only() {
        let mut taxonomy = JobTaxonomy::new();
        let id = insert(&mut taxonomy, "label");

        assert_eq!(ids(taxonomy.all()), vec![id.0]);
        assert_eq!(ids(taxonomy.active()), vec![id.0]);
        assert!(taxonomy.completed().next().is_none());
        assert_partition(&taxonomy);
    }

    #[test]
    fn complete_moves_job_to_completed() {
        let mut taxonomy = JobTaxonomy::new();
        let id = insert(&mut taxonomy, "label");
        taxonomy.complete(id).unwrap();

        assert_eq!(ids(taxonomy.all()), vec![id.0]);
        assert!(taxonomy.active().next().is_none());
        assert_eq!(ids(taxonomy.completed()), vec![id.0]);
        assert!(taxonomy.get(id).unwrap().is_completed());
        assert_partition(&taxonomy);
    }

    #[test]
    fn views_iterate_newest_first() {
        let mut taxonomy = JobTaxonomy::new();
        for name in ["one", "two", "three"] {
            insert(&mut taxonomy, name);
        }
        assert_eq!(ids(taxonomy.all()), vec![3, 2, 1]);
        assert_eq!(ids(taxonomy.active()), vec![3, 2, 1]);

        for id in [1, 2, 3] {
            taxonomy.complete(JobId(id)).unwrap();
        }
        assert_eq!(ids(taxonomy.all()), vec![3, 2, 1]);
        assert_eq!(ids(taxonomy.completed()), vec![3, 2, 1]);
    }

    #[test]
    fn partition_holds_through_mixed_operations() {
        let mut taxonomy = JobTaxonomy::new();
        for i in 0..10 {
            let id = insert(&mut taxonomy, &format!("job {i}"));
            if i % 3 == 0 {
                taxonomy.complete(id).unwrap();
            }
            assert_partition(&taxonomy);
        }
        assert_eq!(taxonomy.len(), 10);
        assert_eq!(taxonomy.completed_count(), 4);
        assert_eq!(taxonomy.active_count(), 6);
    }

    #[test]
    fn completing_twice_is_reported() {
        let mut taxonomy = JobTaxonomy::new();
        let id = insert(&mut taxonomy, "label");
        taxonomy.complete(id).unwrap();

        assert!(matches!(taxonomy.complete(id), Err(CoreError::JobNotActive(j)) if j == id));
        assert_eq!(taxonomy.completed_count(), 1);
        assert_partition(&taxonomy);
    }

    #[test]
    fn completing_unknown_job_is_not_found() {
        let mut taxonomy = JobTaxonomy::new();
        assert!(matches!(taxonomy.complete(JobId(9)), Err(CoreError::JobNotFound(_))));
    }

    #[test]
    fn select_matches_which_jobs() {
        let mut taxonomy = JobTaxonomy::new();
        let first = insert(&mut taxonomy, "first");
        insert(&mut taxonomy, "second");
        taxonomy.complete(first).unwrap();

        assert_eq!(ids(taxonomy.select(WhichJobs::All).into_iter()), vec![2, 1]);
        assert_eq!(ids(taxonomy.select(WhichJobs::NotCompleted).into_iter()), vec![2]);
        assert_eq!(ids(taxonomy.select(WhichJobs::Completed).into_iter()), vec![1]);
    }

    #[test]
    fn uuid_callback_sees_allocated_id() {
        let mut taxonomy = JobTaxonomy::new();
        insert(&mut taxonomy, "a");
        let id = insert(&mut taxonomy, "b");
        assert_eq!(taxonomy.get(id).unwrap().uuid, "urn:uuid:test-2");
    }

    #[test]
    fn clear_keeps_allocator_running() {
        let mut taxonomy = JobTaxonomy::new();
        insert(&mut taxonomy, "a");
        insert(&mut taxonomy, "b");
        taxonomy.clear();

        assert!(taxonomy.is_empty());
        assert_eq!(taxonomy.active_count(), 0);
        assert_eq!(insert(&mut taxonomy, "c"), JobId(3));
    }
}
