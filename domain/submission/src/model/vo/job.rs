use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the scheduler assigned to an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the combined output/error log, known once the id is assigned.
    pub fn log_file_name(&self) -> String {
        format!("lsf_output-{}.log", self.0)
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobHandle {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Jobs reported by one poll of the scheduler's queue listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunningSet {
    jobs: HashSet<JobHandle>,
}

impl RunningSet {
    #[inline]
    pub fn contains(&self, job: &JobHandle) -> bool {
        self.jobs.contains(job)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// How many entries of `tracked` are currently running. A handle listed
    /// twice counts twice.
    pub fn count_tracked(&self, tracked: &[JobHandle]) -> usize {
        tracked.iter().filter(|job| self.contains(job)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobHandle> {
        self.jobs.iter()
    }
}

impl FromIterator<JobHandle> for RunningSet {
    fn from_iter<T: IntoIterator<Item = JobHandle>>(iter: T) -> Self {
        Self {
            jobs: iter.into_iter().collect(),
        }
    }
}
