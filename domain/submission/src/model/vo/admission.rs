use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum number of tracked jobs allowed to run at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CeilingRepr", into = "CeilingRepr")]
pub enum Ceiling {
    Bounded(usize),
    /// Never block.
    #[default]
    Unbounded,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CeilingRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<CeilingRepr> for Ceiling {
    type Error = String;

    fn try_from(repr: CeilingRepr) -> Result<Self, Self::Error> {
        match repr {
            CeilingRepr::Count(n) => Ok(Self::Bounded(n)),
            CeilingRepr::Keyword(s) if s.eq_ignore_ascii_case("unbounded") => Ok(Self::Unbounded),
            CeilingRepr::Keyword(s) => Err(format!(
                "ceiling must be a non-negative integer or \"unbounded\", got {s:?}"
            )),
        }
    }
}

impl From<Ceiling> for CeilingRepr {
    fn from(ceiling: Ceiling) -> Self {
        match ceiling {
            Ceiling::Bounded(n) => Self::Count(n),
            Ceiling::Unbounded => Self::Keyword("unbounded".to_string()),
        }
    }
}

impl Ceiling {
    /// Whether `running` tracked jobs are too many to let a waiter through.
    #[inline]
    pub fn is_exceeded_by(&self, running: usize) -> bool {
        match self {
            Ceiling::Bounded(max) => running > *max,
            Ceiling::Unbounded => false,
        }
    }
}

/// How an admission controller gates its callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    #[serde(default)]
    pub ceiling: Ceiling,
    #[serde(default = "AdmissionPolicy::default_poll_interval")]
    pub poll_interval: Duration,
    /// Give up after this long. `None` waits as long as jobs keep running.
    #[serde(default)]
    pub max_wait: Option<Duration>,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            ceiling: Default::default(),
            poll_interval: Self::default_poll_interval(),
            max_wait: None,
        }
    }
}

impl AdmissionPolicy {
    pub fn default_poll_interval() -> Duration {
        Duration::from_secs(2)
    }

    pub fn new(ceiling: Ceiling) -> Self {
        Self {
            ceiling,
            ..Default::default()
        }
    }

    /// Full drain always means a ceiling of zero.
    pub fn effective_ceiling(&self, wait_for_full_drain: bool) -> Ceiling {
        if wait_for_full_drain {
            Ceiling::Bounded(0)
        } else {
            self.ceiling
        }
    }
}
