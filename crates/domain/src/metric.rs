//! Metric value types.
//!
//! A [`Metric`] is a named score with a direction. Comparing two metrics of the
//! same kind is a total order on the value, oriented so that `a > b` always
//! means "a is the better score".

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Descriptor of a metric an evaluator produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    pub name: String,
    pub higher_is_better: bool,
}

impl MetricDescriptor {
    pub fn new(name: impl Into<String>, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            higher_is_better,
        }
    }

    /// Build a metric of this kind with the given value.
    pub fn with_value(&self, value: f64) -> Metric {
        Metric {
            name: self.name.clone(),
            higher_is_better: self.higher_is_better,
            value,
        }
    }
}

/// A single named score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    name: String,
    higher_is_better: bool,
    value: f64,
}

impl Metric {
    /// Create a metric where larger values are better.
    pub fn higher_is_better(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            higher_is_better: true,
            value,
        }
    }

    /// Create a metric where smaller values are better.
    pub fn lower_is_better(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            higher_is_better: false,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_higher_better(&self) -> bool {
        self.higher_is_better
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Strict comparison; equal values are not "better".
    pub fn is_better_than(&self, other: &Metric) -> bool {
        self.cmp(other) == Ordering::Greater
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Metric {}

impl PartialOrd for Metric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Metric {
    fn cmp(&self, other: &Self) -> Ordering {
        let raw = self.value.total_cmp(&other.value);
        if self.higher_is_better {
            raw
        } else {
            raw.reverse()
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(value={})", self.name, self.value)
    }
}

/// The tuple of metrics one evaluation produces.
///
/// Compared lexicographically, like a tuple. The first metric is the primary
/// score shown on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(Vec<Metric>);

impl MetricSet {
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self(metrics)
    }

    pub fn single(metric: Metric) -> Self {
        Self(vec![metric])
    }

    pub fn primary(&self) -> Option<&Metric> {
        self.0.first()
    }

    /// Value of the primary metric, if any.
    pub fn primary_value(&self) -> Option<f64> {
        self.primary().map(Metric::value)
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Metric> for MetricSet {
    fn from(metric: Metric) -> Self {
        Self::single(metric)
    }
}
