use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::pipeline::normalize::Metric;

/// One group produced by [`group_by`]: a key and its members in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K, T> {
    pub key: K,
    pub members: Vec<T>,
}

/// Groups items by a key function, preserving first-seen key order and the
/// input order of members within each group.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key_fn: F) -> Vec<Group<K, T>>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Group<K, T>> = Vec::new();
    for item in items {
        let key = key_fn(&item);
        match index.get(&key) {
            Some(&i) => groups[i].members.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    members: vec![item],
                });
            }
        }
    }
    groups
}

/// Summary statistics over the non-missing observations of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Number of non-missing observations.
    pub count: usize,
    /// Sum of non-missing observations.
    pub sum: f64,
    /// Arithmetic mean; missing when the group has no non-missing values.
    pub mean: Metric,
}

/// Computes count, sum, and mean over a stream of metric values.
///
/// Missing values are skipped; a group with nothing but missing values gets a
/// missing mean, never zero.
pub fn aggregate(values: impl IntoIterator<Item = Metric>) -> Aggregate {
    let mut count = 0usize;
    let mut sum = 0.0f64;
    for value in values {
        if let Some(v) = value.value() {
            count += 1;
            sum += v;
        }
    }
    let mean = if count == 0 {
        Metric::Missing
    } else {
        Metric::from_f64(sum / count as f64)
    };
    Aggregate { count, sum, mean }
}

/// Mean over metric values, skipping missing ones. Used for global averages
/// of per-subject derived metrics.
pub fn mean(values: impl IntoIterator<Item = Metric>) -> Metric {
    aggregate(values).mean
}

/// Percent change from a baseline: `(current - baseline) / baseline * 100`.
///
/// Missing when either side is missing or the baseline is zero, so a zero
/// denominator never surfaces as Infinity downstream.
pub fn percent_change(baseline: Metric, current: Metric) -> Metric {
    match (baseline.value(), current.value()) {
        (Some(a), Some(b)) if a != 0.0 => Metric::from_f64((b - a) / a * 100.0),
        _ => Metric::Missing,
    }
}

/// Compound annual growth rate over the first and last non-missing
/// observations of a (year, value) series: `((last/first)^(1/span) - 1) * 100`.
///
/// Missing when fewer than two distinct years carry values, when the span is
/// zero, or when the first value is not strictly positive.
pub fn cagr(series: &[(i32, Metric)]) -> Metric {
    let mut observed: Vec<(i32, f64)> = series
        .iter()
        .filter_map(|(year, value)| value.value().map(|v| (*year, v)))
        .collect();
    observed.sort_by_key(|(year, _)| *year);

    let (first_year, first) = match observed.first() {
        Some(&entry) => entry,
        None => return Metric::Missing,
    };
    let (last_year, last) = match observed.last() {
        Some(&entry) => entry,
        None => return Metric::Missing,
    };

    let span = last_year - first_year;
    if span == 0 || first <= 0.0 {
        return Metric::Missing;
    }

    // from_f64 routes a non-finite power (e.g. negative last value) to Missing
    Metric::from_f64(((last / first).powf(1.0 / span as f64) - 1.0) * 100.0)
}
