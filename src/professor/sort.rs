// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::professor::buckets::BucketEntry;
use crate::types::grade::BucketKey;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// The card's tag priority.
    Tag,
    /// The card's most recent activity: creation or latest review.
    Date,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortStep {
    pub sort: SortKey,
    /// Sort descending.
    #[serde(default)]
    pub reverse: bool,
}

/// The sort steps applied to each bucket. Buckets without an entry of their
/// own use the default steps.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "HashMap<String, Vec<SortStep>>")]
pub struct SortPolicy {
    levels: HashMap<BucketKey, Vec<SortStep>>,
    default: Vec<SortStep>,
}

const BY_PRIORITY_DESC: SortStep = SortStep {
    sort: SortKey::Tag,
    reverse: true,
};

const BY_RECENCY_DESC: SortStep = SortStep {
    sort: SortKey::Date,
    reverse: true,
};

impl SortPolicy {
    pub fn steps_for(&self, key: BucketKey) -> &[SortStep] {
        self.levels.get(&key).unwrap_or(&self.default)
    }
}

impl Default for SortPolicy {
    fn default() -> Self {
        let mut levels = HashMap::new();
        levels.insert(BucketKey::Level(0), vec![BY_PRIORITY_DESC, BY_RECENCY_DESC]);
        Self {
            levels,
            default: vec![BY_PRIORITY_DESC],
        }
    }
}

impl TryFrom<HashMap<String, Vec<SortStep>>> for SortPolicy {
    type Error = ErrorReport;

    fn try_from(value: HashMap<String, Vec<SortStep>>) -> Result<Self, Self::Error> {
        let mut levels = HashMap::new();
        let mut default = vec![BY_PRIORITY_DESC];
        for (key, steps) in value {
            if key == "default" {
                default = steps;
            } else {
                levels.insert(BucketKey::parse(&key)?, steps);
            }
        }
        Ok(Self { levels, default })
    }
}

/// Order a bucket's cards according to the bucket's sort steps.
///
/// Each step is a stable sort of the whole bucket, applied in the order
/// listed, so the last step is the dominant key and earlier steps only
/// break its ties.
pub fn sort_bucket(entries: &mut [BucketEntry], key: BucketKey, policy: &SortPolicy) {
    for step in policy.steps_for(key) {
        match step.sort {
            SortKey::Tag => entries.sort_by(|a, b| {
                directed(a.priority.total_cmp(&b.priority), step.reverse)
            }),
            SortKey::Date => {
                entries.sort_by(|a, b| directed(a.recency.cmp(&b.recency), step.reverse))
            }
        }
    }
}

fn directed(ordering: Ordering, reverse: bool) -> Ordering {
    if reverse { ordering.reverse() } else { ordering }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::days_ago;

    fn entry(index: usize, priority: f64, age: i64) -> BucketEntry {
        BucketEntry {
            index,
            priority,
            difficulty: 1.0,
            recency: days_ago(age),
        }
    }

    fn order(entries: &[BucketEntry]) -> Vec<usize> {
        entries.iter().map(|entry| entry.index).collect()
    }

    #[test]
    fn test_default_policy_sorts_by_priority_desc() {
        let mut entries = vec![entry(0, 1.0, 5), entry(1, 3.0, 5), entry(2, 0.5, 5)];
        sort_bucket(&mut entries, BucketKey::Level(2), &SortPolicy::default());
        assert_eq!(order(&entries), vec![1, 0, 2]);
    }

    #[test]
    fn test_reverse_is_stable() {
        let mut entries = vec![entry(0, 1.0, 5), entry(1, 2.0, 5), entry(2, 1.0, 5)];
        sort_bucket(&mut entries, BucketKey::Level(1), &SortPolicy::default());
        assert_eq!(order(&entries), vec![1, 0, 2]);
    }

    #[test]
    fn test_level_zero_recency_dominates() {
        let mut entries = vec![
            entry(0, 3.0, 9),
            entry(1, 1.0, 2),
            entry(2, 2.0, 2),
            entry(3, 1.0, 4),
        ];
        sort_bucket(&mut entries, BucketKey::Level(0), &SortPolicy::default());
        // Most recent first; ties broken by priority.
        assert_eq!(order(&entries), vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_ascending_steps() {
        let mut levels = HashMap::new();
        levels.insert(
            BucketKey::Relearn,
            vec![SortStep {
                sort: SortKey::Date,
                reverse: false,
            }],
        );
        let policy = SortPolicy {
            levels,
            default: Vec::new(),
        };
        let mut entries = vec![entry(0, 1.0, 1), entry(1, 1.0, 7), entry(2, 1.0, 3)];
        sort_bucket(&mut entries, BucketKey::Relearn, &policy);
        assert_eq!(order(&entries), vec![1, 2, 0]);
        // No default steps: the order is left alone.
        let mut entries = vec![entry(0, 1.0, 1), entry(1, 9.0, 7)];
        sort_bucket(&mut entries, BucketKey::Level(3), &policy);
        assert_eq!(order(&entries), vec![0, 1]);
    }

    #[test]
    fn test_policy_from_map() -> Result<(), ErrorReport> {
        let mut map = HashMap::new();
        map.insert("1".to_string(), vec![BY_RECENCY_DESC]);
        let policy = SortPolicy::try_from(map)?;
        assert_eq!(policy.steps_for(BucketKey::Level(1)), &[BY_RECENCY_DESC]);
        assert_eq!(policy.steps_for(BucketKey::Level(0)), &[BY_PRIORITY_DESC]);

        let mut map = HashMap::new();
        map.insert("minus one".to_string(), vec![]);
        assert!(SortPolicy::try_from(map).is_err());
        Ok(())
    }
}
