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

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;

use serde::Serialize;

use crate::config::LongTermConfig;
use crate::error::Fallible;
use crate::professor::assess::assess;
use crate::professor::estimate::TagTables;
use crate::professor::estimate::estimate_difficulty;
use crate::professor::estimate::estimate_priority;
use crate::professor::sort::SortPolicy;
use crate::professor::sort::sort_bucket;
use crate::types::card::Card;
use crate::types::date::Date;
use crate::types::grade::BucketKey;
use crate::types::grade::Grade;

/// A scheduled card, with the session-scoped weights computed for it.
#[derive(Clone, Debug)]
pub struct BucketEntry {
    /// Index of the card in the session's card list.
    pub index: usize,
    pub priority: f64,
    pub difficulty: f64,
    pub recency: Date,
}

struct ActiveBucket {
    key: BucketKey,
    entries: VecDeque<BucketEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub level: BucketKey,
    pub pending: usize,
    pub quota_used: f64,
}

/// Partitions the due cards into grade buckets and hands them out lowest
/// grade first, moving on from a grade once its quota of right answers is
/// met.
pub struct BucketScheduler {
    /// Buckets not yet visited. The active bucket is not in here.
    buckets: BTreeMap<BucketKey, Vec<BucketEntry>>,
    /// Difficulty-weighted right answers per quota key. Only ever increases.
    quota_used: BTreeMap<BucketKey, f64>,
    max_cards_per_grade: f64,
    policy: SortPolicy,
    active: Option<ActiveBucket>,
}

impl BucketScheduler {
    pub fn new(
        cards: &[Card],
        today: Date,
        config: &LongTermConfig,
        tags: &TagTables,
        review_hidden_cards: bool,
    ) -> Fallible<Self> {
        let mut buckets: BTreeMap<BucketKey, Vec<BucketEntry>> = BTreeMap::new();
        let mut quota_used: BTreeMap<BucketKey, f64> = BTreeMap::new();
        for (index, card) in cards.iter().enumerate() {
            if card.hidden && !review_hidden_cards {
                continue;
            }
            let grade = assess(card, today, false)?;
            let difficulty = estimate_difficulty(card, &tags.difficulties);
            if grade == Grade::ReviewedTodayRight {
                // Charge today's earlier right answers to the grade the card
                // had before them, so restarting a session keeps the quotas.
                let before = assess(card, today, true)?;
                match before.quota_bucket() {
                    Some(key) => {
                        *quota_used.entry(key).or_insert(0.0) += difficulty;
                    }
                    None => {
                        log::debug!("Card {} was answered today but was not due.", card.id);
                    }
                }
            } else if let Some(key) = grade.bucket() {
                buckets.entry(key).or_default().push(BucketEntry {
                    index,
                    priority: estimate_priority(card, &tags.priorities),
                    difficulty,
                    recency: card.last_activity(),
                });
                quota_used.entry(key.quota_key()).or_insert(0.0);
            }
        }
        let mut scheduler = Self {
            buckets,
            quota_used,
            max_cards_per_grade: config.max_cards_per_grade,
            policy: config.priorities_per_level.clone(),
            active: None,
        };
        scheduler.switch();
        Ok(scheduler)
    }

    /// Move to the lowest remaining grade whose quota isn't met yet.
    pub fn switch(&mut self) {
        self.switch_once();
        while let Some(key) = self.active_key() {
            if self.quota_reached(key) {
                log::debug!("Quota of level {key} already met, skipping it.");
                self.switch_once();
            } else {
                break;
            }
        }
    }

    fn switch_once(&mut self) {
        self.active = self.buckets.pop_first().map(|(key, mut entries)| {
            sort_bucket(&mut entries, key, &self.policy);
            log::debug!("Switching to level {key} ({} cards).", entries.len());
            ActiveBucket {
                key,
                entries: entries.into(),
            }
        });
    }

    /// The entry at the front of the active bucket. Switches buckets first if
    /// the active one is empty or its quota is met.
    pub fn current(&mut self) -> Option<&BucketEntry> {
        let needs_switch = match &self.active {
            Some(active) => active.entries.is_empty() || self.quota_reached(active.key),
            None => false,
        };
        if needs_switch {
            self.switch();
        }
        self.active.as_ref().and_then(|active| active.entries.front())
    }

    /// Remove the entry at the front of the active bucket.
    pub fn pop_current(&mut self) -> Option<(BucketKey, BucketEntry)> {
        let active = self.active.as_mut()?;
        let entry = active.entries.pop_front()?;
        Some((active.key, entry))
    }

    /// Drop whatever is left of the active bucket.
    pub fn clear_active(&mut self) {
        if let Some(active) = self.active.as_mut() {
            log::debug!(
                "Skipping the {} remaining cards of level {}.",
                active.entries.len(),
                active.key
            );
            active.entries.clear();
        }
    }

    pub fn record_right(&mut self, key: BucketKey, difficulty: f64) {
        *self.quota_used.entry(key.quota_key()).or_insert(0.0) += difficulty;
    }

    pub fn active_key(&self) -> Option<BucketKey> {
        self.active.as_ref().map(|active| active.key)
    }

    /// The quota used by a bucket. The relearning bucket reports level 0's.
    pub fn quota_used(&self, key: BucketKey) -> f64 {
        self.quota_used.get(&key.quota_key()).copied().unwrap_or(0.0)
    }

    pub fn max_cards_per_grade(&self) -> f64 {
        self.max_cards_per_grade
    }

    fn quota_reached(&self, key: BucketKey) -> bool {
        self.quota_used(key) >= self.max_cards_per_grade
    }

    /// The number of cards still waiting in a bucket, active or not.
    pub fn pending(&self, key: BucketKey) -> usize {
        match &self.active {
            Some(active) if active.key == key => active.entries.len(),
            _ => self.buckets.get(&key).map(Vec::len).unwrap_or(0),
        }
    }

    /// Per-bucket progress, lowest bucket first.
    pub fn summary(&self) -> Vec<BucketSummary> {
        let keys: BTreeSet<BucketKey> = self
            .quota_used
            .keys()
            .chain(self.buckets.keys())
            .copied()
            .chain(self.active_key())
            .collect();
        keys.into_iter()
            .map(|key| BucketSummary {
                level: key,
                pending: self.pending(key),
                quota_used: self.quota_used(key),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::helper::make_card;
    use crate::helper::today;
    use crate::types::review::Outcome::Right;
    use crate::types::review::Outcome::Wrong;

    fn config(max: f64) -> LongTermConfig {
        LongTermConfig {
            max_cards_per_grade: max,
            ..LongTermConfig::default()
        }
    }

    fn scheduler(cards: &[Card], max: f64) -> BucketScheduler {
        BucketScheduler::new(cards, today(), &config(max), &TagTables::default(), false).unwrap()
    }

    #[test]
    fn test_empty() {
        let mut scheduler = scheduler(&[], 5.0);
        assert!(scheduler.current().is_none());
        assert_eq!(scheduler.active_key(), None);
        assert!(scheduler.summary().is_empty());
    }

    #[test]
    fn test_lowest_grade_first() {
        let cards = vec![
            make_card(10, &[(9, Wrong), (8, Right), (6, Right)]),
            make_card(3, &[]),
            make_card(10, &[(9, Right), (1, Wrong)]),
        ];
        let mut scheduler = scheduler(&cards, 5.0);
        assert_eq!(scheduler.active_key(), Some(BucketKey::Relearn));
        assert_eq!(scheduler.current().map(|entry| entry.index), Some(2));
        let summary = scheduler.summary();
        let levels: Vec<BucketKey> = summary.iter().map(|s| s.level).collect();
        assert_eq!(
            levels,
            vec![BucketKey::Relearn, BucketKey::Level(0), BucketKey::Level(2)]
        );
        assert!(summary.iter().all(|s| s.pending == 1 && s.quota_used == 0.0));
    }

    #[test]
    fn test_not_due_and_hidden_cards_are_excluded() {
        let mut hidden = make_card(3, &[]);
        hidden.hidden = true;
        let cards = vec![make_card(0, &[]), hidden];
        let mut scheduler = scheduler(&cards, 5.0);
        assert!(scheduler.current().is_none());

        let mut scheduler =
            BucketScheduler::new(&cards, today(), &config(5.0), &TagTables::default(), true)
                .unwrap();
        assert_eq!(scheduler.current().map(|entry| entry.index), Some(1));
    }

    #[test]
    fn test_quota_bootstrap() {
        let cards = vec![
            make_card(5, &[(0, Right)]),
            make_card(5, &[(1, Wrong), (0, Right)]),
            make_card(5, &[]),
        ];
        let scheduler = scheduler(&cards, 4.0);
        assert_eq!(scheduler.quota_used(BucketKey::Level(0)), 2.0);
        assert_eq!(scheduler.pending(BucketKey::Level(0)), 1);
        assert_eq!(scheduler.active_key(), Some(BucketKey::Level(0)));
    }

    #[test]
    fn test_quota_bootstrap_is_difficulty_weighted() {
        let mut hard = make_card(5, &[(0, Right)]);
        hard.tags = vec!["hard".to_string()];
        let cards = vec![hard, make_card(5, &[(4, Right), (0, Right)])];
        let tags = TagTables {
            priorities: HashMap::new(),
            difficulties: HashMap::from([("hard".to_string(), 2.5)]),
        };
        let scheduler =
            BucketScheduler::new(&cards, today(), &config(5.0), &tags, false).unwrap();
        assert_eq!(scheduler.quota_used(BucketKey::Level(0)), 2.5);
        assert_eq!(scheduler.quota_used(BucketKey::Level(1)), 1.0);
    }

    #[test]
    fn test_satisfied_grade_is_skipped() {
        let cards = vec![
            make_card(5, &[(0, Right)]),
            make_card(5, &[(0, Right)]),
            make_card(5, &[]),
            make_card(10, &[(9, Right)]),
        ];
        let mut scheduler = scheduler(&cards, 2.0);
        assert_eq!(scheduler.active_key(), Some(BucketKey::Level(1)));
        assert_eq!(scheduler.current().map(|entry| entry.index), Some(3));
    }

    #[test]
    fn test_switch_on_quota() {
        let cards = vec![
            make_card(5, &[]),
            make_card(5, &[]),
            make_card(10, &[(9, Right)]),
        ];
        let mut scheduler = scheduler(&cards, 1.0);
        assert_eq!(scheduler.active_key(), Some(BucketKey::Level(0)));
        let (key, entry) = scheduler.pop_current().unwrap();
        scheduler.record_right(key, entry.difficulty);
        assert_eq!(scheduler.current().map(|entry| entry.index), Some(2));
        assert_eq!(scheduler.active_key(), Some(BucketKey::Level(1)));
        // The unanswered level 0 card is dropped for the day.
        assert_eq!(scheduler.pending(BucketKey::Level(0)), 0);
    }

    #[test]
    fn test_clear_active() {
        let cards = vec![make_card(5, &[]), make_card(5, &[]), make_card(10, &[(9, Right)])];
        let mut scheduler = scheduler(&cards, 5.0);
        scheduler.clear_active();
        assert_eq!(scheduler.pending(BucketKey::Level(0)), 0);
        assert_eq!(scheduler.current().map(|entry| entry.index), Some(2));
    }

    fn drain(scheduler: &mut BucketScheduler) -> Vec<usize> {
        let mut order = Vec::new();
        while let Some(index) = scheduler.current().map(|entry| entry.index) {
            order.push(index);
            scheduler.pop_current();
        }
        order
    }

    fn tagged(mut card: Card, tags: &[&str]) -> Card {
        card.tags = tags.iter().map(|tag| tag.to_string()).collect();
        card
    }

    fn priorities() -> TagTables {
        TagTables {
            priorities: HashMap::from([
                ("important".to_string(), 3.0),
                ("archived".to_string(), -2.0),
            ]),
            difficulties: HashMap::new(),
        }
    }

    #[test]
    fn test_tag_priority_orders_bucket() {
        let cards = vec![
            make_card(10, &[(9, Right)]),
            tagged(make_card(10, &[(9, Right)]), &["archived", "important"]),
            tagged(make_card(10, &[(9, Right)]), &["important"]),
            tagged(make_card(10, &[(9, Right)]), &["other"]),
        ];
        let mut scheduler =
            BucketScheduler::new(&cards, today(), &config(5.0), &priorities(), false).unwrap();
        assert_eq!(scheduler.active_key(), Some(BucketKey::Level(1)));
        // A negative tag drags the card to the end even with a positive one.
        assert_eq!(drain(&mut scheduler), vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_level_zero_orders_by_recency_first() {
        let cards = vec![
            tagged(make_card(3, &[]), &["important"]),
            make_card(2, &[]),
            tagged(make_card(2, &[]), &["important"]),
            tagged(make_card(10, &[(9, Wrong), (4, Wrong)]), &["important"]),
        ];
        let mut scheduler =
            BucketScheduler::new(&cards, today(), &config(5.0), &priorities(), false).unwrap();
        assert_eq!(scheduler.active_key(), Some(BucketKey::Level(0)));
        // Most recent activity first; priority breaks ties.
        assert_eq!(drain(&mut scheduler), vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_relearn_draws_on_level_zero_quota() {
        let cards = vec![
            make_card(10, &[(9, Right), (1, Wrong)]),
            make_card(3, &[]),
            make_card(3, &[]),
        ];
        let mut scheduler = scheduler(&cards, 2.0);
        assert_eq!(scheduler.active_key(), Some(BucketKey::Relearn));
        let (key, entry) = scheduler.pop_current().unwrap();
        scheduler.record_right(key, entry.difficulty);
        assert_eq!(scheduler.quota_used(BucketKey::Level(0)), 1.0);
        assert_eq!(scheduler.quota_used(BucketKey::Relearn), 1.0);
        assert_eq!(scheduler.current().map(|entry| entry.index), Some(1));
        let (key, entry) = scheduler.pop_current().unwrap();
        scheduler.record_right(key, entry.difficulty);
        assert!(scheduler.current().is_none());
    }

    #[test]
    fn test_unsorted_reviews_fail() {
        let cards = vec![make_card(10, &[(2, Right), (4, Right)])];
        let result =
            BucketScheduler::new(&cards, today(), &config(5.0), &TagTables::default(), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_hidden_unsorted_card_is_not_assessed() {
        let mut card = make_card(10, &[(2, Right), (4, Right)]);
        card.hidden = true;
        let result =
            BucketScheduler::new(&[card], today(), &config(5.0), &TagTables::default(), false);
        assert!(result.is_ok());
    }
}
