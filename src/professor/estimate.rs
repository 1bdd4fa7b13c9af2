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

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::card::Card;

/// Priority of a tag missing from the priority table, and of untagged cards.
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// Difficulty of a card none of whose tags are in the difficulty table.
pub const DEFAULT_DIFFICULTY: f64 = 1.0;

/// Caller-supplied weights for tags.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagTables {
    pub priorities: HashMap<String, f64>,
    pub difficulties: HashMap<String, f64>,
}

/// A card's ordering weight within its bucket.
///
/// Every tag contributes its weight, with absent tags weighing
/// [`DEFAULT_PRIORITY`]. If any weight is negative the lowest one wins,
/// otherwise the highest one does.
pub fn estimate_priority(card: &Card, priorities: &HashMap<String, f64>) -> f64 {
    let weights: Vec<f64> = card
        .tags
        .iter()
        .map(|tag| priorities.get(tag).copied().unwrap_or(DEFAULT_PRIORITY))
        .collect();
    let min = weights.iter().copied().reduce(f64::min);
    let max = weights.iter().copied().reduce(f64::max);
    match (min, max) {
        (Some(min), _) if min < 0.0 => min,
        (_, Some(max)) => max,
        _ => DEFAULT_PRIORITY,
    }
}

/// How much one right answer to this card counts toward its grade's quota:
/// the highest weight among the card's tags found in the table.
pub fn estimate_difficulty(card: &Card, difficulties: &HashMap<String, f64>) -> f64 {
    card.tags
        .iter()
        .filter_map(|tag| difficulties.get(tag).copied())
        .reduce(f64::max)
        .unwrap_or(DEFAULT_DIFFICULTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::card_with_tags;

    fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(tag, weight)| (tag.to_string(), *weight))
            .collect()
    }

    #[test]
    fn test_untagged_card() {
        let card = card_with_tags(&[]);
        assert_eq!(estimate_priority(&card, &table(&[("maths", 3.0)])), 1.0);
        assert_eq!(estimate_difficulty(&card, &table(&[("maths", 3.0)])), 1.0);
    }

    #[test]
    fn test_unknown_tags_use_default() {
        let card = card_with_tags(&["foo", "bar"]);
        assert_eq!(estimate_priority(&card, &HashMap::new()), DEFAULT_PRIORITY);
        assert_eq!(estimate_difficulty(&card, &HashMap::new()), DEFAULT_DIFFICULTY);
    }

    #[test]
    fn test_priority_takes_max() {
        let priorities = table(&[("important", 3.0), ("superfluous", 0.5)]);
        let card = card_with_tags(&["superfluous", "important"]);
        assert_eq!(estimate_priority(&card, &priorities), 3.0);
        // An unknown tag still contributes the default weight.
        let card = card_with_tags(&["superfluous", "other"]);
        assert_eq!(estimate_priority(&card, &priorities), 1.0);
        let card = card_with_tags(&["superfluous"]);
        assert_eq!(estimate_priority(&card, &priorities), 0.5);
    }

    #[test]
    fn test_negative_priority_dominates() {
        let priorities = table(&[("important", 3.0), ("archived", -2.0), ("meh", -1.0)]);
        let card = card_with_tags(&["important", "meh", "archived"]);
        assert_eq!(estimate_priority(&card, &priorities), -2.0);
        let card = card_with_tags(&["important", "meh"]);
        assert_eq!(estimate_priority(&card, &priorities), -1.0);
    }

    #[test]
    fn test_difficulty_takes_max_of_matches() {
        let difficulties = table(&[("easy", 0.5), ("hard", 2.0)]);
        assert_eq!(estimate_difficulty(&card_with_tags(&["easy"]), &difficulties), 0.5);
        assert_eq!(
            estimate_difficulty(&card_with_tags(&["easy", "other", "hard"]), &difficulties),
            2.0
        );
        // Unmatched tags don't pull the difficulty back to the default.
        assert_eq!(
            estimate_difficulty(&card_with_tags(&["easy", "other"]), &difficulties),
            0.5
        );
    }
}
