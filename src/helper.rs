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

//! Fixtures shared by the unit tests. Dates are relative to a frozen
//! "today" of 2000-01-01.

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use tempfile::TempDir;
use tempfile::tempdir;

use crate::db::Database;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::date::Date;
use crate::types::review::Outcome;
use crate::types::review::Review;

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

pub fn today() -> Date {
    Date::parse("2000-01-01").unwrap()
}

/// A date relative to `today()`. Negative values are in the future.
pub fn days_ago(days: i64) -> Date {
    if days >= 0 {
        today().sub_days(days as u64)
    } else {
        today().add_days(days.unsigned_abs())
    }
}

/// A card created `age` days ago, with reviews given as `(days ago, outcome)`.
pub fn make_card(age: i64, reviews: &[(i64, Outcome)]) -> Card {
    let id = CardId::new(NEXT_ID.fetch_add(1, Ordering::Relaxed));
    let mut card = Card::new(id, days_ago(age), format!("Q{id}"), format!("A{id}"));
    card.reviews = reviews
        .iter()
        .map(|(days, outcome)| Review::new(days_ago(*days), *outcome))
        .collect();
    card
}

pub fn card_with_tags(tags: &[&str]) -> Card {
    let mut card = make_card(1, &[]);
    card.tags = tags.iter().map(|tag| tag.to_string()).collect();
    card
}

/// An empty database in a temporary directory. The directory is deleted
/// when the returned handle is dropped.
pub fn create_tmp_database() -> Fallible<(TempDir, Database)> {
    let dir = tempdir()?;
    let path = dir.path().join("test.db");
    let db = Database::new(path.to_str().unwrap())?;
    Ok((dir, db))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_ago() {
        assert_eq!(days_ago(0), today());
        assert_eq!(days_ago(1), today().yesterday());
        assert_eq!(days_ago(-1), today().add_days(1));
    }

    #[test]
    fn test_make_card() {
        let a = make_card(3, &[(2, Outcome::Right)]);
        let b = make_card(3, &[]);
        assert_ne!(a.id, b.id);
        assert_eq!(a.creation_date, days_ago(3));
        assert_eq!(a.reviews, vec![Review::right(days_ago(2))]);
    }

    #[test]
    fn test_create_tmp_database() -> Fallible<()> {
        let (_dir, db) = create_tmp_database()?;
        assert_eq!(db.card_count()?, 0);
        Ok(())
    }
}
