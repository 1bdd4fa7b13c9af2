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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::date::Date;
use crate::types::grade::Grade;
use crate::types::review::Outcome;
use crate::types::review::Review;

/// The number of days to wait before reviewing a card of the given level
/// again: `2^level`.
pub fn delta_days(level: u32) -> u64 {
    1u64.checked_shl(level).unwrap_or(u64::MAX)
}

/// The date a card reviewed on `date` at the given level is due again.
pub fn expected_review_date(date: Date, level: u32) -> Date {
    date.add_days(delta_days(level))
}

/// Compute a card's grade as of `today` from its review history.
///
/// With `ignore_today_answers`, reviews dated today are discarded first,
/// which gives the grade the card had before today's session.
///
/// Fails if the reviews are not sorted by date.
pub fn assess(card: &Card, today: Date, ignore_today_answers: bool) -> Fallible<Grade> {
    let reviews: Vec<&Review> = card
        .reviews
        .iter()
        .filter(|review| !(ignore_today_answers && review.date == today))
        .collect();

    if reviews.windows(2).any(|pair| pair[0].date > pair[1].date) {
        return fail(format!("reviews of card {} are not sorted by date", card.id));
    }

    // Cards created today (or in the future) are left alone until tomorrow.
    if card.creation_date >= today {
        return Ok(Grade::DontReviewToday);
    }

    if let Some(last) = reviews.last() {
        if last.outcome == Outcome::Wrong && last.date == today.yesterday() {
            return Ok(Grade::WrongYesterday);
        }
        if last.outcome == Outcome::Right && last.date == today {
            return Ok(Grade::ReviewedTodayRight);
        }
    }

    let mut level: u32 = 0;
    let mut expected = expected_review_date(card.creation_date, level);
    for review in reviews.iter() {
        if review.date > today {
            log::warn!(
                "Card {} has a review dated {}, which is in the future. Ignoring it.",
                card.id,
                review.date
            );
            continue;
        }
        match review.outcome {
            Outcome::Right => {
                // Premature right answers don't count.
                if review.date >= expected {
                    level = level.saturating_add(1);
                    expected = expected_review_date(review.date, level);
                }
            }
            Outcome::Wrong => {
                level = 0;
                expected = expected_review_date(review.date, level);
            }
        }
    }

    if expected > today {
        Ok(Grade::DontReviewToday)
    } else if reviews.is_empty() {
        Ok(Grade::NeverReviewed)
    } else {
        Ok(Grade::Level(level))
    }
}
