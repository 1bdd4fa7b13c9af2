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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// A card's mastery level, as derived from its review history.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Grade {
    /// The last review was wrong, and it happened yesterday.
    WrongYesterday,
    /// The card is due and has never been reviewed.
    NeverReviewed,
    /// The last review was right, and it happened today.
    ReviewedTodayRight,
    /// The card is not due yet.
    DontReviewToday,
    /// The number of consecutive, timely right answers.
    Level(u32),
}

impl Grade {
    /// The bucket a card with this grade is scheduled in. Cards that are
    /// not due, or were already answered right today, have no bucket.
    pub fn bucket(self) -> Option<BucketKey> {
        match self {
            Grade::WrongYesterday => Some(BucketKey::Relearn),
            Grade::NeverReviewed => Some(BucketKey::Level(0)),
            Grade::Level(level) => Some(BucketKey::Level(level)),
            Grade::ReviewedTodayRight | Grade::DontReviewToday => None,
        }
    }

    /// The bucket whose quota a right answer given today is charged to.
    pub fn quota_bucket(self) -> Option<BucketKey> {
        match self {
            Grade::WrongYesterday | Grade::NeverReviewed => Some(BucketKey::Level(0)),
            Grade::Level(level) => Some(BucketKey::Level(level)),
            Grade::ReviewedTodayRight | Grade::DontReviewToday => None,
        }
    }
}

/// The key of a grade bucket. Buckets are traversed in ascending order, so
/// the relearning bucket comes first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BucketKey {
    Relearn,
    Level(u32),
}

impl BucketKey {
    /// The key whose quota this bucket draws on. Relearning cards are
    /// served first, but their right answers count toward level 0.
    pub fn quota_key(self) -> BucketKey {
        match self {
            BucketKey::Relearn => BucketKey::Level(0),
            key => key,
        }
    }

    pub fn parse(s: &str) -> Fallible<Self> {
        match s {
            "relearn" => Ok(BucketKey::Relearn),
            _ => match s.parse::<u32>() {
                Ok(level) => Ok(BucketKey::Level(level)),
                Err(_) => fail(format!("invalid level: {s}")),
            },
        }
    }
}

impl Display for BucketKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketKey::Relearn => write!(f, "relearn"),
            BucketKey::Level(level) => write!(f, "{level}"),
        }
    }
}

impl Serialize for BucketKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_order() {
        assert!(BucketKey::Relearn < BucketKey::Level(0));
        assert!(BucketKey::Level(0) < BucketKey::Level(1));
        assert!(BucketKey::Level(2) < BucketKey::Level(10));
    }

    #[test]
    fn test_sentinels_collapse() {
        assert_eq!(Grade::WrongYesterday.bucket(), Some(BucketKey::Relearn));
        assert_eq!(Grade::NeverReviewed.bucket(), Some(BucketKey::Level(0)));
        assert_eq!(Grade::ReviewedTodayRight.bucket(), None);
        assert_eq!(Grade::DontReviewToday.bucket(), None);
        assert_eq!(Grade::WrongYesterday.quota_bucket(), Some(BucketKey::Level(0)));
        assert_eq!(Grade::Level(3).quota_bucket(), Some(BucketKey::Level(3)));
    }

    #[test]
    fn test_relearn_shares_level_zero_quota() {
        assert_eq!(BucketKey::Relearn.quota_key(), BucketKey::Level(0));
        assert_eq!(BucketKey::Level(0).quota_key(), BucketKey::Level(0));
        assert_eq!(BucketKey::Level(3).quota_key(), BucketKey::Level(3));
        assert_eq!(
            Grade::WrongYesterday.bucket().map(BucketKey::quota_key),
            Grade::WrongYesterday.quota_bucket()
        );
    }

    #[test]
    fn test_parse() -> Fallible<()> {
        assert_eq!(BucketKey::parse("relearn")?, BucketKey::Relearn);
        assert_eq!(BucketKey::parse("4")?, BucketKey::Level(4));
        assert!(BucketKey::parse("-1").is_err());
        assert!(BucketKey::parse("default").is_err());
        Ok(())
    }
}
