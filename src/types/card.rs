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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::types::date::Date;
use crate::types::review::Review;

/// Opaque card identity, assigned by the database.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct CardId(i64);

impl CardId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl ToSql for CardId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for CardId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id: i64 = FromSql::column_result(value)?;
        Ok(CardId(id))
    }
}

#[derive(Clone, Debug)]
pub struct Card {
    pub id: CardId,
    pub creation_date: Date,
    /// Hidden cards are never scheduled.
    pub hidden: bool,
    /// Order matters only for tie-breaking lookups.
    pub tags: Vec<String>,
    /// Must be sorted ascending by date.
    pub reviews: Vec<Review>,
    pub question: String,
    pub answer: String,
}

impl Card {
    pub fn new(
        id: CardId,
        creation_date: Date,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            creation_date,
            hidden: false,
            tags: Vec::new(),
            reviews: Vec::new(),
            question: question.into().trim().to_string(),
            answer: answer.into().trim().to_string(),
        }
    }

    /// The latest date the card was touched: its creation date or its most
    /// recent review.
    pub fn last_activity(&self) -> Date {
        self.reviews
            .iter()
            .map(|review| review.date)
            .fold(self.creation_date, |acc, date| acc.max(date))
    }
}
