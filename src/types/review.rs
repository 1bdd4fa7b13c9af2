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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;
use crate::types::date::Date;

/// The outcome of a review.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Right,
    Wrong,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Right => "good",
            Outcome::Wrong => "bad",
        }
    }
}

impl TryFrom<String> for Outcome {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "good" => Ok(Outcome::Right),
            "bad" => Ok(Outcome::Wrong),
            _ => fail(format!("invalid review result: {value}")),
        }
    }
}

impl ToSql for Outcome {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Outcome {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Outcome::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A single dated outcome recorded against a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Review {
    pub date: Date,
    pub outcome: Outcome,
}

impl Review {
    pub fn new(date: Date, outcome: Outcome) -> Self {
        Self { date, outcome }
    }

    pub fn right(date: Date) -> Self {
        Self::new(date, Outcome::Right)
    }

    pub fn wrong(date: Date) -> Self {
        Self::new(date, Outcome::Wrong)
    }
}
