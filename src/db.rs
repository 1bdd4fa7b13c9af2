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

use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::professor::observer::ReplyEvent;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::date::Date;
use crate::types::review::Outcome;
use crate::types::review::Review;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Add a new card to the database, returning its id.
    pub fn add_card(
        &mut self,
        creation_date: Date,
        question: &str,
        answer: &str,
        tags: &[String],
    ) -> Fallible<CardId> {
        let sql = "insert into cards (creation_date, question, answer, tags) values (?, ?, ?, ?) returning card_id;";
        let tx = self.conn.transaction()?;
        let card_id: CardId = tx.query_row(
            sql,
            (creation_date, question.trim(), answer.trim(), tags.join("\n")),
            |row| row.get(0),
        )?;
        tx.commit()?;
        log::debug!("Added card {card_id}.");
        Ok(card_id)
    }

    /// Load every card, hidden or not, with its reviews sorted by date.
    pub fn load_cards(&self) -> Fallible<Vec<Card>> {
        let mut reviews = self.load_reviews()?;
        let sql = "select card_id, creation_date, hidden, question, answer, tags from cards order by card_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            let card_id: CardId = row.get(0)?;
            let question: String = row.get(3)?;
            let answer: String = row.get(4)?;
            let tags: String = row.get(5)?;
            let mut card = Card::new(card_id, row.get(1)?, question, answer);
            card.hidden = row.get(2)?;
            card.tags = split_tags(&tags);
            card.reviews = reviews.remove(&card_id).unwrap_or_default();
            cards.push(card);
        }
        Ok(cards)
    }

    fn load_reviews(&self) -> Fallible<HashMap<CardId, Vec<Review>>> {
        let sql = "select card_id, review_date, result from reviews order by card_id, review_date, review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut reviews: HashMap<CardId, Vec<Review>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let card_id: CardId = row.get(0)?;
            let date: Date = row.get(1)?;
            let outcome: Outcome = row.get(2)?;
            reviews
                .entry(card_id)
                .or_default()
                .push(Review::new(date, outcome));
        }
        Ok(reviews)
    }

    /// Persist the replies of a session in a single transaction.
    pub fn save_replies(&mut self, events: &[ReplyEvent]) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let mut reviews = 0;
        for event in events {
            if let Some(review) = &event.review {
                insert_review(&tx, event.card_id, review)?;
                reviews += 1;
            }
            if event.hidden {
                update_hidden(&tx, event.card_id, true)?;
            }
        }
        tx.commit()?;
        log::debug!("Saved {reviews} reviews from {} replies.", events.len());
        Ok(())
    }

    pub fn set_hidden(&mut self, card_id: CardId, hidden: bool) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        update_hidden(&tx, card_id, hidden)?;
        tx.commit()?;
        Ok(())
    }

    pub fn card_count(&self) -> Fallible<usize> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from cards;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn hidden_count(&self) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(
            "select count(*) from cards where hidden = 1;",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// The number of reviews dated on the given day.
    pub fn review_count_on(&self, date: Date) -> Fallible<usize> {
        let sql = "select count(*) from reviews where substr(review_date, 1, 10) = ?;";
        let count: i64 = self.conn.query_row(sql, [date], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.lines()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

type ReviewId = i64;

fn insert_review(tx: &Transaction, card_id: CardId, review: &Review) -> Fallible<ReviewId> {
    let sql = "insert into reviews (card_id, review_date, result) values (?, ?, ?) returning review_id;";
    let review_id: ReviewId = tx.query_row(
        sql,
        (card_id, review.date, review.outcome),
        |row| row.get(0),
    )?;
    Ok(review_id)
}

fn update_hidden(tx: &Transaction, card_id: CardId, hidden: bool) -> Fallible<()> {
    let sql = "update cards set hidden = ? where card_id = ?;";
    let changed = tx.execute(sql, (hidden, card_id))?;
    if changed == 0 {
        return fail(format!("no card with id {card_id}"));
    }
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}
