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

use crate::clock::clock_from_arg;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::CardId;

pub fn add_card(
    directory: Option<String>,
    question: String,
    answer: String,
    tags: Vec<String>,
    date: Option<String>,
) -> Fallible<CardId> {
    if question.trim().is_empty() {
        return fail("question must not be empty.");
    }
    if tags.iter().any(|tag| tag.contains('\n')) {
        return fail("tags must not contain newlines.");
    }
    let mut collection = Collection::new(directory)?;
    let today = clock_from_arg(date)?.today();
    let card_id = collection.db.add_card(today, &question, &answer, &tags)?;
    println!("Added card {card_id}.");
    Ok(card_id)
}
