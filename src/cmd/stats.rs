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

use clap::ValueEnum;
use serde::Serialize;

use crate::clock::clock_from_arg;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::professor::buckets::BucketScheduler;
use crate::professor::buckets::BucketSummary;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_collection_stats(
    directory: Option<String>,
    format: StatsFormat,
    date: Option<String>,
) -> Fallible<()> {
    let stats = collection_stats(&Collection::new(directory)?, date)?;
    println!("{}", render_stats(&stats, format)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    card_count: usize,
    hidden_count: usize,
    today_review_count: usize,
    buckets: Vec<BucketSummary>,
}

fn collection_stats(collection: &Collection, date: Option<String>) -> Fallible<Stats> {
    let today = clock_from_arg(date)?.today();
    let cards = collection.load_cards()?;
    let scheduler = BucketScheduler::new(
        &cards,
        today,
        &collection.config.long_term,
        &collection.config.tags,
        false,
    )?;
    Ok(Stats {
        card_count: collection.db.card_count()?,
        hidden_count: collection.db.hidden_count()?,
        today_review_count: collection.db.review_count_on(today)?,
        buckets: scheduler.summary(),
    })
}

fn render_stats(stats: &Stats, format: StatsFormat) -> Fallible<String> {
    match format {
        StatsFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
        StatsFormat::Text => {
            let mut lines = vec![
                format!("Cards: {}", stats.card_count),
                format!("Hidden: {}", stats.hidden_count),
                format!("Reviews today: {}", stats.today_review_count),
            ];
            for bucket in &stats.buckets {
                lines.push(format!(
                    "Level {}: {} pending, quota used {:.1}",
                    bucket.level, bucket.pending, bucket.quota_used
                ));
            }
            Ok(lines.join("\n"))
        }
    }
}
