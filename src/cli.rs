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

use clap::Parser;

use crate::cmd::add::add_card;
use crate::cmd::drill::start_drill;
use crate::cmd::hide::hide_card;
use crate::cmd::init::init_collection;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_collection_stats;
use crate::error::Fallible;
use crate::types::card::CardId;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Create a collection: the card database and a default configuration.
    Init {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Add a card.
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        /// A tag for the card. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
        /// Override the creation date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
    /// Drill the cards due today.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Pretend today is this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
        /// Also drill hidden cards.
        #[arg(long, default_value_t = false)]
        review_hidden: bool,
    },
    /// Hide a card, so it is no longer drilled.
    Hide {
        card_id: i64,
        /// Make the card visible again.
        #[arg(long, default_value_t = false)]
        unhide: bool,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Print collection statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        /// Compute today's buckets as of this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Init { directory } => init_collection(directory),
        Command::Add {
            question,
            answer,
            tags,
            directory,
            date,
        } => {
            add_card(directory, question, answer, tags, date)?;
            Ok(())
        }
        Command::Drill {
            directory,
            date,
            review_hidden,
        } => start_drill(directory, date, review_hidden),
        Command::Hide {
            card_id,
            unhide,
            directory,
        } => hide_card(directory, CardId::new(card_id), unhide),
        Command::Stats {
            directory,
            format,
            date,
        } => print_collection_stats(directory, format, date),
    }
}
