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

pub mod active_set;
pub mod assess;
pub mod buckets;
pub mod estimate;
pub mod ltm;
pub mod observer;
pub mod sort;

use crate::clock::Clock;
use crate::config::Config;
use crate::config::ProfessorKind;
use crate::error::Fallible;
use crate::professor::active_set::ActiveSetProfessor;
use crate::professor::ltm::LongTermProfessor;
use crate::professor::observer::ObserverId;
use crate::professor::observer::ReplyObserver;
use crate::professor::observer::ReplyObservers;
use crate::types::card::Card;
use crate::types::reply::Reply;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    /// No card has been handed out since the last reply.
    AwaitingCard,
    /// `current_card` returned a card, which is waiting for a reply.
    HasCard,
    /// Nothing left to review. Only `update_card_list` can revive the session.
    Exhausted,
}

/// A review session: decides which card to show next and records replies.
///
/// The session owns the cards for its whole duration. Replies mutate them in
/// place (appending reviews, setting the hidden flag); callers get them back
/// with `cards` or `into_cards`.
pub trait Professor {
    /// The card to show, or `None` if the session is over. Calling this
    /// repeatedly without replying returns the same card, but it may switch
    /// buckets internally.
    fn current_card(&mut self) -> Option<&Card>;

    /// Reply to the card last returned by `current_card`.
    fn submit_reply(&mut self, reply: Reply, hide: bool) -> Fallible<()>;

    /// Replace the session's cards and start scheduling from scratch.
    fn update_card_list(&mut self, cards: Vec<Card>, review_hidden_cards: bool) -> Fallible<()>;

    fn state(&self) -> SessionState;

    fn cards(&self) -> &[Card];

    fn into_cards(self: Box<Self>) -> Vec<Card>;

    fn observers(&mut self) -> &mut ReplyObservers;

    fn add_reply_observer(&mut self, observer: ReplyObserver) -> ObserverId {
        self.observers().add(observer)
    }

    fn remove_reply_observer(&mut self, id: ObserverId) -> bool {
        self.observers().remove(id)
    }
}

/// Build the professor selected by the configuration.
pub fn build_professor(
    config: &Config,
    cards: Vec<Card>,
    clock: Box<dyn Clock>,
    review_hidden_cards: bool,
) -> Fallible<Box<dyn Professor>> {
    match config.professor {
        ProfessorKind::LongTerm => {
            let professor = LongTermProfessor::new(
                cards,
                config.long_term.clone(),
                config.tags.clone(),
                clock,
                review_hidden_cards,
            )?;
            Ok(Box::new(professor))
        }
        ProfessorKind::ActiveSet => {
            let professor = ActiveSetProfessor::new(
                cards,
                config.active_set.increment_size,
                review_hidden_cards,
            );
            Ok(Box::new(professor))
        }
    }
}
