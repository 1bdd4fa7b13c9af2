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

use crate::clock::Clock;
use crate::config::LongTermConfig;
use crate::error::Fallible;
use crate::error::fail;
use crate::professor::Professor;
use crate::professor::SessionState;
use crate::professor::buckets::BucketScheduler;
use crate::professor::estimate::TagTables;
use crate::professor::observer::ReplyEvent;
use crate::professor::observer::ReplyObservers;
use crate::types::card::Card;
use crate::types::reply::Reply;
use crate::types::review::Review;

/// The long-term memory professor: drills due cards grade by grade, lowest
/// grade first, with a daily quota of right answers per grade.
pub struct LongTermProfessor {
    cards: Vec<Card>,
    config: LongTermConfig,
    tags: TagTables,
    clock: Box<dyn Clock>,
    scheduler: BucketScheduler,
    state: SessionState,
    observers: ReplyObservers,
    /// Wrong answers given in this session. Wrong answers from earlier
    /// sessions today are not counted.
    wrong_answers: usize,
}

impl LongTermProfessor {
    pub fn new(
        cards: Vec<Card>,
        config: LongTermConfig,
        tags: TagTables,
        clock: Box<dyn Clock>,
        review_hidden_cards: bool,
    ) -> Fallible<Self> {
        let scheduler =
            BucketScheduler::new(&cards, clock.today(), &config, &tags, review_hidden_cards)?;
        Ok(Self {
            cards,
            config,
            tags,
            clock,
            scheduler,
            state: SessionState::AwaitingCard,
            observers: ReplyObservers::default(),
            wrong_answers: 0,
        })
    }
}

impl Professor for LongTermProfessor {
    fn current_card(&mut self) -> Option<&Card> {
        match self.scheduler.current().map(|entry| entry.index) {
            Some(index) => {
                self.state = SessionState::HasCard;
                Some(&self.cards[index])
            }
            None => {
                self.state = SessionState::Exhausted;
                None
            }
        }
    }

    fn submit_reply(&mut self, reply: Reply, hide: bool) -> Fallible<()> {
        if self.state != SessionState::HasCard {
            return fail("no current card to reply to");
        }
        let Some((key, entry)) = self.scheduler.pop_current() else {
            return fail("no current card to reply to");
        };
        let today = self.clock.today();
        let card = &mut self.cards[entry.index];
        let review = match reply {
            Reply::Good => {
                self.scheduler.record_right(key, entry.difficulty);
                Some(Review::right(today))
            }
            Reply::Bad => {
                self.wrong_answers += 1;
                Some(Review::wrong(today))
            }
            Reply::Skip => None,
            Reply::SkipLevel => {
                self.scheduler.clear_active();
                None
            }
        };
        if let Some(review) = review {
            card.reviews.push(review);
        }
        if hide {
            card.hidden = true;
        }
        log::debug!(
            "Card {} at level {key}: {reply}{}. Quota {:.1}/{}.",
            card.id,
            if hide { " (hidden)" } else { "" },
            self.scheduler.quota_used(key),
            self.scheduler.max_cards_per_grade()
        );
        let event = ReplyEvent {
            card_id: card.id,
            reply,
            review,
            hidden: hide,
        };
        self.state = SessionState::AwaitingCard;
        self.observers.notify(&event);
        Ok(())
    }

    fn update_card_list(&mut self, cards: Vec<Card>, review_hidden_cards: bool) -> Fallible<()> {
        let today = self.clock.today();
        self.scheduler =
            BucketScheduler::new(&cards, today, &self.config, &self.tags, review_hidden_cards)?;
        self.cards = cards;
        self.state = SessionState::AwaitingCard;
        Ok(())
    }

    fn state(&self) -> SessionState {
        self.state
    }

    fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn into_cards(self: Box<Self>) -> Vec<Card> {
        self.cards
    }

    fn observers(&mut self) -> &mut ReplyObservers {
        &mut self.observers
    }
}
