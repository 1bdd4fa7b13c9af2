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

use std::collections::HashSet;
use std::collections::VecDeque;

use crate::error::Fallible;
use crate::error::fail;
use crate::professor::Professor;
use crate::professor::SessionState;
use crate::professor::observer::ReplyEvent;
use crate::professor::observer::ReplyObservers;
use crate::types::card::Card;
use crate::types::reply::Reply;

/// Drills a window taken from the front of the card list until every card in
/// it is answered right, then widens the window and drills it again from the
/// start, so earlier cards keep coming back while new ones are added. Review
/// history is left alone, so this is for learning new material rather than
/// long-term review.
pub struct ActiveSetProfessor {
    cards: Vec<Card>,
    increment_size: usize,
    /// Indices of the cards this session may show, in list order.
    eligible: Vec<usize>,
    /// The window covers `eligible[..admitted]`.
    admitted: usize,
    window: VecDeque<usize>,
    /// Cards hidden during this session. They never re-enter the window.
    retired: HashSet<usize>,
    state: SessionState,
    observers: ReplyObservers,
}

impl ActiveSetProfessor {
    pub fn new(cards: Vec<Card>, increment_size: usize, review_hidden_cards: bool) -> Self {
        let mut professor = Self {
            cards: Vec::new(),
            increment_size: increment_size.max(1),
            eligible: Vec::new(),
            admitted: 0,
            window: VecDeque::new(),
            retired: HashSet::new(),
            state: SessionState::AwaitingCard,
            observers: ReplyObservers::default(),
        };
        professor.reset(cards, review_hidden_cards);
        professor
    }

    fn reset(&mut self, cards: Vec<Card>, review_hidden_cards: bool) {
        self.eligible = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| review_hidden_cards || !card.hidden)
            .map(|(index, _)| index)
            .collect();
        self.cards = cards;
        self.admitted = 0;
        self.window.clear();
        self.retired.clear();
        self.state = SessionState::AwaitingCard;
    }

    /// Refill an empty window with a longer prefix of the card list. Does
    /// nothing once the window already spans the whole list.
    fn widen(&mut self) {
        let end = (self.admitted + self.increment_size).min(self.eligible.len());
        if end == self.admitted {
            return;
        }
        log::debug!("Widening the active set to {end} cards.");
        self.admitted = end;
        let retired = &self.retired;
        self.window.extend(
            self.eligible[..end]
                .iter()
                .copied()
                .filter(|index| !retired.contains(index)),
        );
    }
}

impl Professor for ActiveSetProfessor {
    fn current_card(&mut self) -> Option<&Card> {
        if self.window.is_empty() {
            self.widen();
        }
        match self.window.front() {
            Some(&index) => {
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
        let Some(index) = self.window.pop_front() else {
            return fail("no current card to reply to");
        };
        match reply {
            Reply::Good => {}
            Reply::Bad | Reply::Skip => {
                if !hide {
                    self.window.push_back(index);
                }
            }
            Reply::SkipLevel => self.window.clear(),
        }
        let card = &mut self.cards[index];
        if hide {
            card.hidden = true;
            self.retired.insert(index);
        }
        let event = ReplyEvent {
            card_id: card.id,
            reply,
            review: None,
            hidden: hide,
        };
        self.state = SessionState::AwaitingCard;
        self.observers.notify(&event);
        Ok(())
    }

    fn update_card_list(&mut self, cards: Vec<Card>, review_hidden_cards: bool) -> Fallible<()> {
        self.reset(cards, review_hidden_cards);
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
