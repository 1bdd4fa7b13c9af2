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

use crate::types::card::CardId;
use crate::types::reply::Reply;
use crate::types::review::Review;

/// What happened to a card after a reply was accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplyEvent {
    pub card_id: CardId,
    pub reply: Reply,
    /// The review appended to the card's history, if any.
    pub review: Option<Review>,
    /// Whether the card was hidden by this reply.
    pub hidden: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ObserverId(usize);

pub type ReplyObserver = Box<dyn FnMut(&ReplyEvent)>;

/// Callbacks run synchronously, in registration order, after each reply.
#[derive(Default)]
pub struct ReplyObservers {
    next_id: usize,
    observers: Vec<(ObserverId, ReplyObserver)>,
}

impl ReplyObservers {
    pub fn add(&mut self, observer: ReplyObserver) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if no observer has this id.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        let removed = self.observers.len() < before;
        if !removed {
            log::debug!("No reply observer with id {id:?}.");
        }
        removed
    }

    pub fn notify(&mut self, event: &ReplyEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn event(id: i64) -> ReplyEvent {
        ReplyEvent {
            card_id: CardId::new(id),
            reply: Reply::Skip,
            review: None,
            hidden: false,
        }
    }

    #[test]
    fn test_notify_in_order() {
        let log: Rc<RefCell<Vec<(usize, CardId)>>> = Rc::new(RefCell::new(Vec::new()));
        let mut observers = ReplyObservers::default();
        for n in 0..2 {
            let log = log.clone();
            observers.add(Box::new(move |event: &ReplyEvent| {
                log.borrow_mut().push((n, event.card_id))
            }));
        }
        observers.notify(&event(7));
        assert_eq!(
            *log.borrow(),
            vec![(0, CardId::new(7)), (1, CardId::new(7))]
        );
    }

    #[test]
    fn test_remove() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = ReplyObservers::default();
        let id = {
            let count = count.clone();
            observers.add(Box::new(move |_: &ReplyEvent| *count.borrow_mut() += 1))
        };
        observers.notify(&event(1));
        assert!(observers.remove(id));
        assert!(!observers.remove(id));
        assert!(observers.observers.is_empty());
        observers.notify(&event(2));
        assert_eq!(*count.borrow(), 1);
    }
}
