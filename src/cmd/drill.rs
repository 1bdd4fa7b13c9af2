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

use std::cell::RefCell;
use std::io::BufRead;
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;

use crate::clock::clock_from_arg;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::professor::Professor;
use crate::professor::SessionState;
use crate::professor::build_professor;
use crate::professor::observer::ReplyEvent;
use crate::types::reply::Reply;

const HIDE_SUFFIX: &str = " hide";

/// A line typed at the reply prompt.
#[derive(Debug, PartialEq)]
enum Input {
    Reply { reply: Reply, hide: bool },
    Quit,
}

impl FromStr for Input {
    type Err = crate::error::ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "quit" {
            return Ok(Input::Quit);
        }
        let (s, hide) = match s.strip_suffix(HIDE_SUFFIX) {
            Some(rest) => (rest.trim_end(), true),
            None => (s, false),
        };
        let reply = Reply::from_str(s)?;
        Ok(Input::Reply { reply, hide })
    }
}

pub fn start_drill(
    directory: Option<String>,
    date: Option<String>,
    review_hidden_cards: bool,
) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let cards = collection.load_cards()?;
    let clock = clock_from_arg(date)?;
    let mut professor = build_professor(&collection.config, cards, clock, review_hidden_cards)?;

    let events: Rc<RefCell<Vec<ReplyEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let observer = {
        let events = events.clone();
        professor.add_reply_observer(Box::new(move |event: &ReplyEvent| {
            events.borrow_mut().push(event.clone())
        }))
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let db = &mut collection.db;
    let result = run_drill(
        professor.as_mut(),
        &mut stdin.lock(),
        &mut stdout,
        || db.save_replies(&events.take()),
    );
    professor.remove_reply_observer(observer);

    // Replies are saved as they come in. Anything left here was produced by
    // a reply whose save failed.
    let events = events.take();
    if !events.is_empty() {
        collection.db.save_replies(&events)?;
    }
    let answered = result?;
    if professor.state() == SessionState::Exhausted {
        println!("Done for today: {answered} replies saved.");
    } else {
        println!("Session interrupted: {answered} replies saved.");
    }
    let cards = professor.into_cards();
    let hidden = cards.iter().filter(|card| card.hidden).count();
    log::debug!("{hidden} of {} cards are hidden.", cards.len());
    Ok(())
}

/// Run the question/answer loop until the session is exhausted, the user
/// quits, or the input ends. `after_reply` runs once per accepted reply,
/// before the next card is shown, so an interrupted session keeps everything
/// answered so far. Returns the number of accepted replies.
pub fn run_drill<R: BufRead, W: Write, F: FnMut() -> Fallible<()>>(
    professor: &mut dyn Professor,
    input: &mut R,
    output: &mut W,
    mut after_reply: F,
) -> Fallible<usize> {
    let mut answered = 0;
    loop {
        let (question, answer) = match professor.current_card() {
            Some(card) => (card.question.clone(), card.answer.clone()),
            None => {
                writeln!(output, "No more cards to review today.")?;
                return Ok(answered);
            }
        };
        writeln!(output, "Q: {question}")?;
        writeln!(output, "[press enter to reveal]")?;
        match read_line(input)? {
            Some(line) if line.trim() == "quit" => return Ok(answered),
            Some(_) => {}
            None => return Ok(answered),
        }
        writeln!(output, "A: {answer}")?;
        loop {
            writeln!(output, "Reply (good, bad, skip, skip level; append \"hide\" to hide):")?;
            let Some(line) = read_line(input)? else {
                return Ok(answered);
            };
            match line.parse::<Input>() {
                Ok(Input::Quit) => return Ok(answered),
                Ok(Input::Reply { reply, hide }) => {
                    professor.submit_reply(reply, hide)?;
                    answered += 1;
                    after_reply()?;
                    break;
                }
                Err(err) => writeln!(output, "{err}")?,
            }
        }
    }
}

/// Read one line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}
