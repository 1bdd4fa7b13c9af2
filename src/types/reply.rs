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
use std::str::FromStr;

use crate::error::ErrorReport;
use crate::error::fail;

/// A learner's reply to the current card.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reply {
    Good,
    Bad,
    /// Don't ask this card again today.
    Skip,
    /// Drop the rest of the current bucket.
    SkipLevel,
}

impl Reply {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reply::Good => "good",
            Reply::Bad => "bad",
            Reply::Skip => "skip",
            Reply::SkipLevel => "skip level",
        }
    }
}

impl FromStr for Reply {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Reply::Good),
            "bad" => Ok(Reply::Bad),
            "skip" => Ok(Reply::Skip),
            "skip level" => Ok(Reply::SkipLevel),
            _ => fail(format!("unknown reply: {s}")),
        }
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
