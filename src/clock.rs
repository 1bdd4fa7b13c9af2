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

use crate::error::Fallible;
use crate::types::date::Date;

/// A source for the current date. Scheduling code never reads the system
/// clock directly, so that tests can freeze time.
pub trait Clock {
    fn today(&self) -> Date;
}

/// The real local date.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        Date::today()
    }
}

/// A clock stuck on a given date.
#[derive(Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// Build a clock from an optional `YYYY-MM-DD` override.
pub fn clock_from_arg(date: Option<String>) -> Fallible<Box<dyn Clock>> {
    match date {
        Some(date) => {
            let date = Date::parse(&date)?;
            log::debug!("Using fixed date {date}.");
            Ok(Box::new(FixedClock(date)))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() -> Fallible<()> {
        let date = Date::parse("2000-01-01")?;
        let clock = FixedClock(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.today(), date);
        Ok(())
    }

    #[test]
    fn test_clock_from_arg() -> Fallible<()> {
        let clock = clock_from_arg(Some("2000-01-01".to_string()))?;
        assert_eq!(clock.today(), Date::parse("2000-01-01")?);
        assert!(clock_from_arg(Some("01/01/2000".to_string())).is_err());
        Ok(())
    }
}
