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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::professor::estimate::TagTables;
use crate::professor::sort::SortPolicy;

pub const CONFIG_FILE_NAME: &str = "gradecards.toml";

pub const DEFAULT_MAX_CARDS_PER_GRADE: f64 = 5.0;

pub const DEFAULT_INCREMENT_SIZE: usize = 5;

/// Written by `init`. Must parse to `Config::default()`.
pub const DEFAULT_CONFIG: &str = r#"# gradecards configuration file

# Which scheduler to drill with: "long-term" or "active-set".
professor = "long-term"

[long_term]
# Difficulty-weighted number of right answers demanded per grade each day.
max_cards_per_grade = 5

# How each grade's cards are ordered. Steps run in order, each one a stable
# sort, so the last step is the dominant key.
[long_term.priorities_per_level]
0 = [{ sort = "tag", reverse = true }, { sort = "date", reverse = true }]
default = [{ sort = "tag", reverse = true }]

[active_set]
increment_size = 5

[tags.priorities]
# important = 3
# todo = 0.5

[tags.difficulties]
# hard = 2.0
# easy = 0.5
"#;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfessorKind {
    #[default]
    LongTerm,
    ActiveSet,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub professor: ProfessorKind,
    pub long_term: LongTermConfig,
    pub active_set: ActiveSetConfig,
    pub tags: TagTables,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LongTermConfig {
    pub max_cards_per_grade: f64,
    pub priorities_per_level: SortPolicy,
}

impl Default for LongTermConfig {
    fn default() -> Self {
        Self {
            max_cards_per_grade: DEFAULT_MAX_CARDS_PER_GRADE,
            priorities_per_level: SortPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActiveSetConfig {
    pub increment_size: usize,
}

impl Default for ActiveSetConfig {
    fn default() -> Self {
        Self {
            increment_size: DEFAULT_INCREMENT_SIZE,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration file from a collection directory. A missing
    /// file means the defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if path.exists() {
            log::debug!("Loading configuration from {}.", path.display());
            Config::parse(&read_to_string(path)?)
        } else {
            log::debug!("No configuration file, using defaults.");
            Ok(Config::default())
        }
    }

    fn validate(&self) -> Fallible<()> {
        let max = self.long_term.max_cards_per_grade;
        if !(max.is_finite() && max > 0.0) {
            return fail(format!("max_cards_per_grade must be positive, got {max}"));
        }
        if self.active_set.increment_size == 0 {
            return fail("increment_size must be positive");
        }
        for (tag, difficulty) in &self.tags.difficulties {
            if !(difficulty.is_finite() && *difficulty > 0.0) {
                return fail(format!(
                    "difficulty of tag '{tag}' must be positive, got {difficulty}"
                ));
            }
        }
        for (tag, priority) in &self.tags.priorities {
            if !priority.is_finite() {
                return fail(format!("priority of tag '{tag}' must be a finite number"));
            }
        }
        Ok(())
    }
}
