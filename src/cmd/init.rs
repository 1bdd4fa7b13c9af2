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

use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use crate::collection::Collection;
use crate::config::CONFIG_FILE_NAME;
use crate::config::DEFAULT_CONFIG;
use crate::error::Fallible;

/// Create a collection directory with an empty database and the default
/// configuration. An existing configuration file is left alone.
pub fn init_collection(directory: Option<String>) -> Fallible<()> {
    if let Some(directory) = &directory {
        create_dir_all(directory)?;
    }
    let collection = Collection::new(directory)?;
    let config_path: PathBuf = collection.directory.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        log::debug!("Keeping existing {}.", config_path.display());
    } else {
        write(&config_path, DEFAULT_CONFIG)?;
    }
    println!(
        "Initialized collection in {} ({} cards).",
        collection.directory.display(),
        collection.db.card_count()?
    );
    Ok(())
}
