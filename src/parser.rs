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

use crate::error::Fallible;
use crate::types::card::Card;

/// Read the card file at `path`.
pub fn load_cards(path: &Path) -> Fallible<Vec<Card>> {
    log::debug!("Loading cards from {}", path.display());
    let content = read_to_string(path)?;
    let cards = parse_cards(&content);
    log::debug!("Loaded {} cards.", cards.len());
    Ok(cards)
}

/// Parse one card per `question;answer` line. Lines that do not have exactly
/// two fields are ignored.
pub fn parse_cards(content: &str) -> Vec<Card> {
    let mut cards = Vec::new();
    for line in content.lines() {
        let parts: Vec<&str> = line.split(';').collect();
        if let [question, answer] = parts.as_slice() {
            cards.push(Card::new(*question, *answer));
        }
    }
    cards
}
