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

use std::cmp::Reverse;
use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::card::Card;

/// The order in which the cards of a session are presented.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Order {
    /// Shuffle the cards.
    Random,
    /// Cards with the most mistakes first.
    WorstFirst,
    /// Cards most recently answered wrong first.
    RecentMistakesFirst,
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Random => write!(f, "random"),
            Order::WorstFirst => write!(f, "worst-first"),
            Order::RecentMistakesFirst => write!(f, "recent-mistakes-first"),
        }
    }
}

impl Order {
    /// Reorder `pool`, a list of indices into `cards`, in place.
    pub fn organize<R: Rng + ?Sized>(self, pool: &mut [usize], cards: &[Card], rng: &mut R) {
        match self {
            Order::Random => pool.shuffle(rng),
            Order::WorstFirst => worst_first(pool, cards),
            Order::RecentMistakesFirst => recent_mistakes_first(pool, cards),
        }
    }
}

/// Replicate every card `repetitions` times. Replicas of a card are adjacent
/// and all refer to the same entry of the card table.
pub fn build_pool(card_count: usize, repetitions: usize) -> Vec<usize> {
    (0..card_count)
        .flat_map(|index| std::iter::repeat_n(index, repetitions))
        .collect()
}

// `sort_by_key` is stable, so ties keep their relative order.
fn worst_first(pool: &mut [usize], cards: &[Card]) {
    pool.sort_by_key(|&index| Reverse(cards[index].mistakes()));
}

// A zero session sorts below every real session, so cards with no mistake on
// record end up last.
fn recent_mistakes_first(pool: &mut [usize], cards: &[Card]) {
    pool.sort_by_key(|&index| {
        let card = &cards[index];
        Reverse((
            card.last_session_with_mistake(),
            card.mistake_order_in_last_session(),
        ))
    });
}
