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

use serde::Serialize;

use crate::types::card::Card;

/// More attempts than this on a single card earns `Repeat`.
const REPEAT_ATTEMPTS: usize = 5;

/// At least this many right answers on a single card earns `Confident`.
const CONFIDENT_CORRECT: usize = 3;

/// Average seconds per card below which the session earns `Speedster`.
const SPEEDSTER_SECONDS: f64 = 5.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Achievement {
    AllCorrect,
    Repeat,
    Confident,
    Speedster,
}

impl Achievement {
    pub fn description(self) -> &'static str {
        match self {
            Achievement::AllCorrect => "All cards answered correctly!",
            Achievement::Repeat => "A card was attempted more than 5 times!",
            Achievement::Confident => "A card was answered correctly at least 3 times!",
            Achievement::Speedster => "Average response time under 5 seconds!",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Achievement::AllCorrect => "ALL_CORRECT",
            Achievement::Repeat => "REPEAT",
            Achievement::Confident => "CONFIDENT",
            Achievement::Speedster => "SPEEDSTER",
        }
    }
}

/// Evaluate the achievements earned over the whole card collection.
/// `average_seconds` is the mean time per presented card this session, if
/// any card was presented.
pub fn evaluate(cards: &[Card], average_seconds: Option<f64>) -> Vec<Achievement> {
    let mut earned = Vec::new();
    if cards.iter().all(|card| card.mistakes() == 0) {
        earned.push(Achievement::AllCorrect);
    }
    if cards.iter().any(|card| card.attempts() > REPEAT_ATTEMPTS) {
        earned.push(Achievement::Repeat);
    }
    if cards
        .iter()
        .any(|card| card.correct_answers() >= CONFIDENT_CORRECT)
    {
        earned.push(Achievement::Confident);
    }
    if average_seconds.is_some_and(|secs| secs < SPEEDSTER_SECONDS) {
        earned.push(Achievement::Speedster);
    }
    earned
}
