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
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::achievements::Achievement;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

const RULE: &str = "-------------------------------------------------";

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReportFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// The end-of-session summary.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    session: usize,
    started_at: Timestamp,
    ended_at: Timestamp,
    cards_presented: usize,
    achievements: Vec<Achievement>,
    cards: Vec<CardReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardReport {
    question: String,
    answer: String,
    attempts: usize,
    correct_answers: usize,
    mistakes: usize,
    session_correct: usize,
    session_mistakes: usize,
}

impl Report {
    pub fn new(
        session: usize,
        started_at: Timestamp,
        ended_at: Timestamp,
        cards_presented: usize,
        achievements: Vec<Achievement>,
        cards: &[Card],
    ) -> Self {
        let cards = cards
            .iter()
            .map(|card| CardReport {
                question: card.question().to_string(),
                answer: card.answer().to_string(),
                attempts: card.attempts(),
                correct_answers: card.correct_answers(),
                mistakes: card.mistakes(),
                session_correct: card.session_correct(),
                session_mistakes: card.session_mistakes(),
            })
            .collect();
        Self {
            session,
            started_at,
            ended_at,
            cards_presented,
            achievements,
            cards,
        }
    }

    pub fn write<W: Write>(&self, out: &mut W, format: ReportFormat) -> Fallible<()> {
        match format {
            ReportFormat::Text => self.write_text(out),
            ReportFormat::Json => {
                let json = serde_json::to_string_pretty(self)?;
                writeln!(out, "{json}")?;
                Ok(())
            }
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> Fallible<()> {
        writeln!(out)?;
        writeln!(out, "Achievements:")?;
        if self.achievements.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for achievement in &self.achievements {
            writeln!(
                out,
                "✔ {}: {}",
                achievement.label(),
                achievement.description()
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Flashcard Log:")?;
        for card in &self.cards {
            writeln!(out, "{RULE}")?;
            writeln!(out, "Question: {}", card.question)?;
            writeln!(out, "Answer: {}", card.answer)?;
            writeln!(out, "Attempts: {}", card.attempts)?;
            writeln!(out, "Correct Answers: {}", card.correct_answers)?;
            writeln!(out, "Mistakes: {}", card.mistakes)?;
        }
        writeln!(out, "{RULE}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let mut card = Card::new("2+2", "4");
        card.increment_attempts();
        card.increment_correct_answers(1);
        let now = Timestamp::now();
        Report::new(1, now, now, 1, vec![Achievement::AllCorrect], &[card])
    }

    #[test]
    fn test_text() -> Fallible<()> {
        let mut out = Vec::new();
        sample().write(&mut out, ReportFormat::Text)?;
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("✔ ALL_CORRECT"));
        assert!(text.contains("Question: 2+2"));
        assert!(text.contains("Correct Answers: 1"));
        Ok(())
    }

    #[test]
    fn test_json() -> Fallible<()> {
        let mut out = Vec::new();
        sample().write(&mut out, ReportFormat::Json)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value["session"], 1);
        assert_eq!(value["achievements"][0], "ALL_CORRECT");
        assert_eq!(value["cards"][0]["correctAnswers"], 1);
        Ok(())
    }
}
