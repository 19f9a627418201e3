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

use crate::types::performance::Performance;

/// A question/answer pair together with its performance counters.
///
/// The cumulative counters (`attempts`, `correct_answers`, `mistakes`) and
/// the recency marker survive across sessions through the performance log.
/// The session counters are reset at the start of every session and only
/// feed the progress display.
#[derive(Clone, Debug)]
pub struct Card {
    question: String,
    answer: String,
    attempts: usize,
    correct_answers: usize,
    mistakes: usize,
    session_correct: usize,
    session_mistakes: usize,
    /// The session in which the card was last answered wrong. Zero means
    /// there is no mistake on record.
    last_session_with_mistake: usize,
    /// The position of that mistake among all mistakes of its session.
    mistake_order_in_last_session: usize,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into().trim().to_string(),
            answer: answer.into().trim().to_string(),
            attempts: 0,
            correct_answers: 0,
            mistakes: 0,
            session_correct: 0,
            session_mistakes: 0,
            last_session_with_mistake: 0,
            mistake_order_in_last_session: 0,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    pub fn session_correct(&self) -> usize {
        self.session_correct
    }

    pub fn session_mistakes(&self) -> usize {
        self.session_mistakes
    }

    pub fn last_session_with_mistake(&self) -> usize {
        self.last_session_with_mistake
    }

    pub fn mistake_order_in_last_session(&self) -> usize {
        self.mistake_order_in_last_session
    }

    pub fn increment_attempts(&mut self) {
        self.attempts += 1;
    }

    /// Record a wrong answer given in `session`, as the `order`-th mistake of
    /// that session.
    pub fn record_mistake(&mut self, session: usize, order: usize) {
        self.mistakes += 1;
        self.session_mistakes += 1;
        self.last_session_with_mistake = session;
        self.mistake_order_in_last_session = order;
    }

    /// Record a right answer. A right answer outside the session of the last
    /// mistake clears the recency marker.
    pub fn increment_correct_answers(&mut self, current_session: usize) {
        self.correct_answers += 1;
        self.session_correct += 1;
        if current_session != self.last_session_with_mistake {
            self.last_session_with_mistake = 0;
            self.mistake_order_in_last_session = 0;
        }
    }

    pub fn reset_session_progress(&mut self) {
        self.session_correct = 0;
        self.session_mistakes = 0;
    }

    /// Replace the cumulative counters with the values from the log.
    pub fn update_from_log(
        &mut self,
        attempts: usize,
        mistakes: usize,
        correct_answers: usize,
        last_session_with_mistake: usize,
    ) {
        self.attempts = attempts;
        self.mistakes = mistakes;
        self.correct_answers = correct_answers;
        self.last_session_with_mistake = last_session_with_mistake;
    }

    /// Restore the position of the last mistake within its session, without
    /// touching the counters.
    pub fn restore_mistake_order(&mut self, order: usize) {
        self.mistake_order_in_last_session = order;
    }

    /// The persistent part of this card's state.
    pub fn performance(&self) -> Performance {
        Performance {
            attempts: self.attempts,
            mistakes: self.mistakes,
            correct_answers: self.correct_answers,
            last_session_with_mistake: self.last_session_with_mistake,
            mistake_order_in_last_session: self.mistake_order_in_last_session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(card: &Card) {
        assert_eq!(card.attempts(), card.correct_answers() + card.mistakes());
    }

    #[test]
    fn test_new_trims() {
        let card = Card::new("  2+2 ", " 4\t");
        assert_eq!(card.question(), "2+2");
        assert_eq!(card.answer(), "4");
        assert_eq!(card.attempts(), 0);
        assert_eq!(card.last_session_with_mistake(), 0);
    }

    #[test]
    fn test_record_mistake() {
        let mut card = Card::new("q", "a");
        card.increment_attempts();
        card.record_mistake(3, 7);
        assert_consistent(&card);
        assert_eq!(card.mistakes(), 1);
        assert_eq!(card.session_mistakes(), 1);
        assert_eq!(card.last_session_with_mistake(), 3);
        assert_eq!(card.mistake_order_in_last_session(), 7);
    }

    #[test]
    fn test_record_mistake_overwrites() {
        let mut card = Card::new("q", "a");
        card.record_mistake(5, 9);
        card.record_mistake(2, 1);
        assert_eq!(card.last_session_with_mistake(), 2);
        assert_eq!(card.mistake_order_in_last_session(), 1);
    }

    #[test]
    fn test_correct_answer_in_same_session_keeps_marker() {
        let mut card = Card::new("q", "a");
        card.record_mistake(4, 2);
        card.increment_correct_answers(4);
        assert_eq!(card.last_session_with_mistake(), 4);
        assert_eq!(card.mistake_order_in_last_session(), 2);
        assert_eq!(card.session_correct(), 1);
    }

    #[test]
    fn test_correct_answer_in_later_session_clears_marker() {
        let mut card = Card::new("q", "a");
        card.record_mistake(4, 2);
        card.increment_correct_answers(5);
        assert_eq!(card.last_session_with_mistake(), 0);
        assert_eq!(card.mistake_order_in_last_session(), 0);
        assert_eq!(card.correct_answers(), 1);
    }

    #[test]
    fn test_reset_session_progress() {
        let mut card = Card::new("q", "a");
        card.increment_attempts();
        card.increment_correct_answers(1);
        card.increment_attempts();
        card.record_mistake(1, 1);
        card.reset_session_progress();
        assert_eq!(card.session_correct(), 0);
        assert_eq!(card.session_mistakes(), 0);
        assert_eq!(card.attempts(), 2);
        assert_consistent(&card);
    }

    #[test]
    fn test_update_from_log_replaces() {
        let mut card = Card::new("q", "a");
        card.increment_attempts();
        card.record_mistake(1, 1);
        card.update_from_log(10, 4, 6, 2);
        assert_eq!(card.attempts(), 10);
        assert_eq!(card.mistakes(), 4);
        assert_eq!(card.correct_answers(), 6);
        assert_eq!(card.last_session_with_mistake(), 2);
        assert_consistent(&card);
    }

    #[test]
    fn test_restore_mistake_order_keeps_counters() {
        let mut card = Card::new("q", "a");
        card.update_from_log(3, 1, 2, 6);
        card.restore_mistake_order(4);
        assert_eq!(card.mistakes(), 1);
        assert_eq!(card.last_session_with_mistake(), 6);
        assert_eq!(card.mistake_order_in_last_session(), 4);
        assert_consistent(&card);
    }
}
