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

use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use rand::Rng;

use crate::achievements::Achievement;
use crate::achievements::evaluate;
use crate::db;
use crate::db::Database;
use crate::error::Fallible;
use crate::order::Order;
use crate::order::build_pool;
use crate::parser::load_cards;
use crate::report::Report;
use crate::report::ReportFormat;
use crate::types::card::Card;
use crate::types::session::Session;
use crate::types::timestamp::Timestamp;

/// Typing this instead of an answer ends the session.
const EXIT_COMMAND: &str = "exit";

pub struct DrillConfig {
    pub cards_path: PathBuf,
    pub log_path: PathBuf,
    pub order: Order,
    pub repetitions: usize,
    pub invert: bool,
    pub report: ReportFormat,
}

/// What a finished session leaves behind.
pub struct Summary {
    pub session: usize,
    pub cards: Vec<Card>,
    pub presented: usize,
    pub exited: bool,
    pub achievements: Vec<Achievement>,
}

/// Run one session: load the cards and the log, present the pool, report,
/// and save the log. Returns `None` when there are no cards to drill.
pub fn drill<I, W, R>(
    config: &DrillConfig,
    input: &mut I,
    output: &mut W,
    rng: &mut R,
) -> Fallible<Option<Summary>>
where
    I: BufRead,
    W: Write,
    R: Rng + ?Sized,
{
    let db = Database::load(&config.log_path);
    let mut session = Session::after(db.session_counter());
    log::debug!("Starting session {}.", session.number());

    let mut cards = match load_cards(&config.cards_path) {
        Ok(cards) => cards,
        Err(e) => {
            log::error!("failed to read {}: {e}", config.cards_path.display());
            Vec::new()
        }
    };
    if cards.is_empty() {
        writeln!(output, "No cards loaded. Check your file.")?;
        return Ok(None);
    }

    db.merge_into(&mut cards);
    for card in cards.iter_mut() {
        card.reset_session_progress();
    }

    let mut pool = build_pool(cards.len(), config.repetitions);
    config.order.organize(&mut pool, &cards, rng);
    log::debug!("Presenting {} cards in {} order.", pool.len(), config.order);

    let started_at = Timestamp::now();
    let outcome = present(config, &mut cards, &pool, &mut session, input, output)?;
    let ended_at = outcome.last_answer_at.unwrap_or(started_at);
    log::debug!("{} mistakes this session.", session.mistake_count());

    let average_seconds = if outcome.presented > 0 {
        Some(ended_at.seconds_since(started_at) / outcome.presented as f64)
    } else {
        None
    };
    let achievements = evaluate(&cards, average_seconds);
    let report = Report::new(
        session.number(),
        started_at,
        ended_at,
        outcome.presented,
        achievements.clone(),
        &cards,
    );
    report.write(output, config.report)?;

    db::save(&config.log_path, &cards, session.number())?;

    Ok(Some(Summary {
        session: session.number(),
        cards,
        presented: outcome.presented,
        exited: outcome.exited,
        achievements,
    }))
}

struct Outcome {
    presented: usize,
    exited: bool,
    last_answer_at: Option<Timestamp>,
}

fn present<I, W>(
    config: &DrillConfig,
    cards: &mut [Card],
    pool: &[usize],
    session: &mut Session,
    input: &mut I,
    output: &mut W,
) -> Fallible<Outcome>
where
    I: BufRead,
    W: Write,
{
    let mut outcome = Outcome {
        presented: 0,
        exited: false,
        last_answer_at: None,
    };
    for &index in pool {
        let card = &mut cards[index];
        let (prompt, expected) = if config.invert {
            (card.answer(), card.question())
        } else {
            (card.question(), card.answer())
        };
        let expected = expected.to_string();
        writeln!(output, "Question: {prompt}")?;
        output.flush()?;

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                log::debug!("Input closed, ending session.");
                outcome.exited = true;
                break;
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("failed to read answer, ending session: {e}");
                outcome.exited = true;
                break;
            }
        }
        let given = line.trim();
        if given.eq_ignore_ascii_case(EXIT_COMMAND) {
            writeln!(output, "Session exited by user.")?;
            outcome.exited = true;
            break;
        }

        card.increment_attempts();
        if given.to_lowercase() == expected.to_lowercase() {
            card.increment_correct_answers(session.number());
            writeln!(
                output,
                "Correct! ({}/{})",
                card.session_correct(),
                config.repetitions
            )?;
        } else {
            let order = session.next_mistake_order();
            card.record_mistake(session.number(), order);
            writeln!(output, "Incorrect! The answer was: {expected}")?;
        }
        outcome.presented += 1;
        outcome.last_answer_at = Some(Timestamp::now());
    }
    Ok(outcome)
}
