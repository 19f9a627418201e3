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

use std::io::stdin;
use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;

use crate::drill::DrillConfig;
use crate::drill::drill;
use crate::error::Fallible;
use crate::order::Order;
use crate::report::ReportFormat;

const DEFAULT_REPETITIONS: usize = 1;

/// Drill question/answer cards, remembering how you did on each.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the card file, one `question;answer` per line.
    cards: PathBuf,
    /// The order in which cards are presented.
    #[arg(long, value_enum, default_value_t = Order::Random)]
    order: Order,
    /// How many times each card is asked.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    repetitions: String,
    /// Show the answer and expect the question.
    #[arg(long = "invertCards")]
    invert_cards: bool,
    /// Path to the performance log.
    #[arg(long, default_value = "flashcard_log.txt")]
    log_file: PathBuf,
    /// Format of the end-of-session report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

impl Cli {
    fn into_config(self) -> DrillConfig {
        DrillConfig {
            repetitions: parse_repetitions(&self.repetitions),
            cards_path: self.cards,
            log_path: self.log_file,
            order: self.order,
            invert: self.invert_cards,
            report: self.report,
        }
    }
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let config = cli.into_config();
    let mut input = stdin().lock();
    let mut output = stdout().lock();
    let mut rng = rand::thread_rng();
    if let Some(summary) = drill(&config, &mut input, &mut output, &mut rng)? {
        log::debug!(
            "Session {} done: {} of {} cards presented{}, {} achievements.",
            summary.session,
            summary.presented,
            summary.cards.len(),
            if summary.exited { ", exited early" } else { "" },
            summary.achievements.len()
        );
    }
    Ok(())
}

/// Parse the repetition count, falling back to the default on bad input.
fn parse_repetitions(value: &str) -> usize {
    match value.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            log::warn!("invalid repetitions value {value:?}");
            println!("Invalid repetitions number. Using default of {DEFAULT_REPETITIONS}.");
            DEFAULT_REPETITIONS
        }
    }
}
