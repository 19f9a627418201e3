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

use std::collections::HashMap;
use std::fs::read;
use std::io::Write;
use std::path::Path;
use std::str::from_utf8;

use tempfile::NamedTempFile;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::performance::Performance;

/// Tag of the header line that carries the session counter.
const SESSION_COUNTER_TAG: &str = "SESSION_COUNTER";

/// The performance log: the last saved session counter, and the performance
/// of every card seen in a previous session, keyed by question text.
pub struct Database {
    session_counter: usize,
    records: HashMap<String, Performance>,
}

impl Database {
    pub fn empty() -> Self {
        Self {
            session_counter: 0,
            records: HashMap::new(),
        }
    }

    /// Load the log at `path`. A missing or unreadable file is an empty log.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("Using empty performance database.");
            return Self::empty();
        }
        log::debug!("Loading performance database...");
        let content = match read(path) {
            Ok(content) => content,
            Err(e) => {
                log::error!("failed to read {}: {e}", path.display());
                return Self::empty();
            }
        };
        let db = Self::parse(&content);
        log::debug!(
            "Database loaded: session counter {}, {} records.",
            db.session_counter,
            db.record_count()
        );
        db
    }

    /// Parse the contents of a log file. Lines that are malformed or not
    /// valid UTF-8 are skipped.
    pub fn parse(content: &[u8]) -> Self {
        let mut db = Self::empty();
        let mut lines = content
            .split(|&byte| byte == b'\n')
            .map(decode_line)
            .enumerate()
            .peekable();
        let header = lines
            .peek()
            .and_then(|(_, first)| first.as_ref().ok())
            .and_then(|first| parse_header(first));
        if let Some(counter) = header {
            db.session_counter = counter;
            lines.next();
        }
        for (index, line) in lines {
            let record = line.and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    parse_record(line).map(Some)
                }
            });
            match record {
                Ok(Some((question, performance))) => {
                    db.records.insert(question, performance);
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("skipping line {} of performance log: {e}", index + 1);
                }
            }
        }
        db
    }

    pub fn session_counter(&self) -> usize {
        self.session_counter
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, question: &str) -> Option<&Performance> {
        self.records.get(question)
    }

    /// Copy the logged performance into every card that has a record. The
    /// counters and the recency marker are replaced; no mistake is replayed,
    /// so the logged mistake count is restored exactly. Returns how many
    /// cards were updated.
    pub fn merge_into(&self, cards: &mut [Card]) -> usize {
        let mut merged = 0;
        for card in cards.iter_mut() {
            if let Some(p) = self.get(card.question()) {
                card.update_from_log(
                    p.attempts,
                    p.mistakes,
                    p.correct_answers,
                    p.last_session_with_mistake,
                );
                card.restore_mistake_order(p.mistake_order_in_last_session);
                merged += 1;
            }
        }
        log::debug!("Merged performance into {merged} cards.");
        merged
    }
}

/// Overwrite the log at `path` with the state of `cards`. The new contents
/// are written to a temporary file in the same directory, which then replaces
/// the target.
pub fn save(path: &Path, cards: &[Card], session_counter: usize) -> Fallible<()> {
    log::debug!("Writing performance database");
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory)?;
    write!(file, "{}", render(cards, session_counter))?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}

/// The full text of a log file.
pub fn render(cards: &[Card], session_counter: usize) -> String {
    let mut out = format!("{SESSION_COUNTER_TAG};{session_counter}\n");
    for card in cards {
        let p = card.performance();
        out.push_str(&format!(
            "{};{};{};{};{};{}\n",
            card.question(),
            p.attempts,
            p.mistakes,
            p.correct_answers,
            p.last_session_with_mistake,
            p.mistake_order_in_last_session
        ));
    }
    out
}

fn decode_line(bytes: &[u8]) -> Fallible<&str> {
    let line = from_utf8(bytes).map_err(|e| ErrorReport::new(format!("not valid UTF-8: {e}")))?;
    Ok(line.strip_suffix('\r').unwrap_or(line))
}

/// The session counter from a header line. A counter with no successor is
/// rejected, since the next session could not be numbered.
fn parse_header(line: &str) -> Option<usize> {
    let (tag, value) = line.split_once(';')?;
    if tag.trim() != SESSION_COUNTER_TAG {
        return None;
    }
    match value.trim().parse::<usize>() {
        Ok(counter) if counter.checked_add(1).is_some() => Some(counter),
        Ok(_) => {
            log::warn!("session counter in performance log is too large: {value:?}");
            None
        }
        Err(_) => {
            log::warn!("invalid session counter in performance log: {value:?}");
            None
        }
    }
}

fn parse_record(line: &str) -> Fallible<(String, Performance)> {
    let parts: Vec<&str> = line.split(';').map(str::trim).collect();
    let performance = match parts.as_slice() {
        [_, attempts, mistakes, correct, last, order] => Performance {
            attempts: attempts.parse()?,
            mistakes: mistakes.parse()?,
            correct_answers: correct.parse()?,
            last_session_with_mistake: last.parse()?,
            mistake_order_in_last_session: order.parse()?,
        },
        // Older logs have no recency fields.
        [_, attempts, mistakes, correct] => Performance {
            attempts: attempts.parse()?,
            mistakes: mistakes.parse()?,
            correct_answers: correct.parse()?,
            last_session_with_mistake: 0,
            mistake_order_in_last_session: 0,
        },
        _ => return fail(format!("expected 4 or 6 fields, found {}", parts.len())),
    };
    Ok((parts[0].to_string(), performance))
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_is_empty() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::load(&dir.path().join("nope.txt"));
        assert_eq!(db.session_counter(), 0);
        assert_eq!(db.record_count(), 0);
        Ok(())
    }

    #[test]
    fn test_parse_with_header() {
        let db = Database::parse(b"SESSION_COUNTER;4\n2+2;3;1;2;4;2\n");
        assert_eq!(db.session_counter(), 4);
        assert_eq!(
            db.get("2+2"),
            Some(&Performance {
                attempts: 3,
                mistakes: 1,
                correct_answers: 2,
                last_session_with_mistake: 4,
                mistake_order_in_last_session: 2,
            })
        );
    }

    #[test]
    fn test_parse_without_header() {
        let db = Database::parse(b"2+2;3;1;2;0;0\n3+3;1;0;1;0;0\n");
        assert_eq!(db.session_counter(), 0);
        assert_eq!(db.record_count(), 2);
    }

    #[test]
    fn test_parse_legacy_records() {
        let db = Database::parse(b"capital of France;5;2;3\n");
        let p = db.get("capital of France").unwrap();
        assert_eq!(p.attempts, 5);
        assert_eq!(p.mistakes, 2);
        assert_eq!(p.correct_answers, 3);
        assert_eq!(p.last_session_with_mistake, 0);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let content = b"SESSION_COUNTER;2\nbad;1;2\nnan;x;0;0;0;0\ngood;1;0;1;0;0\n";
        let db = Database::parse(content);
        assert_eq!(db.session_counter(), 2);
        assert_eq!(db.record_count(), 1);
        assert!(db.get("good").is_some());
        assert!(db.get("nan").is_none());
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let content = b"SESSION_COUNTER;3\n2+2;1;0;1;0;0\ncaf\xe9;1;0;1;0;0\n3+3;2;1;1;3;1\n";
        let db = Database::parse(content);
        assert_eq!(db.session_counter(), 3);
        assert_eq!(db.record_count(), 2);
        assert!(db.get("2+2").is_some());
        assert!(db.get("3+3").is_some());
    }

    #[test]
    fn test_invalid_utf8_header_skipped() {
        let db = Database::parse(b"SESSION_COUNTER;\xff\nq;1;0;1;0;0\n");
        assert_eq!(db.session_counter(), 0);
        assert_eq!(db.record_count(), 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let db = Database::parse(b"SESSION_COUNTER;2\r\nq;1;0;1;0;0\r\n");
        assert_eq!(db.session_counter(), 2);
        assert_eq!(db.get("q").map(|p| p.attempts), Some(1));
    }

    #[test]
    fn test_session_counter_without_successor_rejected() {
        let content = format!("SESSION_COUNTER;{}\nq;1;0;1;0;0\n", usize::MAX);
        let db = Database::parse(content.as_bytes());
        assert_eq!(db.session_counter(), 0);
        assert_eq!(db.record_count(), 1);
    }

    #[test]
    fn test_largest_usable_session_counter() {
        let content = format!("SESSION_COUNTER;{}\n", usize::MAX - 1);
        let db = Database::parse(content.as_bytes());
        assert_eq!(db.session_counter(), usize::MAX - 1);
    }

    #[test]
    fn test_unreadable_file_is_empty() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::load(dir.path());
        assert_eq!(db.session_counter(), 0);
        assert_eq!(db.record_count(), 0);
        Ok(())
    }

    #[test]
    fn test_field_count_message() {
        let err = parse_record("a;1;2").unwrap_err();
        assert_eq!(err.to_string(), "error: expected 4 or 6 fields, found 3");
    }

    #[test]
    fn test_header_only_on_first_line() {
        let db = Database::parse(b"a;1;1;0;1;1\nSESSION_COUNTER;9\n");
        assert_eq!(db.session_counter(), 0);
        assert_eq!(db.record_count(), 1);
    }

    #[test]
    fn test_merge_does_not_inflate_mistakes() {
        let db = Database::parse(b"SESSION_COUNTER;3\nq;4;2;2;3;5\n");
        let mut cards = vec![Card::new("q", "a"), Card::new("other", "b")];
        assert_eq!(db.merge_into(&mut cards), 1);
        assert_eq!(cards[0].attempts(), 4);
        assert_eq!(cards[0].mistakes(), 2);
        assert_eq!(cards[0].correct_answers(), 2);
        assert_eq!(cards[0].last_session_with_mistake(), 3);
        assert_eq!(cards[0].mistake_order_in_last_session(), 5);
        assert_eq!(cards[1].attempts(), 0);
    }

    #[test]
    fn test_render() {
        let mut card = Card::new("2+2", "4");
        card.increment_attempts();
        card.increment_correct_answers(1);
        card.increment_attempts();
        card.record_mistake(1, 1);
        assert_eq!(render(&[card], 1), "SESSION_COUNTER;1\n2+2;2;1;1;1;1\n");
    }

    #[test]
    fn test_save_then_load() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("log.txt");
        let mut a = Card::new("a", "1");
        a.update_from_log(7, 3, 4, 5);
        a.restore_mistake_order(2);
        let mut b = Card::new("b", "2");
        b.update_from_log(1, 0, 1, 0);
        let cards = vec![a, b];
        save(&path, &cards, 5)?;
        let db = Database::load(&path);
        assert_eq!(db.session_counter(), 5);
        for card in &cards {
            assert_eq!(db.get(card.question()), Some(&card.performance()));
        }
        Ok(())
    }

    #[test]
    fn test_save_overwrites() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("log.txt");
        write(&path, "SESSION_COUNTER;1\nold;1;1;0;1;1\n")?;
        save(&path, &[Card::new("new", "x")], 2)?;
        let content = read_to_string(&path)?;
        assert_eq!(content, "SESSION_COUNTER;2\nnew;0;0;0;0;0\n");
        Ok(())
    }
}
