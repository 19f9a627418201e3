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

/// The identity of the current run and the sequence of its mistakes.
pub struct Session {
    /// This run's session number. Always at least one.
    number: usize,
    /// How many mistakes have been made so far in this run.
    mistake_count: usize,
}

impl Session {
    /// Start the session following the one last saved to the log. The number
    /// saturates rather than wrapping to zero, which would mean "no mistake".
    pub fn after(previous: usize) -> Self {
        let number = previous.checked_add(1).unwrap_or_else(|| {
            log::warn!("session counter {previous} cannot be advanced");
            previous
        });
        Self {
            number,
            mistake_count: 0,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn mistake_count(&self) -> usize {
        self.mistake_count
    }

    /// Advance the mistake sequencer, returning the order of the new mistake.
    pub fn next_mistake_order(&mut self) -> usize {
        self.mistake_count += 1;
        self.mistake_count
    }
}
