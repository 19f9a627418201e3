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

/// Represents the persisted performance information for a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Performance {
    /// The number of times the card has been presented.
    pub attempts: usize,
    /// The number of wrong answers.
    pub mistakes: usize,
    /// The number of right answers.
    pub correct_answers: usize,
    /// The session of the most recent mistake, or zero.
    pub last_session_with_mistake: usize,
    /// The order of that mistake within its session.
    pub mistake_order_in_last_session: usize,
}
