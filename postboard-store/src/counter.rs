//! The counter slice. One integer that can be nudged up or down.

use crate::RootState;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CounterState {
    pub value: i64,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CounterAction {
    Increment,
    Decrement,
    IncrementByAmount(i64),
}

/// Saturates at the bounds of `i64`.
#[must_use]
pub fn reduce(state: CounterState, action: CounterAction) -> CounterState {
    let value = match action {
        CounterAction::Increment => state.value.saturating_add(1),
        CounterAction::Decrement => state.value.saturating_sub(1),
        CounterAction::IncrementByAmount(amount) => state.value.saturating_add(amount),
    };

    CounterState { value }
}

#[must_use]
pub fn select_count(state: &RootState) -> i64 {
    state.counter.value
}
