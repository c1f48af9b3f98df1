//! Editable-table binding contract.
//!
//! The presentation layer renders a collection of rows with per-column edit
//! affordances and reports edits back as `(row_index, column_key, value)`.
//! The row mutations themselves are pure array operations so reordering and
//! deletion can never mutate ids or drop fields.

/// How a column's cells may be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    ReadOnly,
    Text,
    Number { allow_negative: bool },
}

/// Description of one table column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub key: &'static str,
    pub kind: EditKind,
}

impl Column {
    pub const fn new(header: &'static str, key: &'static str, kind: EditKind) -> Self {
        Self { header, key, kind }
    }
}

/// Move the row at `from` to position `to` as a pure splice: remove at
/// `from`, insert at `to`. The multiset of rows never changes, only their
/// positions. Out-of-range indices leave the list untouched.
pub fn move_row<T>(rows: &mut Vec<T>, from: usize, to: usize) {
    if from >= rows.len() || to >= rows.len() {
        return;
    }
    let row = rows.remove(from);
    rows.insert(to, row);
}

/// Remove the row at `index`, returning it. Out of range returns None.
pub fn remove_row<T>(rows: &mut Vec<T>, index: usize) -> Option<T> {
    if index >= rows.len() {
        return None;
    }
    Some(rows.remove(index))
}

/// Coerce raw cell input to a count: non-numeric input becomes 0, and the
/// value clamps to >= 0 unless negatives are allowed for the column.
pub fn coerce_count(input: &str, allow_negative: bool) -> i64 {
    let value = input.trim().parse::<i64>().unwrap_or(0);
    if !allow_negative && value < 0 {
        0
    } else {
        value
    }
}

/// Apply a stepper increment/decrement, clamping the same way typed input
/// does.
pub fn step_count(value: i64, delta: i64, allow_negative: bool) -> i64 {
    let stepped = value.saturating_add(delta);
    if !allow_negative && stepped < 0 {
        0
    } else {
        stepped
    }
}
