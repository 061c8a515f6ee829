//! Tick label numbering.

use crate::dial::Side;
use crate::error::GaugeError;

/// Highest label slot in the numbered artwork.
pub const FIRST_LABEL_SLOT: u32 = 43;

/// Slots at or above this number belong to the left dial.
pub const LEFT_SLOT_THRESHOLD: u32 = 23;

/// Evenly spaced integer ticks from `min` to `max` inclusive.
///
/// Step counts from `steps_wanted - 1` down to 2 are tried in turn and the
/// first that divides `max - min` exactly wins, so the finest even stepping
/// that still fits in `steps_wanted` ticks is preferred.
pub fn generate_numbers(min: i64, max: i64, steps_wanted: usize) -> Result<Vec<i64>, GaugeError> {
    if max <= min {
        return Err(GaugeError::Configuration(format!(
            "tick range {min}..{max} has no span"
        )));
    }
    let span = max.checked_sub(min).ok_or_else(|| {
        GaugeError::Configuration(format!("tick range {min}..{max} is too wide"))
    })?;
    let step = (2..steps_wanted as i64)
        .rev()
        .find(|count| span % count == 0)
        .map(|count| span / count)
        .ok_or_else(|| {
            GaugeError::Configuration(format!(
                "no integer step splits {min}..{max} into at most {steps_wanted} ticks"
            ))
        })?;

    Ok((0..=span / step).map(|i| min + i * step).collect())
}

/// Node ids of a dial's label slots, lowest value first.
pub fn label_ids(side: Side) -> Vec<String> {
    (1..=FIRST_LABEL_SLOT)
        .rev()
        .step_by(2)
        .filter(|n| match side {
            Side::Left => *n >= LEFT_SLOT_THRESHOLD,
            Side::Right => *n < LEFT_SLOT_THRESHOLD,
        })
        .map(|n| format!("text-{n}"))
        .collect()
}

/// Tick value for each of `slots` slots; slots past the last tick get `None`.
pub fn label_values(max: f64, slots: usize) -> Result<Vec<Option<i64>>, GaugeError> {
    if max.fract() != 0.0 {
        return Err(GaugeError::Configuration(format!(
            "tick labels need an integer maximum, got {max}"
        )));
    }
    let numbers = generate_numbers(0, max as i64, slots)?;
    Ok((0..slots).map(|i| numbers.get(i).copied()).collect())
}
