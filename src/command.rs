//! Commands that drive a gauge from another thread or from text.
//!
//! One command per line:
//!
//! ```text
//! left value 1500
//! right marker 350
//! left redzone 1000 250
//! right range 300
//! both 1500 250
//! ignite
//! ```

use std::str::FromStr;

use crate::dial::Side;

#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    SetValue(Side, f64),
    SetBothValues(f64, f64), // left, right
    SetMarker(Side, f64),
    SetRedzone(Side, f64, f64), // range, offset
    SetValueRange(Side, f64),
    Ignite,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' is not a number")]
    Number(String),
    #[error("expected {expected} argument(s) after '{command}'")]
    Arity {
        command: String,
        expected: &'static str,
    },
}

impl FromStr for GaugeCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, rest)) = words.split_first() else {
            return Err(ParseCommandError::Empty);
        };

        match head {
            "ignite" if rest.is_empty() => Ok(GaugeCommand::Ignite),
            "ignite" => Err(arity("ignite", "0")),
            "both" => match rest {
                [left, right] => Ok(GaugeCommand::SetBothValues(number(left)?, number(right)?)),
                _ => Err(arity("both", "2")),
            },
            "left" | "right" => {
                let side = if head == "left" { Side::Left } else { Side::Right };
                let Some((&op, args)) = rest.split_first() else {
                    return Err(arity(head, "an operation and"));
                };
                match (op, args) {
                    ("value", [v]) => Ok(GaugeCommand::SetValue(side, number(v)?)),
                    ("marker", [v]) => Ok(GaugeCommand::SetMarker(side, number(v)?)),
                    ("range", [max]) => Ok(GaugeCommand::SetValueRange(side, number(max)?)),
                    ("redzone", [range]) => Ok(GaugeCommand::SetRedzone(side, number(range)?, 0.0)),
                    ("redzone", [range, offset]) => Ok(GaugeCommand::SetRedzone(
                        side,
                        number(range)?,
                        number(offset)?,
                    )),
                    ("redzone", _) => Err(arity("redzone", "1 or 2")),
                    ("value" | "marker" | "range", _) => Err(arity(op, "1")),
                    _ => Err(ParseCommandError::Unknown(format!("{head} {op}"))),
                }
            }
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

fn number(word: &str) -> Result<f64, ParseCommandError> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseCommandError::Number(word.to_string()))
}

fn arity(command: &str, expected: &'static str) -> ParseCommandError {
    ParseCommandError::Arity {
        command: command.to_string(),
        expected,
    }
}
