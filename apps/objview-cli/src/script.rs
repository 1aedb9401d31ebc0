//! Key scripts for headless replay.
//!
//! A script is a comma-separated list of steps `KEYS[:FRAMES]`. `KEYS` is a
//! `+`-joined list of control letters held together (`W+Q`), or `-` for a
//! step with nothing held. `FRAMES` defaults to 1.
//!
//! `W:10,Q:30` holds W for ten frames, then Q for thirty.

use objview_kernel::Control;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("empty step at position {0}")]
    EmptyStep(usize),
    #[error("unknown control key {key:?} in step {step:?}")]
    UnknownKey { step: String, key: String },
    #[error("invalid frame count {count:?} in step {step:?}")]
    BadCount { step: String, count: String },
}

/// One script step: a set of held controls and how many frames to hold them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub held: Vec<Control>,
    pub frames: u32,
}

pub fn parse(script: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (position, raw) in script.split(',').enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScriptError::EmptyStep(position));
        }

        let (keys, count) = match raw.split_once(':') {
            Some((keys, count)) => (keys.trim(), Some(count.trim())),
            None => (raw, None),
        };

        let frames = match count {
            Some(count) => count.parse::<u32>().map_err(|_| ScriptError::BadCount {
                step: raw.to_string(),
                count: count.to_string(),
            })?,
            None => 1,
        };

        let held = if keys == "-" {
            Vec::new()
        } else {
            keys.split('+')
                .map(|key| parse_key(raw, key.trim()))
                .collect::<Result<Vec<_>, _>>()?
        };

        steps.push(Step { held, frames });
    }
    Ok(steps)
}

fn parse_key(step: &str, key: &str) -> Result<Control, ScriptError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Control::from_label(c),
        _ => None,
    }
    .ok_or_else(|| ScriptError::UnknownKey {
        step: step.to_string(),
        key: key.to_string(),
    })
}
