//! JSON script loading.
//!
//! # Format
//!
//! ```json
//! [
//!   {
//!     "name": "zako",
//!     "list": [
//!       [
//!         { "type": "Move", "args": [270, 120] },
//!         { "type": "Wait", "args": [1.5] },
//!         { "type": "Delete" }
//!       ]
//!     ]
//!   }
//! ]
//! ```
//!
//! Each `list` entry is one sequence. `args` fill up to three positional
//! parameters; missing ones are zero and extras are ignored.
//!
//! A malformed step (wrong value kinds, unknown `type`) aborts the list it
//! belongs to: sequences parsed so far, including the truncated one, are
//! kept and the next list is loaded normally. Entries without a `name` or a
//! `list` array are skipped. Only a file that is not JSON, or whose root is
//! not an array, fails as a whole.

use std::error::Error;
use std::path::Path;

use arrayvec::ArrayVec;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::action::script::{STEP_PARAM_COUNT, ScriptSet, ScriptStep, Sequence, StepKind};

#[derive(Deserialize, Debug)]
struct RawStep {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    args: Vec<f32>,
}

/// Parse every script set in a JSON document.
pub fn parse_script_sets(json: &str) -> Result<Vec<ScriptSet>, Box<dyn Error>> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Array(entries) = root else {
        return Err("script file root must be an array".into());
    };

    let mut sets = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if let Some(set) = parse_script_set(index, entry) {
            sets.push(set);
        }
    }
    Ok(sets)
}

/// Read and parse a script file.
pub fn load_script_sets(path: impl AsRef<Path>) -> Result<Vec<ScriptSet>, Box<dyn Error>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let sets = parse_script_sets(&contents)?;
    info!("Loaded {} script list(s) from {}", sets.len(), path.display());
    Ok(sets)
}

fn parse_script_set(index: usize, entry: &Value) -> Option<ScriptSet> {
    let Some(name) = entry.get("name").and_then(Value::as_str) else {
        warn!("Script entry #{} has no string 'name', skipped", index);
        return None;
    };
    let Some(list) = entry.get("list").and_then(Value::as_array) else {
        warn!("Script list '{}' has no 'list' array, skipped", name);
        return None;
    };

    let mut sequences = Vec::with_capacity(list.len());
    for (seq_index, raw_sequence) in list.iter().enumerate() {
        let Some(raw_steps) = raw_sequence.as_array() else {
            warn!(
                "Script list '{}': sequence {} is not an array, list truncated",
                name, seq_index
            );
            break;
        };

        let mut steps = Vec::with_capacity(raw_steps.len());
        let mut aborted = false;
        for (step_index, raw_step) in raw_steps.iter().enumerate() {
            match parse_step(raw_step) {
                Ok(step) => steps.push(step),
                Err(e) => {
                    warn!(
                        "Script list '{}': sequence {} step {}: {}; list truncated",
                        name, seq_index, step_index, e
                    );
                    aborted = true;
                    break;
                }
            }
        }
        sequences.push(Sequence::new(steps));
        if aborted {
            break;
        }
    }

    Some(ScriptSet::new(name, sequences))
}

fn parse_step(value: &Value) -> Result<ScriptStep, Box<dyn Error>> {
    let raw = RawStep::deserialize(value)?;
    let kind = StepKind::from_keyword(&raw.kind)
        .ok_or_else(|| format!("unknown step type '{}'", raw.kind))?;

    let slots: ArrayVec<f32, STEP_PARAM_COUNT> =
        raw.args.iter().copied().take(STEP_PARAM_COUNT).collect();
    let mut params = [0.0; STEP_PARAM_COUNT];
    params[..slots.len()].copy_from_slice(&slots);

    Ok(ScriptStep::from_params(kind, params))
}
