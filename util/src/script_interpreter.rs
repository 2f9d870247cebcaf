//! # Input script interpreter module
//!
//! This module provides an interpreter for input scripts, which replay timed input messages into
//! the control exec in place of live producers.
//!
//! A script is a sequence of lines of the form `<time_s>: <json>;`, where the JSON is an
//! [`InputMsg`]. For example:
//!
//! ```text
//! 0.0: {"type": "DBW", "payload": true};
//! 0.1: {"type": "VEL", "payload": {"velocity_ms": 0.0}};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use comms_if::input::{InputMsg, InputParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An input which is scripted to occur at a specific time.
pub struct Command {
    /// The time the input is supposed to be delivered at
    exec_time_s: f64,

    /// The input message to deliver
    msg: InputMsg,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_inputs` to
/// acquire a list of inputs that are due.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an invalid input at {0} s: {1}")]
    InvalidInput(f64, InputParseError),
}

pub enum PendingInputs {
    None,
    Some(Vec<InputMsg>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        Self::from_script_str(&script, path)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str<P: AsRef<Path>>(script: &str, path: P) -> Result<Self, ScriptError> {
        // Empty queue of commands
        let mut queue: Vec<Command> = Vec::new();

        // Go through the script executing __the magic regex__. The payload may span several lines
        // (lanes are long), so the body runs up to the terminating semicolon.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("Input script regex is invalid");

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let time_str = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // Parse the input from the payload. The scripts contain JSON only.
            let body = cap.get(3).map(|m| m.as_str()).unwrap_or("");
            let msg = InputMsg::from_json(body)
                .map_err(|e| ScriptError::InvalidInput(exec_time_s, e))?;

            queue.push(Command { exec_time_s, msg });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        // Scripts are not required to be written in time order, but must be replayed in it. The
        // sort is stable so inputs sharing a timestamp keep their script order.
        queue.sort_by(|a, b| {
            a.exec_time_s
                .partial_cmp(&b.exec_time_s)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(ScriptInterpreter {
            _script_path: path.as_ref().to_path_buf(),
            cmds: queue.into(),
        })
    }

    /// Return the inputs due at or before `current_time_s`.
    pub fn get_pending_inputs(&mut self, current_time_s: f64) -> PendingInputs {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingInputs::EndOfScript;
        }

        let mut msgs: Vec<InputMsg> = vec![];

        // Pop items from the queue until the exec times are larger than the current time.
        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s > current_time_s {
                break;
            }
            if let Some(cmd) = self.cmds.pop_front() {
                msgs.push(cmd.msg);
            }
        }

        if msgs.is_empty() {
            PendingInputs::None
        } else {
            PendingInputs::Some(msgs)
        }
    }

    /// Get the number of inputs remaining in the script
    pub fn get_num_inputs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::dbw::StopSignal;

    const SCRIPT: &str = r#"
        0.5: {"type": "STOP", "payload": 12};
        0.0: {"type": "DBW", "payload": true};
        0.0: {"type": "VEL", "payload": {"velocity_ms": 3.0}};
        2.0: {"type": "DBW", "payload": false};
    "#;

    #[test]
    fn test_replay_in_time_order() {
        let mut si = ScriptInterpreter::from_script_str(SCRIPT, "test.dbw").unwrap();
        assert_eq!(si.get_num_inputs(), 4);
        assert_eq!(si.get_duration(), 2.0);

        match si.get_pending_inputs(0.0) {
            PendingInputs::Some(v) => {
                assert_eq!(v.len(), 2);
                assert_eq!(v[0], InputMsg::DbwEnabled(true));
                assert_eq!(v[1].type_str(), "VEL");
            }
            _ => panic!("Expected two pending inputs"),
        }

        assert!(matches!(si.get_pending_inputs(0.4), PendingInputs::None));

        match si.get_pending_inputs(1.0) {
            PendingInputs::Some(v) => assert_eq!(v, vec![InputMsg::Stop(StopSignal::At(12))]),
            _ => panic!("Expected the stop input"),
        }

        assert!(matches!(si.get_pending_inputs(5.0), PendingInputs::Some(_)));
        assert!(matches!(si.get_pending_inputs(5.0), PendingInputs::EndOfScript));
    }

    #[test]
    fn test_bad_scripts() {
        assert!(matches!(
            ScriptInterpreter::from_script_str("nothing to see", "x"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_script_str(r#"1.0: {"type": "WARP", "payload": 9};"#, "x"),
            Err(ScriptError::InvalidInput(t, _)) if t == 1.0
        ));
        assert!(matches!(
            ScriptInterpreter::new("/definitely/not/a/script.dbw"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }
}
