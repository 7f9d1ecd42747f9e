//! Console calls decoded from JSONL input.
//!
//! Each input line is one call: `{"method":"log","args":["a",1]}`.
//! Labels for `count`/`countReset`/`time`/`timeLog`/`timeEnd` are the first
//! argument; `assert` takes its condition as the first argument.

use super::error::CallError;
use serde::Deserialize;
use serde_json::Value;

/// Label used when a counter or timer call omits one.
pub const DEFAULT_LABEL: &str = "default";

#[derive(Debug, Deserialize)]
struct RawCall {
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

/// A producer call against the console surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCall {
    /// `log(...args)`
    Log(Vec<Value>),
    /// `info(...args)`
    Info(Vec<Value>),
    /// `debug(...args)`
    Debug(Vec<Value>),
    /// `warn(...args)`
    Warn(Vec<Value>),
    /// `error(...args)`
    Error(Vec<Value>),
    /// `group(label?, ...args)`
    Group(Vec<Value>),
    /// `groupCollapsed(label?, ...args)`
    GroupCollapsed(Vec<Value>),
    /// `groupEnd()`
    GroupEnd,
    /// `count(label)`
    Count(String),
    /// `countReset(label)`
    CountReset(String),
    /// `time(label)`
    Time(String),
    /// `timeLog(label, ...args)`
    TimeLog(String, Vec<Value>),
    /// `timeEnd(label)`
    TimeEnd(String),
    /// `table(data, columns?)`
    Table(Vec<Value>),
    /// `trace(...args)`
    Trace(Vec<Value>),
    /// `assert(condition, ...args)`, condition already reduced to a bool.
    Assert(bool, Vec<Value>),
    /// `clear()`
    Clear,
}

impl ConsoleCall {
    /// Decode one JSONL line.
    ///
    /// # Errors
    ///
    /// Returns `CallError::InvalidJson` if the line is not a `{method, args}`
    /// object and `CallError::UnknownMethod` for unrecognized methods.
    pub fn parse(line: &str, line_number: usize) -> Result<Self, CallError> {
        let raw: RawCall = serde_json::from_str(line).map_err(|e| CallError::InvalidJson {
            line: line_number,
            message: e.to_string(),
        })?;

        let mut args = raw.args;
        let call = match raw.method.as_str() {
            "log" => ConsoleCall::Log(args),
            "info" => ConsoleCall::Info(args),
            "debug" => ConsoleCall::Debug(args),
            "warn" => ConsoleCall::Warn(args),
            "error" => ConsoleCall::Error(args),
            "group" => ConsoleCall::Group(args),
            "groupCollapsed" => ConsoleCall::GroupCollapsed(args),
            "groupEnd" => ConsoleCall::GroupEnd,
            "count" => ConsoleCall::Count(take_label(&mut args)),
            "countReset" => ConsoleCall::CountReset(take_label(&mut args)),
            "time" => ConsoleCall::Time(take_label(&mut args)),
            "timeLog" => {
                let label = take_label(&mut args);
                ConsoleCall::TimeLog(label, args)
            }
            "timeEnd" => ConsoleCall::TimeEnd(take_label(&mut args)),
            "table" => ConsoleCall::Table(args),
            "trace" => ConsoleCall::Trace(args),
            "assert" => {
                let condition = if args.is_empty() {
                    false
                } else {
                    !is_falsy(&args.remove(0))
                };
                ConsoleCall::Assert(condition, args)
            }
            "clear" => ConsoleCall::Clear,
            _ => {
                return Err(CallError::UnknownMethod {
                    line: line_number,
                    method: raw.method,
                })
            }
        };

        Ok(call)
    }
}

fn take_label(args: &mut Vec<Value>) -> String {
    if args.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        label_of(&args.remove(0))
    }
}

/// String form of a label value: strings as-is, everything else as JSON.
pub fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Console falsiness: `null`, `false`, `0` and `""`.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
