//! The narrow view the compiler core needs of a host-evaluated definition
//! value. Mirrors the `as_int`/`as_float`/`as_string`/`as_sequence`
//! interface sketched in the design notes: a single owned enum stands in
//! for whatever reference-counted object model the concrete scripting
//! host uses, so the rest of the crate never depends on one.

use std::fmt;

/// One value as produced by a `ModuleLoader`: an integer, a float, a
/// string, or a nested sequence of further values. `Deserialize` is
/// untagged so a `JsonLoader` manifest can write plain JSON numbers,
/// strings and arrays without a wrapper tag.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
}

/// Why a `Value` could not be read as the type an emitter expected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("index {0} out of range")]
    OutOfRange(usize),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
        }
    }

    pub fn as_int(&self) -> Result<i64, ValueError> {
        match self {
            Value::Int(v) => Ok(*v),
            other => Err(ValueError::WrongType {
                expected: "int",
                found: other.kind(),
            }),
        }
    }

    pub fn as_float(&self) -> Result<f64, ValueError> {
        match self {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            other => Err(ValueError::WrongType {
                expected: "float",
                found: other.kind(),
            }),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::Str(v) => Ok(v.as_str()),
            other => Err(ValueError::WrongType {
                expected: "string",
                found: other.kind(),
            }),
        }
    }

    pub fn as_seq(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::Seq(v) => Ok(v.as_slice()),
            other => Err(ValueError::WrongType {
                expected: "sequence",
                found: other.kind(),
            }),
        }
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Value::Seq(v) => v.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<&Value, ValueError> {
        self.as_seq()?.get(index).ok_or(ValueError::OutOfRange(index))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Seq(_) => write!(f, "<sequence>"),
        }
    }
}
