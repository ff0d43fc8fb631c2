//! # Dispatch — Named Calls Without Reflection
//!
//! A scene or entity can broadcast a call such as `"Update"` or
//! `"TakeDamage"` to its components. There's no runtime method lookup: a
//! component opts in by implementing [`Component::handle`] and matching on
//! [`Call::method`]. Anything it doesn't recognise it answers with
//! [`Outcome::Unhandled`], which the caller treats as a silent no-op.
//!
//! ```ignore
//! fn handle(&mut self, call: &Call<'_>, _cx: &mut ComponentCx<'_>) -> HandlerResult {
//!     match call.method() {
//!         "TakeDamage" => {
//!             call.expect_arity(1)?;
//!             self.value -= call.arg::<i64>(0)?;
//!             Ok(Outcome::Handled)
//!         }
//!         _ => Ok(Outcome::Unhandled),
//!     }
//! }
//! ```
//!
//! Arguments travel as a slice of [`Value`]s. A handler that finds the wrong
//! number or kind of arguments returns a [`DispatchError`]; that is the only
//! dispatch failure that reaches the caller.
//!
//! [`Component::handle`]: super::component::Component::handle

use std::fmt;

use thiserror::Error;

use super::id::EntityId;
use crate::math::{Vec2, Vec3};

// ── Values ───────────────────────────────────────────────────────────────

/// One argument of a [`Call`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Entity(EntityId),
}

/// The kind of a [`Value`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    Vec2,
    Vec3,
    Entity,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Vec2 => "vec2",
            ValueKind::Vec3 => "vec3",
            ValueKind::Entity => "entity",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Entity(_) => ValueKind::Entity,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    i32 => Int as i64,
    i64 => Int,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float,
    String => Str,
    Vec2 => Vec2,
    Vec3 => Vec3,
    EntityId => Entity,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

/// Types a handler can pull out of a [`Value`] with [`Call::arg`].
///
/// Conversions are strict: an `Int` is not accepted where a float is
/// expected. The one exception is `f32`, which narrows a `Float`.
pub trait FromValue: Sized {
    const KIND: ValueKind;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => Str,
    Vec2 => Vec2,
    Vec3 => Vec3,
    EntityId => Entity,
}

impl FromValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v as f32),
            _ => None,
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// A handler accepted a call but could not carry it out.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("`{method}` expects {expected} argument(s), got {found}")]
    Arity {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("`{method}` is missing argument {index}")]
    MissingArgument { method: String, index: usize },

    #[error("`{method}` argument {index} should be {expected}, got {found}")]
    ArgumentType {
        method: String,
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("`{method}` failed: {reason}")]
    Handler { method: String, reason: String },
}

// ── Calls ────────────────────────────────────────────────────────────────

/// Whether a component recognised a [`Call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Unhandled,
}

/// What [`Component::handle`](super::component::Component::handle) returns.
pub type HandlerResult = Result<Outcome, DispatchError>;

/// A named call with its arguments, as seen by a handler.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    method: &'a str,
    args: &'a [Value],
}

impl<'a> Call<'a> {
    pub fn new(method: &'a str, args: &'a [Value]) -> Self {
        Self { method, args }
    }

    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Fail unless exactly `expected` arguments were passed.
    pub fn expect_arity(&self, expected: usize) -> Result<(), DispatchError> {
        if self.args.len() == expected {
            Ok(())
        } else {
            Err(DispatchError::Arity {
                method: self.method.to_string(),
                expected,
                found: self.args.len(),
            })
        }
    }

    /// Read argument `index` as a `T`.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T, DispatchError> {
        let value = self.value(index)?;
        T::from_value(value).ok_or_else(|| self.type_error(index, T::KIND, value))
    }

    /// Borrow argument `index` as a string slice.
    pub fn arg_str(&self, index: usize) -> Result<&'a str, DispatchError> {
        match self.value(index)? {
            Value::Str(s) => Ok(s),
            other => Err(self.type_error(index, ValueKind::Str, other)),
        }
    }

    /// Build a [`DispatchError::Handler`] for this call.
    pub fn fail(&self, reason: impl Into<String>) -> DispatchError {
        DispatchError::Handler {
            method: self.method.to_string(),
            reason: reason.into(),
        }
    }

    fn value(&self, index: usize) -> Result<&'a Value, DispatchError> {
        self.args
            .get(index)
            .ok_or_else(|| DispatchError::MissingArgument {
                method: self.method.to_string(),
                index,
            })
    }

    fn type_error(&self, index: usize, expected: ValueKind, found: &Value) -> DispatchError {
        DispatchError::ArgumentType {
            method: self.method.to_string(),
            index,
            expected,
            found: found.kind(),
        }
    }
}
