//! Callback contract: the per-operation scope and the context value carrier.
//!
//! Every callback fired during a transition receives a [`Scope`] naming the
//! operation in flight, plus a [`Context`] carrier that is threaded linearly
//! through the callback chain. A callback may read values written by earlier
//! callbacks in the same operation and append values of its own; the caller
//! observes the fully augmented carrier when the operation returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Error a callback may fail with.
///
/// Boxed so collaborators can propagate their own error types with `?`;
/// the machine preserves it as the source of the reported phase failure.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a single callback invocation: the (possibly extended) carrier,
/// or a failure that aborts the remainder of the callback sequence.
pub type CallbackResult = Result<Context, CallbackError>;

/// A hook fired on state entry/exit or at transition start/end.
pub type Callback = Arc<dyn Fn(Scope) -> CallbackResult + Send + Sync>;

/// Append-only key/value bag threaded through one operation's callbacks.
///
/// Values are [`serde_json::Value`], so anything serde can represent fits.
/// Writes to an existing key shadow the earlier value.
///
/// # Example
///
/// ```rust
/// use statecraft::Context;
///
/// let ctx = Context::new()
///     .with("attempt", 1)
///     .with("station", "station_001");
///
/// assert_eq!(ctx.get_as::<i64>("attempt"), Some(1));
/// assert_eq!(ctx.get_as::<String>("station").as_deref(), Some("station_001"));
/// assert!(ctx.get("missing").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    /// Create an empty carrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair, returning the updated carrier.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Read a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a value deserialized into a concrete type.
    ///
    /// Returns `None` when the key is absent or the value does not
    /// deserialize into `T`.
    pub fn get_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The per-operation bundle handed to every callback.
#[derive(Clone, Debug)]
pub struct Scope {
    /// Name of the transition being executed.
    pub transition: String,
    /// Name of the transition's source state.
    pub source: String,
    /// Name of the transition's destination state.
    pub destination: String,
    /// Value carrier threaded through the callback chain.
    pub context: Context,
}

/// Thread a context through an ordered callback list.
///
/// Each callback receives a fresh scope wrapping the carrier as left by its
/// predecessor; the first failure aborts the remainder of the list.
pub(crate) fn run_chain<F>(callbacks: &[Callback], scope: &F, mut context: Context) -> CallbackResult
where
    F: Fn(Context) -> Scope,
{
    for callback in callbacks {
        context = callback(scope(context))?;
    }
    Ok(context)
}
