//! Constructors, argument state, and provider-supplied operations.
//!
//! A parameterized constructor is driven through an [`ArgumentState`]: the
//! caller fills slots one at a time in whatever order data arrives, then
//! [`ConstructorModel::build`] consumes the state and invokes the factory once.

use std::fmt;
use std::sync::Arc;

use crate::types::TypeId;
use crate::value::Value;

/// Errors raised by provider-supplied operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructError {
    /// A required constructor argument was never supplied.
    #[error("missing required argument `{0}`")]
    MissingArgument(String),

    /// The provider refused the input (validation failure).
    #[error("rejected: {0}")]
    Rejected(String),

    /// A parameter position that the constructor has no slot for.
    #[error("argument position {position} is out of range for arity {arity}")]
    ArgumentPosition { position: usize, arity: usize },

    /// An operation was applied to a value of the wrong shape.
    #[error("expected {expected}, found {found}")]
    InvalidTarget {
        expected: &'static str,
        found: &'static str,
    },
}

/// Builds a value from positional arguments.
pub type FactoryFn = Arc<dyn Fn(Vec<Value>) -> Result<Value, ConstructError> + Send + Sync>;
/// Appends one element to a mutable container.
pub type AddFn = Arc<dyn Fn(&mut Value, Value) -> Result<(), ConstructError> + Send + Sync>;
/// Inserts one key/value pair into a mutable dictionary.
pub type InsertFn =
    Arc<dyn Fn(&mut Value, Value, Value) -> Result<(), ConstructError> + Send + Sync>;
/// Reads a member from an instance.
pub type GetterFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;
/// Writes a member on an instance.
pub type SetterFn = Arc<dyn Fn(&mut Value, Value) -> Result<(), ConstructError> + Send + Sync>;

/// Constructor parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterModel {
    pub name: String,
    pub type_id: TypeId,
    pub position: usize,
    /// Whether the caller must supply the argument.
    pub required: bool,
    /// Value used when an optional argument is not supplied.
    pub default: Option<Value>,
}

impl ParameterModel {
    pub fn required(name: impl Into<String>, type_id: TypeId, position: usize) -> Self {
        Self {
            name: name.into(),
            type_id,
            position,
            required: true,
            default: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        type_id: TypeId,
        position: usize,
        default: Value,
    ) -> Self {
        Self {
            name: name.into(),
            type_id,
            position,
            required: false,
            default: Some(default),
        }
    }
}

/// Constructor descriptor with its factory.
#[derive(Clone)]
pub struct ConstructorModel {
    pub parameters: Vec<ParameterModel>,
    pub accessible: bool,
    factory: FactoryFn,
}

impl fmt::Debug for ConstructorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorModel")
            .field("parameters", &self.parameters)
            .field("accessible", &self.accessible)
            .finish_non_exhaustive()
    }
}

impl ConstructorModel {
    pub fn new(
        parameters: Vec<ParameterModel>,
        factory: impl Fn(Vec<Value>) -> Result<Value, ConstructError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            parameters,
            accessible: true,
            factory: Arc::new(factory),
        }
    }

    /// Zero-parameter constructor producing `value` each time.
    pub fn default_value(value: Value) -> Self {
        Self::new(Vec::new(), move |_| Ok(value.clone()))
    }

    /// Mark the constructor as not callable by the engine.
    pub fn private(mut self) -> Self {
        self.accessible = false;
        self
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Create an empty argument carrier for this constructor.
    pub fn argument_state(&self) -> ArgumentState {
        ArgumentState {
            slots: vec![None; self.parameters.len()],
        }
    }

    /// Consume the argument state and invoke the factory.
    ///
    /// Arguments are read by each parameter's position and passed in
    /// parameter order. Missing optional arguments take their declared
    /// default (or null); missing required ones fail without calling the
    /// factory.
    pub fn build(&self, mut state: ArgumentState) -> Result<Value, ConstructError> {
        let mut args = Vec::with_capacity(self.parameters.len());
        for param in &self.parameters {
            let slot = state.slots.get_mut(param.position).and_then(Option::take);
            let arg = match slot {
                Some(value) => value,
                None if param.required => {
                    return Err(ConstructError::MissingArgument(param.name.clone()));
                }
                None => param.default.clone().unwrap_or(Value::Null),
            };
            args.push(arg);
        }
        (self.factory)(args)
    }

    /// Invoke the factory with no arguments (zero-arity constructors).
    pub fn invoke_default(&self) -> Result<Value, ConstructError> {
        self.build(self.argument_state())
    }
}

/// Mutable carrier for constructor arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgumentState {
    slots: Vec<Option<Value>>,
}

impl ArgumentState {
    /// Set the argument at `position`, replacing any earlier value.
    ///
    /// Fails if `position` is outside the constructor's parameter list.
    pub fn set(&mut self, position: usize, value: Value) -> Result<(), ConstructError> {
        let arity = self.slots.len();
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(ConstructError::ArgumentPosition { position, arity })?;
        *slot = Some(value);
        Ok(())
    }

    pub fn is_set(&self, position: usize) -> bool {
        self.slots.get(position).is_some_and(Option::is_some)
    }

    /// Number of slots filled so far.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }
}
