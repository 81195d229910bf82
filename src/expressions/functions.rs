//! Functions callable from expressions.
//!
//! Function calls are the only place where evaluation may suspend: a
//! [`Function`] returns a boxed future that the calculator awaits before it
//! moves on to the next token.
mod defaults;

use futures::future::{self, BoxFuture, FutureExt};

use crate::errors::{Error, ErrorCode, Result};
use crate::variants::{Variant, VariantOperations};

/// A function that can be called by name from an expression.
pub trait Function: Send + Sync {
    fn name(&self) -> &str;

    /// Computes the result from arguments given in source order.
    fn calculate<'a>(
        &'a self,
        args: Vec<Variant>,
        operations: &'a dyn VariantOperations,
    ) -> BoxFuture<'a, Result<Variant>>;
}

/// Registry of functions an expression is evaluated against.
pub trait Functions {
    /// Finds a function by name, ignoring case.
    fn find_by_name(&self, name: &str) -> Option<&dyn Function>;
}

/// Synchronous body of a [`DelegatedFunction`].
pub type FunctionCalculator =
    dyn Fn(&[Variant], &dyn VariantOperations) -> Result<Variant> + Send + Sync;

/// Function implemented by a closure.
///
/// # Examples
///
/// ```
/// use stamen::expressions::{DelegatedFunction, Function};
/// use stamen::variants::TypeUnsafeVariantOperations;
/// use stamen::Variant;
///
/// let twice = DelegatedFunction::new("Twice", |args, ops| ops.mul(&args[0], &Variant::Integer(2)));
/// let result = futures::executor::block_on(
///     twice.calculate(vec![Variant::Integer(21)], &TypeUnsafeVariantOperations),
/// );
/// assert_eq!(result.unwrap(), Variant::Integer(42));
/// ```
pub struct DelegatedFunction {
    name: String,
    calculator: Box<FunctionCalculator>,
}

impl DelegatedFunction {
    pub fn new<F>(name: impl Into<String>, calculator: F) -> Self
    where
        F: Fn(&[Variant], &dyn VariantOperations) -> Result<Variant> + Send + Sync + 'static,
    {
        DelegatedFunction {
            name: name.into(),
            calculator: Box::new(calculator),
        }
    }
}

impl Function for DelegatedFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate<'a>(
        &'a self,
        args: Vec<Variant>,
        operations: &'a dyn VariantOperations,
    ) -> BoxFuture<'a, Result<Variant>> {
        future::ready((self.calculator)(&args, operations)).boxed()
    }
}

/// Ordered list of functions with case-insensitive lookup.
#[derive(Default)]
pub struct FunctionCollection {
    functions: Vec<Box<dyn Function>>,
}

impl FunctionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, function: impl Function + 'static) {
        self.functions.push(Box::new(function));
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|function| function.name())
    }

    pub fn remove_by_name(&mut self, name: &str) {
        self.functions
            .retain(|function| !function.name().eq_ignore_ascii_case(name));
    }

    pub fn clear(&mut self) {
        self.functions.clear();
    }
}

impl Functions for FunctionCollection {
    fn find_by_name(&self, name: &str) -> Option<&dyn Function> {
        self.functions
            .iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
            .map(|function| function.as_ref())
    }
}

/// Fails with `WRONG_PARAM_COUNT` unless exactly `expected` arguments were
/// passed.
pub fn check_param_count(name: &str, args: &[Variant], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::new(
            ErrorCode::WrongParamCount,
            format!("Function {} expects {} arguments, got {}", name, expected, args.len()),
        ));
    }
    Ok(())
}

/// Fails with `WRONG_PARAM_COUNT` when fewer than `minimum` arguments were
/// passed.
pub fn check_min_param_count(name: &str, args: &[Variant], minimum: usize) -> Result<()> {
    if args.len() < minimum {
        return Err(Error::new(
            ErrorCode::WrongParamCount,
            format!(
                "Function {} expects at least {} arguments, got {}",
                name,
                minimum,
                args.len()
            ),
        ));
    }
    Ok(())
}
