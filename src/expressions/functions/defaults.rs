use std::f64::consts;

use crate::errors::{Error, ErrorCode, Result};
use crate::variants::{Variant, VariantOperations, VariantType};

use super::{DelegatedFunction, FunctionCollection, check_min_param_count, check_param_count};

fn number(name: &str, value: &Variant) -> Result<f64> {
    value.as_float().ok_or_else(|| {
        Error::new(
            ErrorCode::BadParamType,
            format!(
                "Function {} expects a numeric argument, got {}",
                name,
                value.variant_type()
            ),
        )
    })
}

/// One-argument float function; null in, null out.
fn float_function(name: &'static str, apply: fn(f64) -> f64) -> DelegatedFunction {
    DelegatedFunction::new(name, move |args, _| {
        check_param_count(name, args, 1)?;
        if args[0].is_null() {
            return Ok(Variant::Null);
        }
        Ok(Variant::Float(apply(number(name, &args[0])?)))
    })
}

/// One-argument rounding function; integers pass through unchanged.
fn rounding_function(name: &'static str, apply: fn(f64) -> f64) -> DelegatedFunction {
    DelegatedFunction::new(name, move |args, _| {
        check_param_count(name, args, 1)?;
        match &args[0] {
            Variant::Null => Ok(Variant::Null),
            Variant::Integer(n) => Ok(Variant::Integer(*n)),
            other => Ok(Variant::Float(apply(number(name, other)?))),
        }
    })
}

fn constant(name: &'static str, value: f64) -> DelegatedFunction {
    DelegatedFunction::new(name, move |args, _| {
        check_param_count(name, args, 0)?;
        Ok(Variant::Float(value))
    })
}

fn min(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant> {
    check_min_param_count("Min", args, 1)?;
    let mut result = args[0].clone();
    for arg in &args[1..] {
        if ops.less(arg, &result)?.as_bool() {
            result = arg.clone();
        }
    }
    Ok(result)
}

fn max(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant> {
    check_min_param_count("Max", args, 1)?;
    let mut result = args[0].clone();
    for arg in &args[1..] {
        if ops.more(arg, &result)?.as_bool() {
            result = arg.clone();
        }
    }
    Ok(result)
}

fn sum(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant> {
    check_min_param_count("Sum", args, 1)?;
    let mut result = args[0].clone();
    for arg in &args[1..] {
        result = ops.add(&result, arg)?;
    }
    Ok(result)
}

fn if_function(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant> {
    check_param_count("If", args, 3)?;
    let chosen = if args[0].as_bool() { &args[1] } else { &args[2] };
    Ok(chosen.clone())
}

/// `Choose(index, value1, value2, ...)` with a 1-based index; out of range
/// yields null.
fn choose(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant> {
    check_min_param_count("Choose", args, 2)?;
    let index = ops.convert(&args[0], VariantType::Integer)?.as_int();
    Ok(index
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i >= 1)
        .and_then(|i| args.get(i))
        .cloned()
        .unwrap_or(Variant::Null))
}

fn abs(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant> {
    check_param_count("Abs", args, 1)?;
    match &args[0] {
        Variant::Null => Ok(Variant::Null),
        Variant::Integer(n) => n.checked_abs().map(Variant::Integer).ok_or_else(|| {
            Error::new(ErrorCode::UnsupportedOperation, "Integer overflow in Abs")
        }),
        other => Ok(Variant::Float(number("Abs", other)?.abs())),
    }
}

/// `Round(value)` or `Round(value, digits)`.
fn round(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant> {
    if args.len() != 2 {
        check_param_count("Round", args, 1)?;
    }
    let value = match &args[0] {
        Variant::Null => return Ok(Variant::Null),
        Variant::Integer(n) => return Ok(Variant::Integer(*n)),
        other => number("Round", other)?,
    };
    let digits = match args.get(1) {
        Some(digits) => ops.convert(digits, VariantType::Integer)?.as_int().unwrap_or(0),
        None => 0,
    };
    let factor = 10f64.powi(digits.clamp(-308, 308) as i32);
    Ok(Variant::Float((value * factor).round() / factor))
}

fn sqr(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant> {
    check_param_count("Sqr", args, 1)?;
    ops.mul(&args[0], &args[0])
}

fn empty(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant> {
    check_param_count("Empty", args, 1)?;
    let empty = match &args[0] {
        Variant::Null => true,
        Variant::String(s) => s.is_empty(),
        Variant::Array(items) => items.is_empty(),
        Variant::Object(map) => map.is_empty(),
        _ => false,
    };
    Ok(Variant::Boolean(empty))
}

fn null(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant> {
    check_param_count("Null", args, 0)?;
    Ok(Variant::Null)
}

/// `Contains(container, value)`
fn contains(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant> {
    check_param_count("Contains", args, 2)?;
    ops.is_in(&args[1], &args[0])
}

fn array(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant> {
    Ok(Variant::Array(args.to_vec()))
}

impl FunctionCollection {
    /// Creates a collection with the standard function library.
    #[doc(alias = "DefaultFunctionCollection")]
    pub fn with_defaults() -> Self {
        let mut functions = FunctionCollection::new();

        functions.add(DelegatedFunction::new("Min", min));
        functions.add(DelegatedFunction::new("Max", max));
        functions.add(DelegatedFunction::new("Sum", sum));
        functions.add(DelegatedFunction::new("If", if_function));
        functions.add(DelegatedFunction::new("Choose", choose));
        functions.add(constant("E", consts::E));
        functions.add(constant("Pi", consts::PI));
        functions.add(DelegatedFunction::new("Abs", abs));

        let float_functions: [(&'static str, fn(f64) -> f64); 11] = [
            ("Acos", f64::acos),
            ("Asin", f64::asin),
            ("Atan", f64::atan),
            ("Exp", f64::exp),
            ("Log", f64::ln),
            ("Ln", f64::ln),
            ("Log10", f64::log10),
            ("Cos", f64::cos),
            ("Sin", f64::sin),
            ("Tan", f64::tan),
            ("Sqrt", f64::sqrt),
        ];
        for (name, apply) in float_functions {
            functions.add(float_function(name, apply));
        }
        functions.add(rounding_function("Ceil", f64::ceil));
        functions.add(rounding_function("Floor", f64::floor));
        functions.add(rounding_function("Trunc", f64::trunc));
        functions.add(DelegatedFunction::new("Round", round));

        functions.add(DelegatedFunction::new("Sqr", sqr));
        functions.add(DelegatedFunction::new("Empty", empty));
        functions.add(DelegatedFunction::new("Null", null));
        functions.add(DelegatedFunction::new("Contains", contains));
        functions.add(DelegatedFunction::new("Array", array));

        functions
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::expressions::functions::{Function, Functions};
    use crate::variants::TypeUnsafeVariantOperations;

    fn call(name: &str, args: Vec<Variant>) -> Result<Variant> {
        let functions = FunctionCollection::with_defaults();
        let function: &dyn Function = functions
            .find_by_name(name)
            .unwrap_or_else(|| panic!("{} is not registered", name));
        block_on(function.calculate(args, &TypeUnsafeVariantOperations))
    }

    #[test]
    fn test_library_names() {
        let functions = FunctionCollection::with_defaults();
        for name in [
            "Min", "Max", "Sum", "If", "Choose", "E", "Pi", "Abs", "Acos", "Asin", "Atan", "Exp",
            "Log", "Ln", "Log10", "Ceil", "Floor", "Round", "Trunc", "Cos", "Sin", "Tan", "Sqr",
            "Sqrt", "Empty", "Null", "Contains", "Array",
        ] {
            assert!(functions.find_by_name(name).is_some(), "{}", name);
        }
        assert_eq!(functions.len(), 28);
    }

    #[test]
    fn test_null_and_empty() {
        assert_eq!(call("null", vec![]).unwrap(), Variant::Null);
        assert_eq!(call("Empty", vec![Variant::Array(vec![])]).unwrap(), Variant::Boolean(true));
        assert_eq!(call("Empty", vec![Variant::Integer(0)]).unwrap(), Variant::Boolean(false));
    }

    #[test]
    fn test_float_functions_pass_null() {
        assert_eq!(call("Cos", vec![Variant::Null]).unwrap(), Variant::Null);
        assert_eq!(call("Log10", vec![Variant::Integer(100)]).unwrap(), Variant::Float(2.0));
    }

    #[test]
    fn test_rounding_functions_keep_integers() {
        for name in ["Ceil", "Floor", "Trunc"] {
            assert_eq!(call(name, vec![Variant::Integer(7)]).unwrap(), Variant::Integer(7), "{}", name);
            assert_eq!(call(name, vec![Variant::Null]).unwrap(), Variant::Null, "{}", name);
        }
        assert_eq!(call("Trunc", vec![Variant::Float(-2.7)]).unwrap(), Variant::Float(-2.0));
        assert_eq!(call("Ceil", vec![Variant::Float(-2.7)]).unwrap(), Variant::Float(-2.0));
    }

    #[test]
    fn test_round_argument_count() {
        assert_eq!(call("Round", vec![Variant::Float(2.5)]).unwrap(), Variant::Float(3.0));
        let err = call("Round", vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::WrongParamCount);
    }

    #[test]
    fn test_abs_overflow() {
        let err = call("Abs", vec![Variant::Integer(i64::MIN)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedOperation);
    }

    #[test]
    fn test_contains_array() {
        let items = Variant::Array(vec![Variant::from("a"), Variant::from("b")]);
        assert_eq!(call("Contains", vec![items, Variant::from("b")]).unwrap(), Variant::Boolean(true));
    }
}
