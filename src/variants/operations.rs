use std::cmp::Ordering;

use regex::RegexBuilder;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::errors::{Error, ErrorCode, Result};

use super::{Variant, VariantType};

/// Operations the expression calculator applies to variants.
///
/// Implementors only decide how a value is converted to another type; every
/// operation is built on top of [`VariantOperations::convert`]. Binary
/// operations convert the right operand to the type of the left one, except
/// that an integer mixed with a float is computed as a float.
pub trait VariantOperations: Send + Sync {
    /// Converts `value` to the `target` type.
    fn convert(&self, value: &Variant, target: VariantType) -> Result<Variant>;

    /// Brings the operands of a binary operation to a common type by
    /// converting the right one to the type of the left one.
    fn coerce(&self, left: &Variant, right: &Variant) -> Result<(Variant, Variant)> {
        Ok((left.clone(), self.convert(right, left.variant_type())?))
    }

    fn add(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        if let Some(result) = mixed_numbers(Arithmetic::Add, left, right) {
            return Ok(result);
        }
        match self.coerce(left, right)? {
            (Variant::Integer(a), Variant::Integer(b)) => {
                a.checked_add(b).map(Variant::Integer).ok_or_else(|| overflow("+"))
            }
            (Variant::Float(a), Variant::Float(b)) => Ok(Variant::Float(a + b)),
            (Variant::String(a), Variant::String(b)) => Ok(Variant::String(a + &b)),
            (Variant::Array(mut a), Variant::Array(b)) => {
                a.extend(b);
                Ok(Variant::Array(a))
            }
            (a, b) => Err(unsupported("+", &a, &b)),
        }
    }

    fn sub(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        if let Some(result) = mixed_numbers(Arithmetic::Sub, left, right) {
            return Ok(result);
        }
        match self.coerce(left, right)? {
            (Variant::Integer(a), Variant::Integer(b)) => {
                a.checked_sub(b).map(Variant::Integer).ok_or_else(|| overflow("-"))
            }
            (Variant::Float(a), Variant::Float(b)) => Ok(Variant::Float(a - b)),
            (a, b) => Err(unsupported("-", &a, &b)),
        }
    }

    fn mul(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        if let Some(result) = mixed_numbers(Arithmetic::Mul, left, right) {
            return Ok(result);
        }
        match self.coerce(left, right)? {
            (Variant::Integer(a), Variant::Integer(b)) => {
                a.checked_mul(b).map(Variant::Integer).ok_or_else(|| overflow("*"))
            }
            (Variant::Float(a), Variant::Float(b)) => Ok(Variant::Float(a * b)),
            (a, b) => Err(unsupported("*", &a, &b)),
        }
    }

    fn div(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        if let Some(result) = mixed_numbers(Arithmetic::Div, left, right) {
            return Ok(result);
        }
        match self.coerce(left, right)? {
            (Variant::Integer(_), Variant::Integer(0)) => Err(division_by_zero()),
            (Variant::Integer(a), Variant::Integer(b)) => {
                a.checked_div(b).map(Variant::Integer).ok_or_else(|| overflow("/"))
            }
            (Variant::Float(a), Variant::Float(b)) => Ok(Variant::Float(a / b)),
            (a, b) => Err(unsupported("/", &a, &b)),
        }
    }

    fn modulo(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        if let Some(result) = mixed_numbers(Arithmetic::Mod, left, right) {
            return Ok(result);
        }
        match self.coerce(left, right)? {
            (Variant::Integer(_), Variant::Integer(0)) => Err(division_by_zero()),
            (Variant::Integer(a), Variant::Integer(b)) => {
                a.checked_rem(b).map(Variant::Integer).ok_or_else(|| overflow("%"))
            }
            (Variant::Float(a), Variant::Float(b)) => Ok(Variant::Float(a % b)),
            (a, b) => Err(unsupported("%", &a, &b)),
        }
    }

    fn pow(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        let (left, right) = match (left, right) {
            (l, r) if l.is_numeric() && r.is_numeric() => (l.clone(), r.clone()),
            (l, r) => self.coerce(l, r)?,
        };
        match (&left, &right) {
            (Variant::Integer(a), Variant::Integer(b)) => match u32::try_from(*b) {
                Ok(exponent) => a.checked_pow(exponent).map(Variant::Integer).ok_or_else(|| overflow("^")),
                Err(_) => Ok(Variant::Float((*a as f64).powf(*b as f64))),
            },
            (l, r) => match (l.as_float(), r.as_float()) {
                (Some(a), Some(b)) => Ok(Variant::Float(a.powf(b))),
                _ => Err(unsupported("^", l, r)),
            },
        }
    }

    fn negative(&self, value: &Variant) -> Result<Variant> {
        match value {
            Variant::Null => Ok(Variant::Null),
            Variant::Integer(n) => n.checked_neg().map(Variant::Integer).ok_or_else(|| overflow("-")),
            Variant::Float(n) => Ok(Variant::Float(-n)),
            other => Err(Error::new(
                ErrorCode::UnsupportedOperation,
                format!("Operation '-' is not supported for {}", other.variant_type()),
            )),
        }
    }

    fn lsh(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        shift(self, "<<", left, right, |a, b| a.checked_shl(b))
    }

    fn rsh(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        shift(self, ">>", left, right, |a, b| a.checked_shr(b))
    }

    fn not(&self, value: &Variant) -> Result<Variant> {
        match value {
            Variant::Null => Ok(Variant::Null),
            Variant::Boolean(b) => Ok(Variant::Boolean(!b)),
            Variant::Integer(n) => Ok(Variant::Integer(!n)),
            other => match self.convert(other, VariantType::Boolean)? {
                Variant::Boolean(b) => Ok(Variant::Boolean(!b)),
                converted => Err(unsupported("NOT", other, &converted)),
            },
        }
    }

    fn and(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        logical(self, "AND", left, right, |a, b| a && b, |a, b| a & b)
    }

    fn or(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        logical(self, "OR", left, right, |a, b| a || b, |a, b| a | b)
    }

    fn xor(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        logical(self, "XOR", left, right, |a, b| a ^ b, |a, b| a ^ b)
    }

    /// Orders two values; `None` when either side is null or the values are
    /// not comparable (NaN).
    fn compare(&self, left: &Variant, right: &Variant) -> Result<Option<Ordering>> {
        if left.is_null() || right.is_null() {
            return Ok(None);
        }
        match (left, right) {
            (Variant::Integer(a), Variant::Integer(b)) => return Ok(Some(a.cmp(b))),
            (l, r) if l.is_numeric() && r.is_numeric() => {
                return Ok(l.as_float().zip(r.as_float()).and_then(|(a, b)| a.partial_cmp(&b)));
            }
            _ => {}
        }
        match self.coerce(left, right)? {
            (Variant::Integer(a), Variant::Integer(b)) => Ok(Some(a.cmp(&b))),
            (Variant::Float(a), Variant::Float(b)) => Ok(a.partial_cmp(&b)),
            (Variant::String(a), Variant::String(b)) => Ok(Some(a.cmp(&b))),
            (Variant::Boolean(a), Variant::Boolean(b)) => Ok(Some(a.cmp(&b))),
            (a, b) => Err(unsupported("compare", &a, &b)),
        }
    }

    fn equal(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        match (left, right) {
            (Variant::Null, Variant::Null) => Ok(Variant::Boolean(true)),
            (Variant::Null, _) | (_, Variant::Null) => Ok(Variant::Boolean(false)),
            (l, r) if l.is_numeric() && r.is_numeric() => {
                Ok(Variant::Boolean(self.compare(l, r)? == Some(Ordering::Equal)))
            }
            (l, r) => {
                let (l, r) = self.coerce(l, r)?;
                Ok(Variant::Boolean(l == r))
            }
        }
    }

    fn not_equal(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        let equal = self.equal(left, right)?;
        Ok(Variant::Boolean(!equal.as_bool()))
    }

    fn more(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        let ordering = self.compare(left, right)?;
        Ok(Variant::Boolean(ordering == Some(Ordering::Greater)))
    }

    fn less(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        let ordering = self.compare(left, right)?;
        Ok(Variant::Boolean(ordering == Some(Ordering::Less)))
    }

    fn more_equal(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        let ordering = self.compare(left, right)?;
        Ok(Variant::Boolean(matches!(ordering, Some(Ordering::Greater | Ordering::Equal))))
    }

    fn less_equal(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        let ordering = self.compare(left, right)?;
        Ok(Variant::Boolean(matches!(ordering, Some(Ordering::Less | Ordering::Equal))))
    }

    /// Checks whether `collection` contains `value`: an element of an array,
    /// a substring of a string or a key of an object.
    fn is_in(&self, value: &Variant, collection: &Variant) -> Result<Variant> {
        let found = match collection {
            Variant::Null => false,
            Variant::Array(items) => items.iter().any(|item| {
                self.equal(value, item)
                    .map(|equal| equal.as_bool())
                    .unwrap_or(false)
            }),
            Variant::String(text) => match value {
                Variant::Null => false,
                v => text.contains(&self.convert(v, VariantType::String)?.as_string()),
            },
            Variant::Object(map) => {
                map.contains_key(&self.convert(value, VariantType::String)?.as_string())
            }
            other => self.equal(value, other)?.as_bool(),
        };
        Ok(Variant::Boolean(found))
    }

    /// Reads an array element, a string character or an object property.
    /// Missing elements yield null.
    fn get_element(&self, container: &Variant, index: &Variant) -> Result<Variant> {
        match container {
            Variant::Null => Ok(Variant::Null),
            Variant::Array(items) => {
                let position = self.convert(index, VariantType::Integer)?.as_int();
                Ok(position
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(|i| items.get(i))
                    .cloned()
                    .unwrap_or(Variant::Null))
            }
            Variant::String(text) => {
                let position = self.convert(index, VariantType::Integer)?.as_int();
                Ok(position
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(|i| text.chars().nth(i))
                    .map(|ch| Variant::String(ch.to_string()))
                    .unwrap_or(Variant::Null))
            }
            Variant::Object(map) => {
                let key = self.convert(index, VariantType::String)?.as_string();
                Ok(map.get(&key).cloned().unwrap_or(Variant::Null))
            }
            other => Err(unsupported("[]", other, index)),
        }
    }

    /// SQL-style pattern match: `%` matches any run of characters, `_`
    /// matches one character. Matching ignores case.
    fn like(&self, value: &Variant, pattern: &Variant) -> Result<Variant> {
        if value.is_null() || pattern.is_null() {
            return Ok(Variant::Boolean(false));
        }
        let value = self.convert(value, VariantType::String)?.as_string();
        let pattern = self.convert(pattern, VariantType::String)?.as_string();

        let mut expression = String::from("^");
        for ch in pattern.chars() {
            match ch {
                '%' => expression.push_str(".*"),
                '_' => expression.push('.'),
                ch => expression.push_str(&regex::escape(&ch.to_string())),
            }
        }
        expression.push('$');

        let regex = RegexBuilder::new(&expression)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| Error::new(ErrorCode::BadConversion, format!("Invalid LIKE pattern: {e}")))?;
        Ok(Variant::Boolean(regex.is_match(&value)))
    }

    fn is_null(&self, value: &Variant) -> Result<Variant> {
        Ok(Variant::Boolean(value.is_null()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Arithmetic {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Arithmetic {
    fn apply_decimal(self, a: Decimal, b: Decimal) -> Option<Decimal> {
        match self {
            Arithmetic::Add => a.checked_add(b),
            Arithmetic::Sub => a.checked_sub(b),
            Arithmetic::Mul => a.checked_mul(b),
            Arithmetic::Div => a.checked_div(b),
            Arithmetic::Mod => a.checked_rem(b),
        }
    }

    fn apply_float(self, a: f64, b: f64) -> f64 {
        match self {
            Arithmetic::Add => a + b,
            Arithmetic::Sub => a - b,
            Arithmetic::Mul => a * b,
            Arithmetic::Div => a / b,
            Arithmetic::Mod => a % b,
        }
    }
}

/// Integer mixed with float: computed with decimals so `1 + 0.1` is exactly
/// `1.1`, falling back to plain floats when decimals cannot represent the
/// operands or the result.
fn mixed_numbers(op: Arithmetic, left: &Variant, right: &Variant) -> Option<Variant> {
    let (a, b, exact) = match (left, right) {
        (Variant::Integer(a), Variant::Float(b)) => {
            (*a as f64, *b, Decimal::from_i64(*a).zip(Decimal::from_f64(*b)))
        }
        (Variant::Float(a), Variant::Integer(b)) => {
            (*a, *b as f64, Decimal::from_f64(*a).zip(Decimal::from_i64(*b)))
        }
        _ => return None,
    };

    let result = exact
        .and_then(|(ad, bd)| op.apply_decimal(ad, bd))
        .and_then(|rd| rd.to_f64())
        .unwrap_or_else(|| op.apply_float(a, b));
    Some(Variant::Float(result))
}

fn logical<O: VariantOperations + ?Sized>(
    ops: &O,
    name: &str,
    left: &Variant,
    right: &Variant,
    boolean: fn(bool, bool) -> bool,
    bitwise: fn(i64, i64) -> i64,
) -> Result<Variant> {
    if left.is_null() || right.is_null() {
        return Ok(Variant::Null);
    }
    // Bitwise only when both sides are integers
    if let (Variant::Integer(a), Variant::Integer(b)) = (left, right) {
        return Ok(Variant::Integer(bitwise(*a, *b)));
    }
    let left = ops.convert(left, VariantType::Boolean)?;
    match (&left, &ops.convert(right, VariantType::Boolean)?) {
        (Variant::Boolean(a), Variant::Boolean(b)) => Ok(Variant::Boolean(boolean(*a, *b))),
        (a, b) => Err(unsupported(name, a, b)),
    }
}

fn shift<O: VariantOperations + ?Sized>(
    ops: &O,
    name: &str,
    left: &Variant,
    right: &Variant,
    apply: fn(i64, u32) -> Option<i64>,
) -> Result<Variant> {
    if left.is_null() || right.is_null() {
        return Ok(Variant::Null);
    }
    let left = ops.convert(left, VariantType::Integer)?;
    match (&left, &ops.convert(right, VariantType::Integer)?) {
        (Variant::Integer(a), Variant::Integer(b)) => u32::try_from(*b)
            .ok()
            .and_then(|b| apply(*a, b))
            .map(Variant::Integer)
            .ok_or_else(|| overflow(name)),
        (a, b) => Err(unsupported(name, a, b)),
    }
}

pub(crate) fn unsupported(operation: &str, left: &Variant, right: &Variant) -> Error {
    Error::new(
        ErrorCode::UnsupportedOperation,
        format!(
            "Operation '{}' is not supported for {} and {}",
            operation,
            left.variant_type(),
            right.variant_type()
        ),
    )
}

pub(crate) fn bad_conversion(value: &Variant, target: VariantType) -> Error {
    Error::new(
        ErrorCode::BadConversion,
        format!("Cannot convert {} to {}", value.variant_type(), target),
    )
}

fn overflow(operation: &str) -> Error {
    Error::new(
        ErrorCode::UnsupportedOperation,
        format!("Integer overflow in '{}'", operation),
    )
}

fn division_by_zero() -> Error {
    Error::new(ErrorCode::DivisionByZero, "Division by zero")
}
