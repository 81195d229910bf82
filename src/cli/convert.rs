//! Moving values between JSON and [`Variant`].
//!
//! JSON numbers that fit an `i64` become integers and all others floats.
//! Non-finite floats have no JSON form and are written as `null`.

use serde_json::{Number, Value};

use crate::Variant;
use crate::expressions::VariableCollection;

use super::CliError;

impl From<Value> for Variant {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Variant::Null,
            Value::Bool(flag) => Variant::Boolean(flag),
            Value::Number(number) => number
                .as_i64()
                .map(Variant::Integer)
                .or_else(|| number.as_f64().map(Variant::Float))
                .unwrap_or_default(),
            Value::String(text) => Variant::String(text),
            Value::Array(items) => Variant::Array(items.into_iter().map(Variant::from).collect()),
            Value::Object(fields) => Variant::Object(
                fields
                    .into_iter()
                    .map(|(key, field)| (key, Variant::from(field)))
                    .collect(),
            ),
        }
    }
}

impl From<&Variant> for Value {
    fn from(variant: &Variant) -> Self {
        match variant {
            Variant::Null => Value::Null,
            Variant::Boolean(flag) => Value::Bool(*flag),
            Variant::Integer(n) => Value::from(*n),
            Variant::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Variant::String(text) => Value::String(text.clone()),
            Variant::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Variant::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, field)| (key.clone(), Value::from(field)))
                    .collect(),
            ),
        }
    }
}

/// Reads a JSON object and sets each of its members as a variable,
/// replacing variables of the same name.
pub fn read_variables(json: &str, variables: &mut VariableCollection) -> Result<(), CliError> {
    let Value::Object(fields) = serde_json::from_str(json)? else {
        return Err(CliError::NotAnObject(json.trim().to_string()));
    };
    for (name, field) in fields {
        variables.set(&name, Variant::from(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::Variables;
    use serde_json::json;

    #[test]
    fn test_numbers_keep_their_kind() {
        assert_eq!(Variant::from(json!(3)), Variant::Integer(3));
        assert_eq!(Variant::from(json!(2.5)), Variant::Float(2.5));
        assert_eq!(Value::from(&Variant::Integer(-7)), json!(-7));
    }

    #[test]
    fn test_nan_becomes_null() {
        assert_eq!(Value::from(&Variant::Float(f64::NAN)), Value::Null);
    }

    #[test]
    fn test_nested_values() {
        let value = json!({"items": [1, "two", null], "flag": true});
        let variant = Variant::from(value.clone());
        assert_eq!(Value::from(&variant), value);
    }

    #[test]
    fn test_read_variables_replaces_existing() {
        let mut variables = VariableCollection::new();
        variables.set("Price", 1);
        read_variables(r#"{"price": 2.5, "qty": 4}"#, &mut variables).unwrap();

        assert_eq!(variables.len(), 2);
        assert_eq!(variables.find_by_name("PRICE").map(|v| &v.value), Some(&Variant::Float(2.5)));
        assert!(matches!(
            read_variables("[1]", &mut variables),
            Err(CliError::NotAnObject(_))
        ));
    }
}
