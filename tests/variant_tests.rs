// tests/variant_tests.rs

use std::collections::HashMap;

use stamen::variants::VariantOperations;
use stamen::{ErrorCode, TypeSafeVariantOperations, TypeUnsafeVariantOperations, Variant, VariantType};

const SAFE: TypeSafeVariantOperations = TypeSafeVariantOperations;
const UNSAFE: TypeUnsafeVariantOperations = TypeUnsafeVariantOperations;

fn object(pairs: Vec<(&str, Variant)>) -> Variant {
    let mut map = HashMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Variant::Object(map)
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn test_unsafe_string_conversions() {
    assert_eq!(UNSAFE.convert(&Variant::from(" 42 "), VariantType::Integer).unwrap(), Variant::Integer(42));
    assert_eq!(UNSAFE.convert(&Variant::from("2.9"), VariantType::Integer).unwrap(), Variant::Integer(2));
    assert_eq!(UNSAFE.convert(&Variant::from("false"), VariantType::Boolean).unwrap(), Variant::Boolean(false));
    assert_eq!(UNSAFE.convert(&Variant::Float(1.5), VariantType::String).unwrap(), Variant::from("1.5"));
}

#[test]
fn test_unsafe_wraps_scalars_in_arrays() {
    assert_eq!(
        UNSAFE.convert(&Variant::Integer(1), VariantType::Array).unwrap(),
        Variant::Array(vec![Variant::Integer(1)])
    );
}

#[test]
fn test_unsafe_rejects_unparsable() {
    let err = UNSAFE.convert(&Variant::from("abc"), VariantType::Float).unwrap_err();
    assert_eq!(err.code, ErrorCode::BadConversion);
    assert!(UNSAFE.convert(&Variant::Integer(1), VariantType::Object).is_err());
}

#[test]
fn test_safe_only_widens_integers() {
    assert_eq!(SAFE.convert(&Variant::Integer(2), VariantType::Float).unwrap(), Variant::Float(2.0));
    assert_eq!(
        SAFE.convert(&Variant::Float(2.0), VariantType::Integer).unwrap_err().code,
        ErrorCode::BadConversion
    );
    assert_eq!(
        SAFE.convert(&Variant::from("1"), VariantType::Integer).unwrap_err().code,
        ErrorCode::BadConversion
    );
}

// ============================================================================
// Operations
// ============================================================================

#[test]
fn test_integer_overflow_is_reported() {
    let err = UNSAFE.add(&Variant::Integer(i64::MAX), &Variant::Integer(1)).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedOperation);
}

#[test]
fn test_modulo_by_zero() {
    let err = SAFE.modulo(&Variant::Integer(1), &Variant::Integer(0)).unwrap_err();
    assert_eq!(err.code, ErrorCode::DivisionByZero);
}

#[test]
fn test_power() {
    assert_eq!(UNSAFE.pow(&Variant::Integer(2), &Variant::Integer(10)).unwrap(), Variant::Integer(1024));
    assert_eq!(UNSAFE.pow(&Variant::Integer(2), &Variant::Integer(-1)).unwrap(), Variant::Float(0.5));
}

#[test]
fn test_array_concatenation() {
    let left = Variant::Array(vec![Variant::Integer(1)]);
    let right = Variant::Array(vec![Variant::Integer(2)]);
    assert_eq!(
        UNSAFE.add(&left, &right).unwrap(),
        Variant::Array(vec![Variant::Integer(1), Variant::Integer(2)])
    );
}

#[test]
fn test_object_element_and_membership() {
    let doc = object(vec![("name", Variant::from("stamen"))]);
    assert_eq!(UNSAFE.get_element(&doc, &Variant::from("name")).unwrap(), Variant::from("stamen"));
    assert_eq!(UNSAFE.get_element(&doc, &Variant::from("other")).unwrap(), Variant::Null);
    assert_eq!(UNSAFE.is_in(&Variant::from("name"), &doc).unwrap(), Variant::Boolean(true));
}

#[test]
fn test_like_escapes_regex_characters() {
    assert_eq!(
        UNSAFE.like(&Variant::from("a+b (c)"), &Variant::from("a+b (%)")).unwrap(),
        Variant::Boolean(true)
    );
    assert_eq!(UNSAFE.like(&Variant::Null, &Variant::from("%")).unwrap(), Variant::Boolean(false));
}

#[test]
fn test_null_propagation() {
    assert_eq!(SAFE.mul(&Variant::Null, &Variant::Integer(2)).unwrap(), Variant::Null);
    assert_eq!(SAFE.and(&Variant::Boolean(true), &Variant::Null).unwrap(), Variant::Null);
    assert_eq!(SAFE.less(&Variant::Null, &Variant::Integer(2)).unwrap(), Variant::Boolean(false));
}

#[test]
fn test_bitwise_logic_on_integers() {
    assert_eq!(SAFE.and(&Variant::Integer(6), &Variant::Integer(3)).unwrap(), Variant::Integer(2));
    assert_eq!(SAFE.not(&Variant::Integer(0)).unwrap(), Variant::Integer(-1));
}

#[test]
fn test_mixed_boolean_and_integer_logic_is_boolean() {
    let one = Variant::Integer(1);
    let yes = Variant::Boolean(true);
    assert_eq!(UNSAFE.and(&one, &yes).unwrap(), Variant::Boolean(true));
    assert_eq!(UNSAFE.and(&yes, &one).unwrap(), Variant::Boolean(true));
    assert_eq!(UNSAFE.or(&Variant::Integer(0), &Variant::Boolean(false)).unwrap(), Variant::Boolean(false));
    assert_eq!(
        SAFE.and(&one, &yes).unwrap_err().code,
        ErrorCode::BadConversion
    );
}

#[test]
fn test_unsafe_mixed_types_never_fail_to_compare() {
    let number = Variant::Integer(1);
    let word = Variant::from("abc");

    assert_eq!(UNSAFE.equal(&number, &word).unwrap(), Variant::Boolean(false));
    assert_eq!(UNSAFE.equal(&word, &number).unwrap(), Variant::Boolean(false));
    assert_eq!(UNSAFE.not_equal(&number, &word).unwrap(), Variant::Boolean(true));
    assert_eq!(UNSAFE.less(&number, &word).unwrap(), Variant::Boolean(true));
    assert_eq!(UNSAFE.more(&word, &number).unwrap(), Variant::Boolean(true));
    assert_eq!(UNSAFE.add(&number, &word).unwrap(), Variant::from("1abc"));

    // Parsable strings still take the numeric type
    assert_eq!(UNSAFE.equal(&number, &Variant::from("1")).unwrap(), Variant::Boolean(true));
}

#[test]
fn test_safe_mixed_types_fail() {
    let err = SAFE.equal(&Variant::Integer(1), &Variant::from("abc")).unwrap_err();
    assert_eq!(err.code, ErrorCode::BadConversion);
}

// ============================================================================
// Variant helpers
// ============================================================================

#[test]
fn test_as_string() {
    assert_eq!(Variant::Null.as_string(), "");
    assert_eq!(
        Variant::Array(vec![Variant::Integer(1), Variant::from("x")]).as_string(),
        "1,x"
    );
    assert_eq!(Variant::Boolean(true).to_string(), "true");
}

#[test]
fn test_variant_types() {
    assert_eq!(Variant::default().variant_type(), VariantType::Null);
    assert_eq!(Variant::from(1.5).variant_type().name(), "float");
    assert!(Variant::from(3).is_numeric());
    assert!(!Variant::from("").as_bool());
    assert!(Variant::Array(vec![Variant::Null]).as_bool());
    assert_eq!(Variant::Float(f64::NAN).as_int(), None);
}
