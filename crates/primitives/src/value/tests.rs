use super::*;

#[test]
fn test_accessors_match_variant() {
	assert_eq!(Value::Int(5).as_int(), Some(5));
	assert_eq!(Value::Bool(true).as_bool(), Some(true));
	assert_eq!(Value::Str("x".into()).as_str(), Some("x"));
	assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
	assert_eq!(Value::Str("5".into()).as_int(), None);
	assert_eq!(Value::Int(0).as_bool(), None);
}

#[test]
fn test_expect_reports_both_types() {
	let err = Value::Str("5".into()).expect_int().unwrap_err();
	assert_eq!(err.expected, "int");
	assert_eq!(err.found, "string");
	assert_eq!(err.to_string(), "expected int value, found string");
}

#[test]
fn test_display() {
	assert_eq!(Value::Int(6).to_string(), "6");
	assert_eq!(Value::Str("6!".into()).to_string(), "6!");
	assert_eq!(Value::Bool(false).to_string(), "false");
	assert_eq!(Value::Unit.to_string(), "()");
}

#[test]
fn test_from_conversions() {
	assert_eq!(Value::from(5i64), Value::Int(5));
	assert_eq!(Value::from("foo"), Value::Str("foo".into()));
	assert_eq!(Value::from(true), Value::Bool(true));
	assert_eq!(Value::from(()), Value::Unit);
}
