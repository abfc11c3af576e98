use std::fmt;

#[cfg(test)]
mod tests;

/// A value passed to or returned from a composed member.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// No value.
	Unit,
	/// Boolean value (true/false).
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating-point value.
	Float(f64),
	/// String value.
	Str(String),
}

/// A member body received a value of an unexpected type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} value, found {found}")]
pub struct ValueTypeError {
	pub expected: &'static str,
	pub found: &'static str,
}

impl Value {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value if this is a `Float` variant.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the boolean value or a type error usable with `?`.
	pub fn expect_bool(&self) -> Result<bool, ValueTypeError> {
		self.as_bool().ok_or(ValueTypeError {
			expected: "bool",
			found: self.type_name(),
		})
	}

	/// Returns the integer value or a type error usable with `?`.
	pub fn expect_int(&self) -> Result<i64, ValueTypeError> {
		self.as_int().ok_or(ValueTypeError {
			expected: "int",
			found: self.type_name(),
		})
	}

	/// Returns the float value or a type error usable with `?`.
	pub fn expect_float(&self) -> Result<f64, ValueTypeError> {
		self.as_float().ok_or(ValueTypeError {
			expected: "float",
			found: self.type_name(),
		})
	}

	/// Returns the string value or a type error usable with `?`.
	pub fn expect_str(&self) -> Result<&str, ValueTypeError> {
		self.as_str().ok_or(ValueTypeError {
			expected: "string",
			found: self.type_name(),
		})
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Unit => "unit",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "string",
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Unit => f.write_str("()"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Str(v) => f.write_str(v),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(v.to_string())
	}
}

impl From<()> for Value {
	fn from(_: ()) -> Self {
		Value::Unit
	}
}
