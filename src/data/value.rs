use itertools::Itertools;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Represents the possible values a card attribute or placed field can take.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    List(Vec<Value>),
    #[default]
    Nil,
}

macro_rules! value_from {
    ($($V:ty)+ => $Variant:ident($T:ty)) => {
        $(
            impl From<$V> for Value {
                fn from(value: $V) -> Self {
                    Self::$Variant(value as $T)
                }
            }
        )*
    };
}

value_from!(i64 i32 i16 i8 u32 u16 u8 => Int(i64));
value_from!(f64 f32 => Float(f64));
value_from!(bool => Bool(bool));

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl Value {
    /// Whether the value carries nothing worth showing.
    ///
    /// Blank strings count as empty, since CSV cells cannot express absence.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Str(s) => s.trim().is_empty(),
            Value::List(vs) => vs.is_empty(),
            _ => false,
        }
    }

    /// Reads the value as an integer, accepting integral floats and numeric strings.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Reads the value as text; lists have no single text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Nil | Value::List(_) => None,
            Value::Str(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }
}

struct ValueVisitor;

macro_rules! visit {
    ($fn:ident $S:ty => $Variant:ident($T:ty)) => {
        fn $fn<E: de::Error>(self, v: $S) -> std::result::Result<Self::Value, E> {
            Ok(Value::$Variant(v as $T))
        }
    };
    ($fn:ident $S:ty => $Variant:ident) => {
        fn $fn<E: de::Error>(self, v: $S) -> std::result::Result<Self::Value, E> {
            Ok(Value::$Variant(v))
        }
    };
}

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, int, float, bool, list or none")
    }

    visit!(visit_i64 i64 => Int);
    visit!(visit_i32 i32 => Int(i64));
    visit!(visit_i16 i16 => Int(i64));
    visit!(visit_i8  i8  => Int(i64));
    visit!(visit_u32 u32 => Int(i64));
    visit!(visit_u16 u16 => Int(i64));
    visit!(visit_u8  u8  => Int(i64));

    visit!(visit_f64 f64 => Float);
    visit!(visit_f32 f32 => Float(f64));

    visit!(visit_bool bool => Bool);

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::custom(format!("integer {v} is out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(Value::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
        Ok(Value::Str(v))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Value::Nil)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Value::Nil)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::List(vs) => write!(f, "{}", vs.iter().join(", ")),
            Value::Nil => write!(f, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_empty() {
        assert!(Value::from("   ").is_empty());
        assert!(Value::Nil.is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::from(0).is_empty());
    }

    #[test]
    fn integers_are_read_leniently() {
        assert_eq!(Value::from(" 7 ").as_int(), Some(7));
        assert_eq!(Value::Float(3.0).as_int(), Some(3));
        assert_eq!(Value::Float(3.5).as_int(), None);
        assert_eq!(Value::from("seven").as_int(), None);
    }

    #[test]
    fn lists_display_comma_separated() {
        let v = Value::List(vec![Value::from("fire"), Value::from(2)]);
        assert_eq!(v.to_string(), "fire, 2");
    }
}
