// SPDX-License-Identifier: MIT

//! Variable data types and values, and the `convert_type` constant parser.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Recognized variable data types, plus the
/// `Event` marker used for event ports. Anything not in this set is coerced
/// to `String` by the definition loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Event,
    Bool,
    Int,
    UInt,
    Real,
    LReal,
    String,
    WString,
    Time,
    DateAndTime,
    Any,
}

crate::simple_display! {
    DataType {
        Event => "Event",
        Bool => "BOOL",
        Int => "INT",
        UInt => "UINT",
        Real => "REAL",
        LReal => "LREAL",
        String => "STRING",
        WString => "WSTRING",
        Time => "TIME",
        DateAndTime => "DATE_AND_TIME",
        Any => "ANY",
    }
}

impl DataType {
    /// Parse a `.fbt` `Type` attribute into the recognized set, returning
    /// `None` when it falls outside the allowed set (the caller then
    /// coerces to `String` and warns).
    pub fn from_xml_name(name: &str) -> Option<Self> {
        match name {
            "STRING" => Some(Self::String),
            "WSTRING" => Some(Self::WString),
            "BOOL" => Some(Self::Bool),
            "INT" => Some(Self::Int),
            "UINT" => Some(Self::UInt),
            "REAL" => Some(Self::Real),
            "LREAL" => Some(Self::LReal),
            "TIME" => Some(Self::Time),
            "DATE_AND_TIME" => Some(Self::DateAndTime),
            "ANY" => Some(Self::Any),
            _ => None,
        }
    }
}

/// A variable port's current value. `Unset` is the initial state of every
/// port before the first write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Unset,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Real(f32),
    LReal(f64),
    Str(String),
    DateAndTime(DateTime<FixedOffset>),
}

/// Error produced while parsing a deployment constant for a declared type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("constant {0:?} is not valid for type {1}")]
    InvalidLiteral(String, DataType),
    #[error("ANY constant {0:?} is not of the form <TYPE>#<lexeme>")]
    MalformedAny(String),
}

/// Parse a deployment-script constant into a [`Value`] for the destination
/// port's declared type.
///
/// `$e` event pulses are handled by the caller (`Configuration::write_connection`)
/// before this is reached — this function only parses ordinary variable
/// constants.
pub fn convert_type(value: &str, value_type: DataType) -> Result<Value, ConvertError> {
    match value_type {
        DataType::String | DataType::WString | DataType::Time => Ok(Value::Str(value.to_string())),
        DataType::Bool => match value {
            "1" | "true" | "True" | "TRUE" | "t" => Ok(Value::Bool(true)),
            "0" | "false" | "False" | "FALSE" | "f" => Ok(Value::Bool(false)),
            _ => Ok(Value::Unset),
        },
        DataType::Int | DataType::UInt | DataType::Event => value
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ConvertError::InvalidLiteral(value.to_string(), value_type)),
        DataType::Real => value
            .parse::<f32>()
            .map(Value::Real)
            .map_err(|_| ConvertError::InvalidLiteral(value.to_string(), value_type)),
        DataType::LReal => value
            .parse::<f64>()
            .map(Value::LReal)
            .map_err(|_| ConvertError::InvalidLiteral(value.to_string(), value_type)),
        DataType::DateAndTime => parse_date_and_time(value),
        DataType::Any => {
            let (type_name, lexeme) = value
                .split_once('#')
                .ok_or_else(|| ConvertError::MalformedAny(value.to_string()))?;
            let resolved = DataType::from_xml_name(type_name)
                .ok_or_else(|| ConvertError::MalformedAny(value.to_string()))?;
            convert_type(lexeme, resolved)
        }
    }
}

fn parse_date_and_time(value: &str) -> Result<Value, ConvertError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Value::DateAndTime(dt));
    }
    // No timezone in the lexeme: attach the local offset.
    let naive = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|_| ConvertError::InvalidLiteral(value.to_string(), DataType::DateAndTime))?;
    let local = Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ConvertError::InvalidLiteral(value.to_string(), DataType::DateAndTime))?;
    Ok(Value::DateAndTime(local.fixed_offset()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bool_literals_map_both_ways() {
        for t in ["1", "true", "True", "TRUE", "t"] {
            assert_eq!(convert_type(t, DataType::Bool).unwrap(), Value::Bool(true));
        }
        for f in ["0", "false", "False", "FALSE", "f"] {
            assert_eq!(convert_type(f, DataType::Bool).unwrap(), Value::Bool(false));
        }
    }

    #[test]
    fn bool_unrecognized_literal_is_unset() {
        assert_eq!(convert_type("maybe", DataType::Bool).unwrap(), Value::Unset);
    }

    #[test]
    fn any_recurses_on_type_hash_lexeme() {
        assert_eq!(convert_type("INT#8500", DataType::Any).unwrap(), Value::Int(8500));
        assert!(convert_type("not-any-shaped", DataType::Any).is_err());
    }

    #[test]
    fn int_parses_decimal() {
        assert_eq!(convert_type("42", DataType::Int).unwrap(), Value::Int(42));
    }

    #[test]
    fn real_parses_ieee754() {
        assert_eq!(convert_type("3.5", DataType::LReal).unwrap(), Value::LReal(3.5));
    }

    #[test]
    fn string_is_passthrough() {
        assert_eq!(
            convert_type("hello world", DataType::String).unwrap(),
            Value::Str("hello world".to_string())
        );
    }

    proptest! {
        /// P6: convert_type is idempotent for already-typed values.
        #[test]
        fn p6_convert_type_idempotent_for_ints(n in any::<i32>()) {
            let lexeme = n.to_string();
            let once = convert_type(&lexeme, DataType::Int).unwrap();
            let Value::Int(roundtripped) = once else { unreachable!() };
            let twice = convert_type(&roundtripped.to_string(), DataType::Int).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn p6_convert_type_idempotent_for_reals(n in any::<i16>()) {
            let lexeme = format!("{n}.0");
            let once = convert_type(&lexeme, DataType::LReal).unwrap();
            let Value::LReal(v) = once else { unreachable!() };
            let twice = convert_type(&v.to_string(), DataType::LReal).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
