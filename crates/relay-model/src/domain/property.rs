use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Whether a variable is consumed (`IN`) or produced (`OUT`) by a task.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    In,
    Out,
}

impl FromStr for Direction {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(ModelError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
        })
    }
}

/// Declared type of a variable value.
///
/// The value itself is always carried as a string; the type only travels along for consumers.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    #[default]
    Varchar,
    Integer,
    Long,
    Float,
    Double,
    Date,
    Time,
    Timestamp,
    Boolean,
    List,
    File,
}

impl FromStr for DataType {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "varchar" | "" => Ok(DataType::Varchar),
            "integer" => Ok(DataType::Integer),
            "long" => Ok(DataType::Long),
            "float" => Ok(DataType::Float),
            "double" => Ok(DataType::Double),
            "date" => Ok(DataType::Date),
            "time" => Ok(DataType::Time),
            "timestamp" => Ok(DataType::Timestamp),
            "boolean" => Ok(DataType::Boolean),
            "list" => Ok(DataType::List),
            "file" => Ok(DataType::File),
            other => Err(ModelError::UnknownDataType(other.to_string())),
        }
    }
}

/// One named variable flowing between workflow tasks.
///
/// Field order is part of the canonical serialization used by cache fingerprints: `prop`, `direct`, `type`, `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    /// Variable name, unique within a pool.
    pub prop: String,
    /// Whether the variable is consumed or produced.
    #[serde(default)]
    pub direct: Direction,
    /// Declared value type.
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    /// Raw value.
    #[serde(default)]
    pub value: String,
}

impl Property {
    /// Create a `VARCHAR` property.
    pub fn new<K, V>(prop: K, direct: Direction, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prop: prop.into(),
            direct,
            data_type: DataType::Varchar,
            value: value.into(),
        }
    }

    /// Shorthand for an `IN` variable.
    pub fn input<K, V>(prop: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(prop, Direction::In, value)
    }

    /// Shorthand for an `OUT` variable.
    pub fn output<K, V>(prop: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(prop, Direction::Out, value)
    }

    /// Builder-style type override.
    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn name(&self) -> &str {
        &self.prop
    }

    pub fn is_input(&self) -> bool {
        self.direct == Direction::In
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_field_order() {
        let p = Property::input("day", "2024-01-01");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(
            json,
            r#"{"prop":"day","direct":"IN","type":"VARCHAR","value":"2024-01-01"}"#
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let p: Property = serde_json::from_str(r#"{"prop":"x"}"#).unwrap();
        assert_eq!(p.direct, Direction::In);
        assert_eq!(p.data_type, DataType::Varchar);
        assert!(p.value.is_empty());
    }

    #[test]
    fn direction_parses_case_insensitive() {
        assert_eq!("in".parse::<Direction>().unwrap(), Direction::In);
        assert_eq!(" OUT ".parse::<Direction>().unwrap(), Direction::Out);
        assert!("inout".parse::<Direction>().is_err());
    }

    #[test]
    fn data_type_parses_and_rejects() {
        assert_eq!("Timestamp".parse::<DataType>().unwrap(), DataType::Timestamp);
        assert_eq!("".parse::<DataType>().unwrap(), DataType::Varchar);
        assert!(matches!(
            "blob".parse::<DataType>(),
            Err(ModelError::UnknownDataType(_))
        ));
    }

    #[test]
    fn with_type_overrides_default() {
        let p = Property::output("rows", "10").with_type(DataType::Integer);
        assert!(!p.is_input());
        assert_eq!(p.data_type, DataType::Integer);
        assert_eq!(p.name(), "rows");
    }
}
