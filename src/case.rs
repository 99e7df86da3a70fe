//! Key case conversion.
//!
//! A closed set of named transforms, resolved from their configuration name
//! when the client is built. The transforms themselves come from `heck`.

use crate::Error;
use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use serde_json::{Map, Value};
use std::str::FromStr;

/// A key case convention.
///
/// # Examples
///
/// ```
/// use rest_resource::CaseConvention;
///
/// let snake: CaseConvention = "snakeCase".parse().unwrap();
/// assert_eq!(snake.convert("firstName"), "first_name");
///
/// assert!("shoutyCase".parse::<CaseConvention>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseConvention {
    /// `first_name`
    Snake,
    /// `firstName`
    Camel,
    /// `first-name`
    Kebab,
    /// `FirstName`
    Pascal,
    /// `FIRST_NAME`
    Constant,
}

impl CaseConvention {
    /// Applies the transform to a single key.
    pub fn convert(&self, key: &str) -> String {
        match self {
            CaseConvention::Snake => key.to_snake_case(),
            CaseConvention::Camel => key.to_lower_camel_case(),
            CaseConvention::Kebab => key.to_kebab_case(),
            CaseConvention::Pascal => key.to_upper_camel_case(),
            CaseConvention::Constant => key.to_shouty_snake_case(),
        }
    }

    /// Renames every top-level key of `map`.
    ///
    /// When two keys convert to the same name, which value survives is unspecified.
    pub fn convert_keys(&self, map: Map<String, Value>) -> Map<String, Value> {
        map.into_iter()
            .map(|(key, value)| (self.convert(&key), value))
            .collect()
    }

    /// Renames the top-level keys of `value` if it is an object; other values pass through.
    pub fn convert_value(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.convert_keys(map)),
            other => other,
        }
    }
}

impl FromStr for CaseConvention {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "snakeCase" | "snake" | "snake_case" => Ok(CaseConvention::Snake),
            "camelCase" | "camel" => Ok(CaseConvention::Camel),
            "kebabCase" | "kebab" | "paramCase" => Ok(CaseConvention::Kebab),
            "pascalCase" | "pascal" => Ok(CaseConvention::Pascal),
            "constantCase" | "constant" => Ok(CaseConvention::Constant),
            other => Err(Error::ConfigurationError(format!(
                "Unknown case conversion: {}",
                other
            ))),
        }
    }
}

/// Parses an optional case name, failing on names outside the known set.
pub(crate) fn parse_optional(name: Option<&str>) -> Result<Option<CaseConvention>, Error> {
    name.map(str::parse).transpose()
}
