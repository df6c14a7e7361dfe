use std::collections::BTreeMap;

use super::GeneratorError;

/// A tool option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// String-keyed tool options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Options::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets an option, returning the previous value.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.values.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns `true` if every named option is set.
    #[must_use]
    pub fn has_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|name| self.contains(name.as_ref()))
    }

    /// Returns a numeric option.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::MissingOption`] if unset and
    /// [`GeneratorError::InvalidOption`] if the value is not a finite number.
    pub fn number(&self, name: &str) -> Result<f64, GeneratorError> {
        match self.get(name) {
            Some(OptionValue::Number(value)) if value.is_finite() => Ok(*value),
            Some(_) => Err(GeneratorError::InvalidOption {
                option: name.to_owned(),
                expected: "a finite number",
            }),
            None => Err(GeneratorError::MissingOption {
                option: name.to_owned(),
            }),
        }
    }

    /// Returns a numeric option, or `default` if it is not set.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidOption`] if set to a non-number.
    pub fn number_or(&self, name: &str, default: f64) -> Result<f64, GeneratorError> {
        if self.contains(name) {
            self.number(name)
        } else {
            Ok(default)
        }
    }

    /// Returns `true` if the option is set to a true flag or a non-zero number.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        match self.get(name) {
            Some(OptionValue::Flag(value)) => *value,
            Some(OptionValue::Number(value)) => *value != 0.0,
            Some(OptionValue::Text(_)) | None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let options = Options::new()
            .with("radiation_integration_time", 3600.0)
            .with("radiation_cumulative", true)
            .with("model", "harmonie");

        assert_eq!(options.number("radiation_integration_time").unwrap(), 3600.0);
        assert!(options.flag("radiation_cumulative"));
        assert!(!options.flag("model"));
        assert!(!options.flag("unset"));
        assert!(options.has_all(&["model", "radiation_cumulative"]));
        assert!(!options.has_all(&["model", "unset"]));
    }

    #[test]
    fn number_errors() {
        let options = Options::new().with("model", "harmonie").with("bad", f64::NAN);

        assert!(matches!(
            options.number("unset"),
            Err(GeneratorError::MissingOption { .. })
        ));
        assert!(matches!(
            options.number("model"),
            Err(GeneratorError::InvalidOption { .. })
        ));
        assert!(options.number("bad").is_err());
        assert_eq!(options.number_or("unset", 0.1).unwrap(), 0.1);
        assert!(options.number_or("model", 0.1).is_err());
    }
}
