//! Binding positional dialog arguments to named props.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::DialogError;

/// Ordered prop names. Argument `i` binds to name `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropMapping {
    names: Vec<String>,
}

impl PropMapping {
    /// Create a mapping, rejecting duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self, DialogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(DialogError::DuplicateProp(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// The mapped names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of mapped names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Bind call arguments to names.
    ///
    /// Surplus arguments are ignored. Names without an argument are left
    /// unbound.
    pub fn bind(&self, args: &[Value]) -> Props {
        let bound = self
            .names
            .iter()
            .zip(args)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Props { bound }
    }
}

/// Named props bound for one dialog, in mapping order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    bound: Vec<(String, Value)>,
}

impl Props {
    /// Look up a bound prop.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bound
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Number of bound props.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Returns `true` if no props are bound.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Iterate bound props in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bound.iter().map(|(key, value)| (key.as_str(), value))
    }
}
