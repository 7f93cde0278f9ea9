//! Shared variable environment with `{identifier}` substitution.
//!
//! One environment instance lives for a whole run: loop iteration binds the
//! loop variable here, and action libraries may record named results (e.g. a
//! remembered price) through the same object, so interpreter state and action
//! state stay visible to each other.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// `{identifier}` occurrences inside templates, parameters and conditions
static VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

/// Mutable name-to-value mapping shared across one executor run.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Replace every `{identifier}` with its bound value. Unbound identifiers
    /// are left untouched, so `{}` placeholders in action templates survive
    /// substitution unchanged.
    pub fn substitute(&self, text: &str) -> String {
        VAR_RE
            .replace_all(text, |captures: &regex::Captures| {
                let name = captures[1].trim();
                match self.vars.get(name) {
                    Some(value) => value.clone(),
                    None => captures[0].to_string(),
                }
            })
            .into_owned()
    }
}
