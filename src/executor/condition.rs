//! Condition evaluation for `If`/`Else if` step headers.
//!
//! Conditions are matched against a registry of phrase-prefix predicates.
//! A condition that matches no registered prefix evaluates to `true`: scripts
//! may reference predicates that are not implemented yet without failing the
//! whole run.

use crate::vars::Environment;

type PredicateFn = Box<dyn Fn(&str, &Environment) -> bool + Send + Sync>;

struct Predicate {
    prefixes: Vec<String>,
    eval: PredicateFn,
}

/// Registry of phrase-prefix condition predicates.
pub struct ConditionRegistry {
    predicates: Vec<Predicate>,
}

impl ConditionRegistry {
    /// An empty registry with no predicates.
    pub fn empty() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// The built-in registry: currently the "page title contains" predicate
    /// in both keyword languages, reading the `pageTitle` environment entry.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(
            &["page title contains ", "заголовок страницы содержит "],
            |rest, env| {
                let expected = rest.replace('"', "");
                env.get("pageTitle").unwrap_or("").contains(&expected)
            },
        );
        registry
    }

    /// Register a predicate for one or more phrase prefixes. The handler
    /// receives the condition text after the prefix plus the environment.
    pub fn register<F>(&mut self, prefixes: &[&str], eval: F)
    where
        F: Fn(&str, &Environment) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Predicate {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            eval: Box::new(eval),
        });
    }

    /// Evaluate a (already variable-substituted) condition. Unrecognized
    /// conditions are permissively true.
    pub fn evaluate(&self, condition: &str, env: &Environment) -> bool {
        for predicate in &self.predicates {
            for prefix in &predicate.prefixes {
                if let Some(rest) = condition.strip_prefix(prefix.as_str()) {
                    return (predicate.eval)(rest, env);
                }
            }
        }
        true
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_title_contains_matches_substring() {
        let registry = ConditionRegistry::new();
        let mut env = Environment::new();
        env.set("pageTitle", "Swag Labs - Inventory");

        assert!(registry.evaluate("page title contains \"Swag\"", &env));
        assert!(registry.evaluate("page title contains Inventory", &env));
        assert!(!registry.evaluate("page title contains \"Checkout\"", &env));
    }

    #[test]
    fn test_page_title_missing_is_empty() {
        let registry = ConditionRegistry::new();
        let env = Environment::new();
        assert!(!registry.evaluate("page title contains \"anything\"", &env));
    }

    #[test]
    fn test_russian_prefix_is_a_synonym() {
        let registry = ConditionRegistry::new();
        let mut env = Environment::new();
        env.set("pageTitle", "Swag Labs");
        assert!(registry.evaluate("заголовок страницы содержит \"Swag\"", &env));
    }

    #[test]
    fn test_unknown_condition_is_true() {
        let registry = ConditionRegistry::new();
        let env = Environment::new();
        assert!(registry.evaluate("the moon is full", &env));
    }

    #[test]
    fn test_registered_predicate_takes_over() {
        let mut registry = ConditionRegistry::empty();
        registry.register(&["cart size is "], |rest, env| {
            env.get("cartSize") == Some(rest.trim())
        });

        let mut env = Environment::new();
        env.set("cartSize", "3");
        assert!(registry.evaluate("cart size is 3", &env));
        assert!(!registry.evaluate("cart size is 4", &env));
    }
}
