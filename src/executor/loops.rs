//! Loop header evaluation for `For each` blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{ExecError, ExecResult};

/// `<name> in [<items>]`, with `в` accepted as the Russian connective
static LOOP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)(.*?) (?:in|в) \[(.*)\]").unwrap());

/// A parsed loop header: the bound variable name plus the items in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopBinding {
    pub variable: String,
    pub items: Vec<String>,
}

/// Parse a (already variable-substituted) loop header. Item quotes are
/// optional and stripped; whitespace around items is trimmed.
pub fn parse_loop_expression(expression: &str) -> ExecResult<LoopBinding> {
    let captures = LOOP_RE
        .captures(expression)
        .ok_or_else(|| ExecError::InvalidLoopExpression(expression.to_string()))?;

    let variable = captures[1].trim().to_string();
    let inner = captures[2].trim();
    let items = if inner.is_empty() {
        Vec::new()
    } else {
        inner
            .split(',')
            .map(|item| item.trim().replace('"', ""))
            .collect()
    };

    Ok(LoopBinding { variable, items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quoted_items() {
        let binding = parse_loop_expression(r#"item in ["a", "b"]"#).unwrap();
        assert_eq!(binding.variable, "item");
        assert_eq!(binding.items, vec!["a", "b"]);
    }

    #[test]
    fn test_bare_items_and_spaces() {
        let binding = parse_loop_expression("product in [ Backpack , Bike Light ]").unwrap();
        assert_eq!(binding.variable, "product");
        assert_eq!(binding.items, vec!["Backpack", "Bike Light"]);
    }

    #[test]
    fn test_russian_connective() {
        let binding = parse_loop_expression(r#"товар в ["Рюкзак", "Фонарь"]"#).unwrap();
        assert_eq!(binding.variable, "товар");
        assert_eq!(binding.items, vec!["Рюкзак", "Фонарь"]);
    }

    #[test]
    fn test_empty_list_yields_no_items() {
        let binding = parse_loop_expression("item in []").unwrap();
        assert!(binding.items.is_empty());
    }

    #[test]
    fn test_invalid_expression_carries_original_text() {
        let err = parse_loop_expression("item over the list").unwrap_err();
        match err {
            ExecError::InvalidLoopExpression(text) => {
                assert_eq!(text, "item over the list");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
