//! Block parser for keyword-driven test scripts.
//!
//! Turns flat, indentation-styled script text into a list of [`TestCase`]
//! values, each holding an ordered tree of [`TestStep`]s. Two keyword sets
//! (English and Russian) are accepted as pure synonyms:
//!
//! | English | Russian | Meaning |
//! |---------|---------|---------|
//! | `Test:` | `Тест:` | starts a new test case |
//! | `If <cond>` | `Если <cond>` | opens a conditional block |
//! | `Else if <cond>` | `Иначе если <cond>` | alternate conditional branch |
//! | `Else` | `Иначе` | unconditional fallback branch |
//! | `EndIf` | `КонецЕсли` | closes the nearest conditional |
//! | `For each <expr>` | `Для каждого <expr>` | opens a loop block |
//! | `EndLoop` | `КонецЦикла` | closes the nearest loop |
//!
//! Lines starting with `#` and blank lines are ignored. Everything else is
//! an action step: quoted strings and bare integers are extracted as ordered
//! parameters and replaced by `{}` placeholders in the action template, so
//! same-shaped actions share one template.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Quoted strings and bare integer literals inside an action line
static PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)"|(\d+)"#).unwrap());

/// One node of a parsed step tree.
///
/// `EndIf`/`EndLoop` are structural markers: the parser consumes them to pop
/// its block stack, so they never appear among a parsed case's children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TestStep {
    /// A leaf step dispatched to the action library. `template` is the line
    /// with literals replaced by `{}`; `parameters` holds the extracted
    /// literals in first-appearance order.
    Action {
        template: String,
        parameters: Vec<String>,
    },
    /// A conditional block. `children` is the guarded body followed by any
    /// `Else` branches, which are always direct children of their `If`.
    If {
        condition: String,
        children: Vec<TestStep>,
    },
    /// An alternate branch of an `If`. `condition` is `Some` for `Else if`
    /// and `None` for a bare `Else` fallback.
    Else {
        condition: Option<String>,
        children: Vec<TestStep>,
    },
    /// A loop block. `expression` is the raw header text after the loop
    /// keyword, e.g. `item in ["a", "b"]`.
    Loop {
        expression: String,
        children: Vec<TestStep>,
    },
    EndIf,
    EndLoop,
}

/// A named test case owning its step tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub steps: Vec<TestStep>,
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while reconstructing nested blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `EndIf`/`EndLoop` with no open block to close (1-based line number)
    UnmatchedClose { line: usize, keyword: String },

    /// `Else`/`Else if` with no open `If` block (1-based line number)
    DanglingElse { line: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnmatchedClose { line, keyword } => {
                write!(f, "line {}: '{}' has no open block to close", line, keyword)
            }
            ParseError::DanglingElse { line } => {
                write!(f, "line {}: 'Else' outside of an 'If' block", line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// What an open block frame will become once closed
enum FrameKind {
    Root,
    If { condition: String },
    Else { condition: Option<String> },
    Loop { expression: String },
}

/// One "current children list" the parser is appending to
struct Frame {
    kind: FrameKind,
    steps: Vec<TestStep>,
}

impl Frame {
    fn root() -> Self {
        Frame {
            kind: FrameKind::Root,
            steps: Vec::new(),
        }
    }
}

/// Parse script text into an ordered list of test cases.
///
/// Pure function of its input: the same text always yields the same tree.
/// Blocks still open when a new `Test:` header or the end of input is reached
/// are closed implicitly; a closing keyword without an open block is an error.
pub fn parse(text: &str) -> ParseResult<Vec<TestCase>> {
    let mut cases = Vec::new();
    let mut current: Option<(String, Vec<Frame>)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let line_no = index + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = strip_any_keyword(line, &["test:", "тест:"]) {
            if let Some((name, stack)) = current.take() {
                cases.push(TestCase {
                    name,
                    steps: collapse(stack),
                });
            }
            current = Some((name.trim().to_string(), vec![Frame::root()]));
            continue;
        }

        // Steps before the first `Test:` header have no case to live in.
        let Some((_, stack)) = current.as_mut() else {
            continue;
        };

        match parse_step(line) {
            TestStep::If { condition, .. } => {
                stack.push(Frame {
                    kind: FrameKind::If { condition },
                    steps: Vec::new(),
                });
            }
            TestStep::Loop { expression, .. } => {
                stack.push(Frame {
                    kind: FrameKind::Loop { expression },
                    steps: Vec::new(),
                });
            }
            TestStep::Else { condition, .. } => {
                // Close the previous branch first, then hang the new branch
                // off the owning `If`.
                if matches!(stack.last().map(|f| &f.kind), Some(FrameKind::Else { .. })) {
                    close_top(stack);
                }
                match stack.last().map(|f| &f.kind) {
                    Some(FrameKind::If { .. }) => {
                        stack.push(Frame {
                            kind: FrameKind::Else { condition },
                            steps: Vec::new(),
                        });
                    }
                    _ => return Err(ParseError::DanglingElse { line: line_no }),
                }
            }
            TestStep::EndIf => close_block(stack, line_no, "EndIf")?,
            TestStep::EndLoop => close_block(stack, line_no, "EndLoop")?,
            step @ TestStep::Action { .. } => {
                if let Some(frame) = stack.last_mut() {
                    frame.steps.push(step);
                }
            }
        }
    }

    if let Some((name, stack)) = current.take() {
        cases.push(TestCase {
            name,
            steps: collapse(stack),
        });
    }

    Ok(cases)
}

/// Classify one trimmed, non-empty line into a step. Keyword matching is
/// case-insensitive; anything unrecognized becomes an action step.
pub fn parse_step(line: &str) -> TestStep {
    if let Some(rest) = strip_any_keyword(line, &["if ", "если "]) {
        return TestStep::If {
            condition: rest.trim().to_string(),
            children: Vec::new(),
        };
    }
    if let Some(rest) = strip_any_keyword(line, &["else if ", "иначе если "]) {
        return TestStep::Else {
            condition: Some(rest.trim().to_string()),
            children: Vec::new(),
        };
    }
    if strip_any_keyword(line, &["else", "иначе"]).is_some() {
        return TestStep::Else {
            condition: None,
            children: Vec::new(),
        };
    }
    if strip_any_keyword(line, &["endif", "конецесли"]).is_some() {
        return TestStep::EndIf;
    }
    if let Some(rest) = strip_any_keyword(line, &["for each ", "для каждого "]) {
        return TestStep::Loop {
            expression: rest.trim().to_string(),
            children: Vec::new(),
        };
    }
    if strip_any_keyword(line, &["endloop", "конеццикла"]).is_some() {
        return TestStep::EndLoop;
    }
    extract_action(line)
}

/// Extract quoted-string and bare-integer parameters from an action line,
/// replacing each with a `{}` placeholder in the template.
fn extract_action(line: &str) -> TestStep {
    let mut parameters = Vec::new();
    for captures in PARAM_RE.captures_iter(line) {
        if let Some(quoted) = captures.get(1) {
            parameters.push(quoted.as_str().to_string());
        } else if let Some(number) = captures.get(2) {
            parameters.push(number.as_str().to_string());
        }
    }
    let template = PARAM_RE.replace_all(line, "{}").trim().to_string();
    TestStep::Action {
        template,
        parameters,
    }
}

/// Case-insensitive prefix strip over the synonym set; returns the remainder
/// after the first matching keyword.
fn strip_any_keyword<'a>(line: &'a str, keywords: &[&str]) -> Option<&'a str> {
    keywords.iter().find_map(|kw| strip_keyword_ci(line, kw))
}

fn strip_keyword_ci<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let mut indices = line.char_indices();
    for expected in keyword.chars() {
        let (_, actual) = indices.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let rest_start = indices.next().map(|(i, _)| i).unwrap_or(line.len());
    Some(&line[rest_start..])
}

/// Close the nearest open block, first sealing a pending `Else` branch so the
/// branch lands on its owning `If`.
fn close_block(stack: &mut Vec<Frame>, line_no: usize, keyword: &str) -> ParseResult<()> {
    if matches!(stack.last().map(|f| &f.kind), Some(FrameKind::Else { .. })) {
        close_top(stack);
    }
    if stack.len() < 2 {
        return Err(ParseError::UnmatchedClose {
            line: line_no,
            keyword: keyword.to_string(),
        });
    }
    close_top(stack);
    Ok(())
}

/// Pop the top frame and append its finished node to the parent frame.
/// The root frame is never closed.
fn close_top(stack: &mut Vec<Frame>) {
    let Some(Frame { kind, steps }) = stack.pop() else {
        return;
    };
    let node = match kind {
        FrameKind::Root => {
            stack.push(Frame {
                kind: FrameKind::Root,
                steps,
            });
            return;
        }
        FrameKind::If { condition } => TestStep::If {
            condition,
            children: steps,
        },
        FrameKind::Else { condition } => TestStep::Else {
            condition,
            children: steps,
        },
        FrameKind::Loop { expression } => TestStep::Loop {
            expression,
            children: steps,
        },
    };
    if let Some(parent) = stack.last_mut() {
        parent.steps.push(node);
    }
}

/// Drain a case's frame stack at a `Test:` boundary or end of input,
/// implicitly closing any blocks left open.
fn collapse(mut stack: Vec<Frame>) -> Vec<TestStep> {
    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().map(|frame| frame.steps).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn action(template: &str, parameters: &[&str]) -> TestStep {
        TestStep::Action {
            template: template.to_string(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_simple_actions_with_parameters() {
        let cases = parse(
            r#"
            Test: Simple Test
            Action: Click the "Submit" button
            Verify that the title equals "Welcome" in 5 seconds
            "#,
        )
        .unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "Simple Test");
        assert_eq!(
            cases[0].steps,
            vec![
                action("Action: Click the {} button", &["Submit"]),
                action(
                    "Verify that the title equals {} in {} seconds",
                    &["Welcome", "5"]
                ),
            ]
        );
    }

    #[test]
    fn test_parse_russian_actions_with_parameters() {
        let cases = parse(
            r#"
            Тест: Simple Test
            Действие: Нажать кнопку "Submit"
            Проверить что заголовок равен "Welcome" за 5 секунд
            "#,
        )
        .unwrap();

        assert_eq!(
            cases[0].steps,
            vec![
                action("Действие: Нажать кнопку {}", &["Submit"]),
                action(
                    "Проверить что заголовок равен {} за {} секунд",
                    &["Welcome", "5"]
                ),
            ]
        );
    }

    #[test]
    fn test_extracts_parameters_in_left_to_right_order() {
        let cases = parse(
            r#"
            Test: Params Test
            Action: Enter "Login" into the "Username" field in 10 seconds
            "#,
        )
        .unwrap();

        let TestStep::Action {
            template,
            parameters,
        } = &cases[0].steps[0]
        else {
            panic!("expected an action step");
        };
        assert_eq!(template, "Action: Enter {} into the {} field in {} seconds");
        assert_eq!(parameters, &["Login", "Username", "10"]);
    }

    #[test]
    fn test_if_else_structure_attaches_branches_to_owning_if() {
        let cases = parse(
            r#"
            Test: Condition Test
            If the user is authenticated
                Action: Check the element "Dashboard"
                If the screen is mobile
                    Action: Collapse the menu
                Else
                    Action: Expand the menu
                EndIf
            Else
                Action: Click "Login"
            EndIf
            "#,
        )
        .unwrap();

        let steps = &cases[0].steps;
        assert_eq!(steps.len(), 1);

        let TestStep::If {
            condition,
            children,
        } = &steps[0]
        else {
            panic!("expected an if step");
        };
        assert_eq!(condition, "the user is authenticated");
        // Body action, nested if, then the outer else branch.
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], action("Action: Check the element {}", &["Dashboard"]));

        let TestStep::If {
            children: inner, ..
        } = &children[1]
        else {
            panic!("expected a nested if");
        };
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[0], action("Action: Collapse the menu", &[]));
        assert_eq!(
            inner[1],
            TestStep::Else {
                condition: None,
                children: vec![action("Action: Expand the menu", &[])],
            }
        );

        assert_eq!(
            children[2],
            TestStep::Else {
                condition: None,
                children: vec![action("Action: Click {}", &["Login"])],
            }
        );
    }

    #[test]
    fn test_chained_else_if_branches_stay_in_order() {
        let cases = parse(
            r#"
            Test: Multi Else Test
            If condition 1
                Action: Step A
            Else if condition 2
                Action: Step B
            Else
                Action: Step C
            EndIf
            "#,
        )
        .unwrap();

        let steps = &cases[0].steps;
        assert_eq!(steps.len(), 1);

        let TestStep::If { children, .. } = &steps[0] else {
            panic!("expected an if step");
        };
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], action("Action: Step A", &[]));
        assert_eq!(
            children[1],
            TestStep::Else {
                condition: Some("condition 2".to_string()),
                children: vec![action("Action: Step B", &[])],
            }
        );
        assert_eq!(
            children[2],
            TestStep::Else {
                condition: None,
                children: vec![action("Action: Step C", &[])],
            }
        );
    }

    #[test]
    fn test_loop_structure_with_nested_if() {
        let cases = parse(
            r#"
            Test: Loop Test
            For each item in the list
                Action: Process the "item" element
                If the element is active
                    Action: Click the element
                EndIf
            EndLoop
            "#,
        )
        .unwrap();

        let TestStep::Loop {
            expression,
            children,
        } = &cases[0].steps[0]
        else {
            panic!("expected a loop step");
        };
        assert_eq!(expression, "item in the list");
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], TestStep::Action { .. }));
        assert!(matches!(children[1], TestStep::If { .. }));
    }

    #[test]
    fn test_multiple_test_cases() {
        let cases = parse(
            r#"
            Test: First Test
            Action: Step 1

            Тест: Second Test
            Действие: Шаг 2
            "#,
        )
        .unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].name, "First Test");
        assert_eq!(cases[0].steps.len(), 1);
        assert_eq!(cases[1].name, "Second Test");
        assert_eq!(cases[1].steps.len(), 1);
    }

    #[test]
    fn test_ignores_comments_and_blank_lines() {
        let cases = parse(
            r#"
            # This is a comment
            Test: Comment Test

            If condition
                # Nested comment
                Action: Skip
            EndIf
            "#,
        )
        .unwrap();

        let TestStep::If { children, .. } = &cases[0].steps[0] else {
            panic!("expected an if step");
        };
        assert_eq!(children.len(), 1);
        assert!(matches!(children[0], TestStep::Action { .. }));
    }

    #[test]
    fn test_deeply_nested_blocks() {
        let cases = parse(
            r#"
            Test: Complex Test
            If level 1
                Action: Step 1
                If level 2
                    For each element in ["x"]
                        Action: Process
                    EndLoop
                EndIf
                Action: Step 2
            EndIf
            "#,
        )
        .unwrap();

        let TestStep::If { children, .. } = &cases[0].steps[0] else {
            panic!("expected an if step");
        };
        assert_eq!(children.len(), 3);

        let TestStep::If {
            children: inner, ..
        } = &children[1]
        else {
            panic!("expected a nested if");
        };
        assert_eq!(inner.len(), 1);

        let TestStep::Loop {
            children: body, ..
        } = &inner[0]
        else {
            panic!("expected a loop inside the nested if");
        };
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let cases = parse(
            r#"
            TEST: Case Insensitive Test
            IF condition
                ACTION: "step"
            ENDIF
            "#,
        )
        .unwrap();

        assert_eq!(cases[0].name, "Case Insensitive Test");
        assert!(matches!(cases[0].steps[0], TestStep::If { .. }));

        let cases = parse(
            r#"
            ТЕСТ: Регистронезависимый
            ЕСЛИ условие
                Шаг
            КОНЕЦЕСЛИ
            "#,
        )
        .unwrap();
        assert!(matches!(cases[0].steps[0], TestStep::If { .. }));
    }

    #[test]
    fn test_flat_actions_keep_original_order() {
        let text = "Test: Order\nfirst\nsecond\nthird\n";
        let cases = parse(text).unwrap();
        assert_eq!(
            cases[0].steps,
            vec![action("first", &[]), action("second", &[]), action("third", &[])]
        );
    }

    #[test]
    fn test_lines_before_first_test_header_are_ignored() {
        let cases = parse("Action: orphan\nTest: Real\nAction: Step\n").unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].steps.len(), 1);
    }

    #[test]
    fn test_unclosed_blocks_are_closed_at_case_end() {
        let cases = parse(
            r#"
            Test: Unclosed
            If condition
                Action: Inside

            Test: Next
            Action: Outside
            "#,
        )
        .unwrap();

        assert_eq!(cases.len(), 2);
        let TestStep::If { children, .. } = &cases[0].steps[0] else {
            panic!("expected an if step");
        };
        assert_eq!(children.len(), 1);
        assert_eq!(cases[1].steps.len(), 1);
    }

    #[test]
    fn test_unmatched_endif_is_an_error() {
        let err = parse("Test: Broken\nAction: Step\nEndIf\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnmatchedClose {
                line: 3,
                keyword: "EndIf".to_string(),
            }
        );
    }

    #[test]
    fn test_unmatched_endloop_is_an_error() {
        let err = parse("Test: Broken\nEndLoop\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnmatchedClose {
                line: 2,
                keyword: "EndLoop".to_string(),
            }
        );
    }

    #[test]
    fn test_else_without_if_is_an_error() {
        let err = parse("Test: Broken\nElse\nAction: Step\n").unwrap_err();
        assert_eq!(err, ParseError::DanglingElse { line: 2 });
    }

    #[test]
    fn test_else_inside_loop_without_if_is_an_error() {
        let err = parse("Test: Broken\nFor each item in [\"a\"]\nElse\nEndLoop\n").unwrap_err();
        assert_eq!(err, ParseError::DanglingElse { line: 3 });
    }

    #[test]
    fn test_integer_literals_inside_quotes_are_one_parameter() {
        let step = parse_step("Wait for \"30 seconds\" exactly 2 times");
        assert_eq!(
            step,
            action("Wait for {} exactly {} times", &["30 seconds", "2"])
        );
    }

    #[test]
    fn test_parse_step_classifies_markers() {
        assert_eq!(parse_step("EndIf"), TestStep::EndIf);
        assert_eq!(parse_step("КонецЕсли"), TestStep::EndIf);
        assert_eq!(parse_step("EndLoop"), TestStep::EndLoop);
        assert_eq!(parse_step("КонецЦикла"), TestStep::EndLoop);
    }

    #[test]
    fn test_step_tree_serializes_with_type_tags() {
        let step = action("Click {}", &["Submit"]);
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["type"], "action");
        assert_eq!(value["template"], "Click {}");
        assert_eq!(value["parameters"][0], "Submit");
    }
}
