//! Types for interpreter output and errors.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::actions::ActionFailure;

/// Outcome of a step or a whole test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
}

/// Result of one executed action step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// 1-based position among the case's executed action steps
    pub step_number: usize,

    /// Action text after variable substitution
    pub action: String,

    /// Parameters after variable substitution
    pub parameters: Vec<String>,

    pub status: TestStatus,

    /// Failure message, present only for failed steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Screenshot captured by the action library on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<PathBuf>,

    /// Video captured by the action library on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_path: Option<PathBuf>,
}

/// Result of one executed test case. Created at case start, appended to while
/// the case runs, immutable once the case completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_name: String,
    pub steps: Vec<StepResult>,
    pub status: TestStatus,
    pub duration_ms: u64,
}

/// Wall-clock duration of one executed action step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTiming {
    pub step_number: usize,
    pub duration_ms: u64,
}

/// Result type for interpreter operations
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors raised while walking a step tree
#[derive(Debug)]
pub enum ExecError {
    /// A loop header matching neither `<name> in [..]` nor `<name> в [..]`,
    /// carrying the original expression text
    InvalidLoopExpression(String),

    /// Failure raised by the action library, propagated unchanged
    Action(ActionFailure),
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecError::InvalidLoopExpression(expression) => {
                write!(f, "invalid loop expression: {}", expression)
            }
            ExecError::Action(failure) => write!(f, "{}", failure),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::InvalidLoopExpression(_) => None,
            ExecError::Action(failure) => Some(failure),
        }
    }
}

impl From<ActionFailure> for ExecError {
    fn from(failure: ActionFailure) -> Self {
        ExecError::Action(failure)
    }
}
