//! Execution of parsed test cases.
//!
//! The interpreter lives in [`engine`]; [`condition`] and [`loops`] hold the
//! predicate registry and loop-expression grammar it delegates to, and
//! [`types`] the serialized result shapes.

pub mod condition;
pub mod engine;
pub mod loops;
pub mod types;

pub use condition::ConditionRegistry;
pub use engine::Executor;
pub use loops::{LoopBinding, parse_loop_expression};
pub use types::{ExecError, ExecResult, StepResult, StepTiming, TestResult, TestStatus};
