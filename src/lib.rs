//! StepScript - keyword-driven test scripts with nested control flow.
//!
//! This crate provides:
//! - A bilingual (English/Russian) script parser that turns flat, indented
//!   keyword lines into nested If/Else/Loop step trees
//! - An async tree-walking executor with a shared variable environment,
//!   pluggable action libraries and fail-fast per-case results
//! - Condition predicates and `for each` loop expressions
//! - JSON run logs and per-step timing reports
//!
//! # Example
//!
//! ```rust,no_run
//! use stepscript::{DryRunActions, Executor, parse};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cases = parse("Test: login\nEnter \"standard_user\" into the username field\n").unwrap();
//! let mut executor = Executor::new(DryRunActions::new());
//! for case in &cases {
//!     let result = executor.execute_test_case(case).await;
//!     println!("{}: {:?}", result.test_name, result.status);
//! }
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod executor;
pub mod parser;
pub mod recorder;
pub mod vars;

// Re-export parser types
pub use parser::{ParseError, ParseResult, TestCase, TestStep, parse, parse_step};

// Re-export executor types
pub use executor::{
    ConditionRegistry, ExecError, ExecResult, Executor, LoopBinding, StepResult, StepTiming,
    TestResult, TestStatus, parse_loop_expression,
};

// Re-export the action seam
pub use actions::{ActionFailure, ActionLibrary, ActionResult, DryRunActions};

// Re-export result recording
pub use recorder::{ResultRecorder, report_timing};

// Re-export the variable environment
pub use vars::Environment;
