//! Tree-walking interpreter for parsed test cases.
//!
//! One [`Executor`] owns an action library, the shared variable environment
//! and the condition registry for a whole run. Test cases execute strictly
//! sequentially; within a case, steps execute in order and the first action
//! failure aborts the remainder of that case (fail-fast) without aborting the
//! run — each case is isolated.

use std::time::Instant;

use crate::actions::{ActionLibrary, ActionResult};
use crate::parser::{TestCase, TestStep};
use crate::recorder::ResultRecorder;
use crate::vars::Environment;

use super::condition::ConditionRegistry;
use super::loops::parse_loop_expression;
use super::types::{ExecResult, StepResult, StepTiming, TestResult, TestStatus};

/// Interpreter for parsed step trees.
pub struct Executor<A: ActionLibrary> {
    actions: A,
    env: Environment,
    conditions: ConditionRegistry,
    recorder: ResultRecorder,
    timings: Vec<StepTiming>,
    step_counter: usize,
    verbose: bool,
}

impl<A: ActionLibrary> Executor<A> {
    pub fn new(actions: A) -> Self {
        Self::with_conditions(actions, ConditionRegistry::new())
    }

    /// Build an executor with a custom condition registry.
    pub fn with_conditions(actions: A, conditions: ConditionRegistry) -> Self {
        Self {
            actions,
            env: Environment::new(),
            conditions,
            recorder: ResultRecorder::new(),
            timings: Vec::new(),
            step_counter: 0,
            verbose: true,
        }
    }

    /// Enable or disable per-step console reporting.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Results recorded so far, one per executed case.
    pub fn recorder(&self) -> &ResultRecorder {
        &self.recorder
    }

    /// Per-step timings of the most recently executed case.
    pub fn step_timings(&self) -> &[StepTiming] {
        &self.timings
    }

    /// Tear down the action library's session state between cases.
    pub async fn teardown(&mut self) -> ActionResult {
        self.actions.teardown().await
    }

    /// Execute one test case and record its result. A step failure marks the
    /// case failed and skips its remaining steps; the executor stays usable
    /// for the next case.
    pub async fn execute_test_case(&mut self, case: &TestCase) -> TestResult {
        if self.verbose {
            println!("\nTest: {}", case.name);
        }
        self.timings.clear();
        self.step_counter = 0;

        let started = Instant::now();
        let mut result = TestResult {
            test_name: case.name.clone(),
            steps: Vec::new(),
            status: TestStatus::Passed,
            duration_ms: 0,
        };

        match self.execute_steps(&case.steps, &mut result).await {
            Ok(()) => {
                if self.verbose {
                    println!("Test \"{}\" passed.", case.name);
                }
            }
            Err(error) => {
                result.status = TestStatus::Failed;
                if self.verbose {
                    eprintln!("Test \"{}\" failed: {}", case.name, error);
                }
            }
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        self.recorder.record(result.clone());
        result
    }

    async fn execute_steps(
        &mut self,
        steps: &[TestStep],
        result: &mut TestResult,
    ) -> ExecResult<()> {
        for step in steps {
            self.execute_step(step, result).await?;
        }
        Ok(())
    }

    async fn execute_step(&mut self, step: &TestStep, result: &mut TestResult) -> ExecResult<()> {
        match step {
            TestStep::Action {
                template,
                parameters,
            } => self.execute_action(template, parameters, result).await,
            TestStep::If {
                condition,
                children,
            } => self.execute_if(condition, children, result).await,
            TestStep::Loop {
                expression,
                children,
            } => self.execute_loop(expression, children, result).await,
            // Branch markers are consumed during parsing; one reached
            // directly in a step list is a no-op.
            TestStep::Else { .. } | TestStep::EndIf | TestStep::EndLoop => Ok(()),
        }
    }

    async fn execute_action(
        &mut self,
        template: &str,
        parameters: &[String],
        result: &mut TestResult,
    ) -> ExecResult<()> {
        let action = self.env.substitute(template);
        let parameters: Vec<String> = parameters
            .iter()
            .map(|parameter| self.env.substitute(parameter))
            .collect();

        self.step_counter += 1;
        let step_number = self.step_counter;
        let started = Instant::now();

        let outcome = self.actions.perform(&action, &parameters, &mut self.env).await;
        self.timings.push(StepTiming {
            step_number,
            duration_ms: started.elapsed().as_millis() as u64,
        });

        match outcome {
            Ok(()) => {
                if self.verbose {
                    println!(
                        "Step {} passed: {}{}",
                        step_number,
                        action,
                        format_parameters(&parameters)
                    );
                }
                result.steps.push(StepResult {
                    step_number,
                    action,
                    parameters,
                    status: TestStatus::Passed,
                    error: None,
                    screenshot_path: None,
                    video_path: None,
                });
                Ok(())
            }
            Err(failure) => {
                if self.verbose {
                    eprintln!(
                        "Step {} failed: {}{} ({})",
                        step_number,
                        action,
                        format_parameters(&parameters),
                        failure.message
                    );
                }
                result.steps.push(StepResult {
                    step_number,
                    action,
                    parameters,
                    status: TestStatus::Failed,
                    error: Some(failure.message.clone()),
                    screenshot_path: failure.screenshot_path.clone(),
                    video_path: failure.video_path.clone(),
                });
                result.status = TestStatus::Failed;
                Err(failure.into())
            }
        }
    }

    async fn execute_if(
        &mut self,
        condition: &str,
        children: &[TestStep],
        result: &mut TestResult,
    ) -> ExecResult<()> {
        let condition = self.env.substitute(condition);

        if self.conditions.evaluate(&condition, &self.env) {
            for step in children {
                if !matches!(step, TestStep::Else { .. }) {
                    Box::pin(self.execute_step(step, result)).await?;
                }
            }
            return Ok(());
        }

        // Branches in written order; first truthy (or unconditional) wins.
        for step in children {
            if let TestStep::Else {
                condition,
                children,
            } = step
            {
                let taken = match condition {
                    None => true,
                    Some(alternate) => {
                        let alternate = self.env.substitute(alternate);
                        self.conditions.evaluate(&alternate, &self.env)
                    }
                };
                if taken {
                    return Box::pin(self.execute_steps(children, result)).await;
                }
            }
        }
        Ok(())
    }

    async fn execute_loop(
        &mut self,
        expression: &str,
        children: &[TestStep],
        result: &mut TestResult,
    ) -> ExecResult<()> {
        let expression = self.env.substitute(expression);
        let binding = parse_loop_expression(&expression)?;

        for item in &binding.items {
            self.env.set(binding.variable.clone(), item.clone());

            // Each top-level body step runs with the current item as its
            // sole parameter, overriding whatever was parsed. Kept for
            // script compatibility even though it shadows explicit literals.
            let body: Vec<TestStep> = children
                .iter()
                .map(|step| match step {
                    TestStep::Action { template, .. } => TestStep::Action {
                        template: template.clone(),
                        parameters: vec![item.clone()],
                    },
                    other => other.clone(),
                })
                .collect();

            Box::pin(self.execute_steps(&body, result)).await?;
        }
        Ok(())
    }
}

/// Printable form of a step's parameters: empty strings and bare `{}` entries
/// are filtered; the rest render as ` [a, b]`.
fn format_parameters(parameters: &[String]) -> String {
    let filtered: Vec<&str> = parameters
        .iter()
        .map(String::as_str)
        .filter(|parameter| !parameter.is_empty() && *parameter != "{}")
        .collect();
    if filtered.is_empty() {
        String::new()
    } else {
        format!(" [{}]", filtered.join(", "))
    }
}
