//! Action library interface.
//!
//! The interpreter knows nothing about what actions *do*: every leaf step is
//! handed to an [`ActionLibrary`] implementation, which typically drives a
//! live automation session (created lazily on first use, torn down between
//! cases). Implementations own any screenshot/video capture on failure and
//! report artifact paths back through [`ActionFailure`], using the directories
//! from [`crate::config`].

use std::path::PathBuf;

use crate::vars::Environment;

/// A failed action dispatch with a human-readable message and any failure
/// artifacts captured by the library.
#[derive(Debug, Clone)]
pub struct ActionFailure {
    pub message: String,
    pub screenshot_path: Option<PathBuf>,
    pub video_path: Option<PathBuf>,
}

impl ActionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            screenshot_path: None,
            video_path: None,
        }
    }

    pub fn with_screenshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot_path = Some(path.into());
        self
    }

    pub fn with_video(mut self, path: impl Into<PathBuf>) -> Self {
        self.video_path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ActionFailure {}

/// Result type for action dispatch
pub type ActionResult = Result<(), ActionFailure>;

/// External executor of leaf action steps.
///
/// `perform` receives the variable-substituted action template and its
/// substituted parameters. The shared [`Environment`] is passed mutably so a
/// library can record named results (e.g. remember a price) that later steps
/// and conditions read back.
#[allow(async_fn_in_trait)]
pub trait ActionLibrary {
    /// Execute one action. A returned [`ActionFailure`] fails the current
    /// test case fast; remaining steps of that case do not run.
    async fn perform(
        &mut self,
        action: &str,
        parameters: &[String],
        env: &mut Environment,
    ) -> ActionResult;

    /// Tear down session state between test cases. Default is a no-op for
    /// libraries without a live session.
    async fn teardown(&mut self) -> ActionResult {
        Ok(())
    }
}

/// Action library that accepts every action and records the dispatch log.
///
/// Used by the CLI to validate scripts without a live automation session,
/// and by tests to assert dispatch order.
#[derive(Debug, Default)]
pub struct DryRunActions {
    /// `(action, parameters)` pairs in dispatch order
    pub log: Vec<(String, Vec<String>)>,
}

impl DryRunActions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActionLibrary for DryRunActions {
    async fn perform(
        &mut self,
        action: &str,
        parameters: &[String],
        _env: &mut Environment,
    ) -> ActionResult {
        self.log.push((action.to_string(), parameters.to_vec()));
        Ok(())
    }
}
