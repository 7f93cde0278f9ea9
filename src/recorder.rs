//! Run-level result collection and persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::executor::{StepTiming, TestResult, TestStatus};

/// Accumulates one [`TestResult`] per executed case and writes the run log.
#[derive(Debug, Default)]
pub struct ResultRecorder {
    results: Vec<TestResult>,
}

impl ResultRecorder {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.status == TestStatus::Failed)
            .count()
    }

    /// Serialize every recorded result to `logs-<timestamp>.json` under
    /// `output_dir`, creating the directory if needed. Returns the path of
    /// the written file.
    pub fn save_logs(&self, output_dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("logs-{}.json", formatted_timestamp()));
        let json = serde_json::to_string_pretty(&self.results)
            .map_err(|e| io::Error::other(e.to_string()))?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

fn formatted_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Print the timing report for one case: total duration, then one line per
/// executed step.
pub fn report_timing(result: &TestResult, timings: &[StepTiming]) {
    println!(
        "Test \"{}\" finished in {} ms ({} steps)",
        result.test_name,
        result.duration_ms,
        result.steps.len()
    );
    for timing in timings {
        println!("  step {}: {} ms", timing.step_number, timing.duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{StepResult, TestStatus};
    use pretty_assertions::assert_eq;

    fn result(name: &str, status: TestStatus) -> TestResult {
        TestResult {
            test_name: name.to_string(),
            steps: vec![StepResult {
                step_number: 1,
                action: "Click {}".to_string(),
                parameters: vec!["Submit".to_string()],
                status,
                error: None,
                screenshot_path: None,
                video_path: None,
            }],
            status,
            duration_ms: 12,
        }
    }

    #[test]
    fn test_failed_count() {
        let mut recorder = ResultRecorder::new();
        recorder.record(result("a", TestStatus::Passed));
        recorder.record(result("b", TestStatus::Failed));
        recorder.record(result("c", TestStatus::Failed));
        assert_eq!(recorder.failed_count(), 2);
        assert_eq!(recorder.results().len(), 3);
    }

    #[test]
    fn test_save_logs_writes_timestamped_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = ResultRecorder::new();
        recorder.record(result("login works", TestStatus::Passed));

        let path = recorder.save_logs(dir.path()).unwrap();
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("logs-"));
        assert!(file_name.ends_with(".json"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<TestResult> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].test_name, "login works");
    }

    #[test]
    fn test_save_logs_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("nested");
        let recorder = ResultRecorder::new();
        let path = recorder.save_logs(&nested).unwrap();
        assert!(path.exists());
    }
}
