//! Refinement loop integration tests
//!
//! Exercises the public controller flow with a mock LLM client and a
//! scripted runner, without touching the Anthropic API or a real
//! Python interpreter.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use rexgen::controller::{ControllerConfig, RefineOutcome, RetryController};
use rexgen::llm::MockLlmClient;
use rexgen::runner::{RunOutcome, RunReport, SuiteRunner};
use rexgen::suite::{SUITE_FILE_NAME, TestSuite};

const ZIP_SUITE: &str = r#"import unittest
import re

class RegexTest(unittest.TestCase):
    def setUp(self):
        # The actual regex pattern will be replaced here
        self.regex_pattern = r"YOUR_REGEX_PATTERN_HERE"
        self.pattern = re.compile(self.regex_pattern)

    def test_positive_cases(self):
        positive_cases = [
            ("12345", "plain five digit code"),
            ("12345-6789", "zip plus four extension"),
        ]
        for test_string, explanation in positive_cases:
            with self.subTest(test_string=test_string):
                self.assertTrue(self.pattern.match(test_string), f"Should match: {explanation}")

    def test_negative_cases(self):
        negative_cases = [
            ("1234", "too few digits"),
            ("123456", "too many digits without a dash"),
        ]
        for test_string, explanation in negative_cases:
            with self.subTest(test_string=test_string):
                self.assertFalse(self.pattern.match(test_string), f"Should not match: {explanation}")

if __name__ == '__main__':
    unittest.main()
"#;

fn report(outcome: RunOutcome, output: &str) -> RunReport {
    RunReport {
        outcome,
        output: output.to_string(),
        duration: Duration::from_millis(1),
    }
}

fn failed() -> RunReport {
    report(
        RunOutcome::Failed {
            failures: 1,
            errors: 0,
        },
        "FAIL: test_positive_cases\n\nFAILED (failures=1)\n",
    )
}

fn passed() -> RunReport {
    report(RunOutcome::Passed, "Ran 2 tests in 0.001s\n\nOK\n")
}

/// Runner that replays scripted reports, repeating the last one.
struct ScriptedRunner {
    reports: Mutex<VecDeque<RunReport>>,
    calls: AtomicUsize,
}

impl ScriptedRunner {
    fn new(reports: impl IntoIterator<Item = RunReport>) -> Self {
        Self {
            reports: Mutex::new(reports.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuiteRunner for ScriptedRunner {
    async fn run(&self, _suite_path: &Path) -> RunReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut reports = self.reports.lock().unwrap();
        if reports.len() > 1 {
            reports.pop_front().unwrap()
        } else {
            reports.front().cloned().unwrap_or_else(failed)
        }
    }
}

fn config_in(dir: &TempDir) -> ControllerConfig {
    ControllerConfig {
        workdir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

/// Zip-code scenario: a bad first pattern is refined after feedback and the
/// loop converges on the second attempt.
#[tokio::test]
async fn test_zip_code_refinement_converges() {
    let dir = TempDir::new().unwrap();
    let llm = Arc::new(MockLlmClient::with_responses([
        ZIP_SUITE,
        r"^\d{5}$",
        r"^\d{5}(-\d{4})?$",
    ]));
    // attempt 1: failed; attempt 2 re-run: failed; attempt 2: passed
    let runner = Arc::new(ScriptedRunner::new([failed(), failed(), passed()]));

    let controller = RetryController::new(llm.clone(), runner.clone(), config_in(&dir));
    let outcome = controller
        .run("a US zip code, 5 digits optionally followed by -4 digits")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RefineOutcome::Converged {
            pattern: r"^\d{5}(-\d{4})?$".to_string(),
            attempts: 2
        }
    );
    assert_eq!(llm.call_count(), 3);
    assert_eq!(runner.call_count(), 3);
    assert!(!dir.path().join(SUITE_FILE_NAME).exists());
}

/// Ten failing attempts end in exhaustion with the suite file removed.
#[tokio::test]
async fn test_exhaustion_cleans_up() {
    let dir = TempDir::new().unwrap();
    let llm = Arc::new(MockLlmClient::with_responses([ZIP_SUITE, r"\d+"]));
    let runner = Arc::new(ScriptedRunner::new([failed()]));

    let controller = RetryController::new(llm.clone(), runner.clone(), config_in(&dir));
    let outcome = controller.run("a US zip code").await.unwrap();

    assert_eq!(outcome, RefineOutcome::Exhausted { attempts: 10 });
    // One pattern proposal per attempt after the single suite call.
    assert_eq!(llm.call_count(), 11);
    assert!(!dir.path().join(SUITE_FILE_NAME).exists());
}

/// A clean first run stops immediately with no re-run of a previous pattern.
#[tokio::test]
async fn test_immediate_success_stops_after_one_run() {
    let dir = TempDir::new().unwrap();
    let llm = Arc::new(MockLlmClient::with_responses([
        ZIP_SUITE,
        r"^\d{5}(-\d{4})?$",
    ]));
    let runner = Arc::new(ScriptedRunner::new([passed()]));

    let controller = RetryController::new(llm.clone(), runner.clone(), config_in(&dir));
    let outcome = controller.run("a US zip code").await.unwrap();

    assert!(matches!(outcome, RefineOutcome::Converged { attempts: 1, .. }));
    assert_eq!(runner.call_count(), 1);
    assert_eq!(llm.call_count(), 2);
}

/// Injecting the same pattern twice leaves the rendered suite unchanged.
#[test]
fn test_injection_is_idempotent_end_to_end() {
    let mut suite = TestSuite::from_generated(ZIP_SUITE);
    suite.set_pattern(r"^\d{5}(-\d{4})?$");
    let once = suite.render();

    let mut again = TestSuite::from_generated(once.clone());
    again.set_pattern(r"^\d{5}(-\d{4})?$");

    assert_eq!(again.render(), once);
}
