//! Generator wrappers around the LLM client.
//!
//! Two calls per run shape: the suite generator runs once at the start, the
//! pattern generator runs once per attempt. Generation failures propagate
//! unchanged and end the run.

use std::sync::Arc;

use log::{debug, info};

use crate::error::{Result, RexgenError};
use crate::llm::LlmClient;
use crate::prompt;
use crate::suite::TestSuite;

/// Drafts the unittest suite from the task description.
pub struct SuiteGenerator<L: LlmClient> {
    llm: Arc<L>,
    max_tokens: u32,
}

impl<L: LlmClient> SuiteGenerator<L> {
    pub fn new(llm: Arc<L>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Generate the test suite for the description.
    ///
    /// The returned program text is not checked against the expected
    /// template; malformed output surfaces later as a failing run.
    pub async fn generate(&self, description: &str) -> Result<TestSuite> {
        let request = prompt::suite_request(description).with_max_tokens(self.max_tokens);
        let response = self.llm.complete(request).await?;

        let source = strip_code_fences(&response.content);
        if source.trim().is_empty() {
            return Err(RexgenError::Llm(
                "Suite generation returned empty completion".to_string(),
            ));
        }

        info!(
            "Generated test suite ({} lines, {} output tokens)",
            source.lines().count(),
            response.usage.output_tokens
        );
        Ok(TestSuite::from_generated(source))
    }
}

/// Proposes a candidate pattern from the description, suite, and run output.
pub struct PatternGenerator<L: LlmClient> {
    llm: Arc<L>,
    max_tokens: u32,
}

impl<L: LlmClient> PatternGenerator<L> {
    pub fn new(llm: Arc<L>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Propose a pattern. The result is used verbatim (trimmed), with no
    /// syntax validation before injection.
    pub async fn propose(
        &self,
        description: &str,
        suite: &TestSuite,
        results: &str,
    ) -> Result<String> {
        let request = prompt::pattern_request(description, suite.template(), results)
            .with_max_tokens(self.max_tokens);
        let response = self.llm.complete(request).await?;

        let pattern = response.content.trim().to_string();
        debug!("Proposed pattern: {}", pattern);
        Ok(pattern)
    }
}

/// Strip a single wrapping markdown code fence, if present.
///
/// The suite prompt asks for bare source, but models still fence it often
/// enough that the fence has to be tolerated.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed.to_string();
    };

    // Drop the language tag on the opening fence line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim_end().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;

    const SUITE_TEXT: &str = "import unittest\nimport re\n";

    #[tokio::test]
    async fn test_suite_generator_returns_suite() {
        let llm = Arc::new(MockLlmClient::with_responses([SUITE_TEXT]));
        let generator = SuiteGenerator::new(llm.clone(), 4096);

        let suite = generator.generate("a US zip code").await.unwrap();
        assert_eq!(suite.template(), SUITE_TEXT.trim());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_suite_generator_unwraps_fenced_output() {
        let fenced = format!("```python\n{}```", SUITE_TEXT);
        let llm = Arc::new(MockLlmClient::with_responses([fenced]));
        let generator = SuiteGenerator::new(llm, 4096);

        let suite = generator.generate("anything").await.unwrap();
        assert!(suite.template().starts_with("import unittest"));
        assert!(!suite.template().contains("```"));
    }

    #[tokio::test]
    async fn test_suite_generator_rejects_empty_completion() {
        let llm = Arc::new(MockLlmClient::new());
        let generator = SuiteGenerator::new(llm, 4096);

        let err = generator.generate("anything").await.unwrap_err();
        assert!(matches!(err, RexgenError::Llm(_)));
    }

    #[tokio::test]
    async fn test_pattern_generator_trims_verbatim() {
        let llm = Arc::new(MockLlmClient::with_responses(["  ^\\d{5}$\n"]));
        let generator = PatternGenerator::new(llm, 1024);
        let suite = TestSuite::from_generated(SUITE_TEXT);

        let pattern = generator
            .propose("zip", &suite, "FAILED (failures=1)")
            .await
            .unwrap();
        assert_eq!(pattern, "^\\d{5}$");
    }

    #[test]
    fn test_strip_code_fences_plain_text() {
        assert_eq!(strip_code_fences("no fences"), "no fences");
    }

    #[test]
    fn test_strip_code_fences_with_language_tag() {
        let stripped = strip_code_fences("```python\nimport re\n```");
        assert_eq!(stripped, "import re");
    }

    #[test]
    fn test_strip_code_fences_unterminated_left_alone() {
        let stripped = strip_code_fences("```python\nimport re");
        assert_eq!(stripped, "```python\nimport re");
    }
}
