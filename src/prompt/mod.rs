//! Prompt construction for the two generation calls.
//!
//! Prompts are fixed templates; the task description, suite source, and run
//! results are interpolated per call.

use crate::llm::CompletionRequest;

/// Result text used on the first attempt, before any run has happened.
pub const INITIAL_RESULTS_SENTINEL: &str = "This is the initial try, so no test results yet.";

/// System prompt for drafting the unittest suite.
const SUITE_SYSTEM_PROMPT: &str = r#"You are an expert designed to generate a complete Python test program for regular expressions based on natural language descriptions. Your task is to create a comprehensive set of test cases and the surrounding test program structure, leaving a placeholder for the actual regex pattern.

When presented with a user's description of a desired regex pattern, follow these guidelines:

1. Create at least 5 positive test cases (strings that should match the pattern).
2. Create at least 5 negative test cases (strings that should not match the pattern).
3. Include edge cases and boundary conditions in your test cases.
4. Consider common mistakes or misunderstandings that might occur when implementing the regex.
5. Provide a brief explanation for each test case as a comment.

Your output must be a complete Python script using the `unittest` framework, structured as follows:

```python
import unittest
import re

class RegexTest(unittest.TestCase):
    def setUp(self):
        # The actual regex pattern will be replaced here
        self.regex_pattern = r"YOUR_REGEX_PATTERN_HERE"
        self.pattern = re.compile(self.regex_pattern)

    def test_positive_cases(self):
        positive_cases = [
            ("test_string1", "explanation for why this should match"),
            ("test_string2", "explanation for why this should match"),
            # Add more positive test cases here
        ]
        for test_string, explanation in positive_cases:
            with self.subTest(test_string=test_string):
                self.assertTrue(self.pattern.match(test_string), f"Should match: {explanation}")

    def test_negative_cases(self):
        negative_cases = [
            ("test_string1", "explanation for why this should not match"),
            ("test_string2", "explanation for why this should not match"),
            # Add more negative test cases here
        ]
        for test_string, explanation in negative_cases:
            with self.subTest(test_string=test_string):
                self.assertFalse(self.pattern.match(test_string), f"Should not match: {explanation}")

if __name__ == '__main__':
    unittest.main()
```

Remember:
- Be thorough and creative in your test case generation.
- Ensure your test cases cover a wide range of possibilities.
- Keep in mind the specific requirements mentioned in the user's description.
- If the user's description is ambiguous, generate test cases for multiple interpretations and note the ambiguity.
- Ensure all test cases are valid Python strings.
- Do not implement the actual regex pattern; use the placeholder "YOUR_REGEX_PATTERN_HERE".
- Respond with the Python source only, no commentary before or after it."#;

/// Build the completion request that drafts the test suite.
pub fn suite_request(description: &str) -> CompletionRequest {
    CompletionRequest::new(SUITE_SYSTEM_PROMPT).with_user_message(format!(
        "Generate test cases for the following prompt: {}",
        description
    ))
}

/// Build the completion request that proposes a candidate pattern.
///
/// `results` is either real run output or [`INITIAL_RESULTS_SENTINEL`].
pub fn pattern_request(description: &str, suite_source: &str, results: &str) -> CompletionRequest {
    CompletionRequest::default().with_user_message(format!(
        "Based on the following user prompt and Python test cases, generate a regex pattern \
         that matches all positive cases and none of the negative cases. If any tests failed, \
         use the provided test results to refine the pattern:\n\n\
         User Prompt: {}\n\n\
         ```python\n{}\n```\n\n\
         Test Results:\n{}\n\n\
         Your response should be the regex pattern only, without any additional text. \
         Don't include it in a code block, just the pattern.",
        description, suite_source, results
    ))
}
