//! Semantic judging of chatbot responses.
//!
//! Relevancy and hallucination scoring is delegated to an external
//! semantic evaluator behind the [`SemanticJudge`] trait. The production
//! implementation prompts an LLM and parses a fixed `SCORE:` answer
//! format; [`FixedJudge`] stands in when no judge model is reachable.

use async_trait::async_trait;
use rqa_client::ChatbotClient;
use rqa_core::{QaError, Result};

/// External semantic evaluator. Both scores are on `0.0..=1.0`.
#[async_trait]
pub trait SemanticJudge: Send + Sync {
    /// How relevant the response is to the query (1.0 = fully relevant).
    async fn relevancy(&self, query: &str, response: &str, context: Option<&str>)
    -> Result<f64>;

    /// How much of the response is unsupported by the context
    /// (0.0 = fully grounded).
    async fn hallucination(&self, response: &str, context: Option<&str>) -> Result<f64>;
}

/// LLM-backed judge.
pub struct LlmJudge {
    model: ChatbotClient,
}

impl LlmJudge {
    /// Create a judge backed by the given chatbot/LLM client.
    pub fn new(model: ChatbotClient) -> Self {
        Self { model }
    }

    async fn call_judge(&self, prompt: &str) -> Result<String> {
        self.model.ask(prompt, None).await
    }
}

#[async_trait]
impl SemanticJudge for LlmJudge {
    async fn relevancy(
        &self,
        query: &str,
        response: &str,
        context: Option<&str>,
    ) -> Result<f64> {
        let prompt = format!(
            r#"Rate how relevant the following response is to the query.

Query:
"{}"

Context (may be empty):
"{}"

Response to evaluate:
"{}"

Respond in this exact format:
SCORE: [0.0-1.0] (1.0 = fully relevant)
REASONING: [brief explanation]"#,
            query,
            context.unwrap_or(""),
            response
        );
        let answer = self.call_judge(&prompt).await?;
        parse_score(&answer)
    }

    async fn hallucination(&self, response: &str, context: Option<&str>) -> Result<f64> {
        let prompt = format!(
            r#"Rate how much of the following response is unsupported by the context.

Context (may be empty):
"{}"

Response to evaluate:
"{}"

Respond in this exact format:
SCORE: [0.0-1.0] (0.0 = fully grounded, 1.0 = entirely fabricated)
REASONING: [brief explanation]"#,
            context.unwrap_or(""),
            response
        );
        let answer = self.call_judge(&prompt).await?;
        parse_score(&answer)
    }
}

/// Parse the `SCORE:` line out of a judge answer, clamped to `0.0..=1.0`.
fn parse_score(answer: &str) -> Result<f64> {
    for line in answer.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("SCORE:") {
            let token = rest.trim().split_whitespace().next().unwrap_or("");
            let score: f64 = token.parse().map_err(|_| {
                QaError::Evaluation(format!("unparseable judge score: {}", token))
            })?;
            return Ok(score.clamp(0.0, 1.0));
        }
    }
    Err(QaError::Evaluation(format!("judge answer missing SCORE line: {}", answer)))
}

/// Judge returning fixed scores. Useful for offline runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedJudge {
    pub relevancy_score: f64,
    pub hallucination_score: f64,
}

impl FixedJudge {
    pub fn new(relevancy_score: f64, hallucination_score: f64) -> Self {
        Self { relevancy_score, hallucination_score }
    }
}

#[async_trait]
impl SemanticJudge for FixedJudge {
    async fn relevancy(
        &self,
        _query: &str,
        _response: &str,
        _context: Option<&str>,
    ) -> Result<f64> {
        Ok(self.relevancy_score)
    }

    async fn hallucination(&self, _response: &str, _context: Option<&str>) -> Result<f64> {
        Ok(self.hallucination_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        let answer = "SCORE: 0.85\nREASONING: mostly on topic";
        assert_eq!(parse_score(answer).unwrap(), 0.85);
    }

    #[test]
    fn test_parse_score_skips_leading_lines() {
        let answer = "Here is my assessment.\n  SCORE: 0.4 (partially relevant)\nREASONING: x";
        assert_eq!(parse_score(answer).unwrap(), 0.4);
    }

    #[test]
    fn test_parse_score_clamps() {
        assert_eq!(parse_score("SCORE: 1.7").unwrap(), 1.0);
        assert_eq!(parse_score("SCORE: -0.2").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_score_missing_line() {
        let err = parse_score("I think it's fine").unwrap_err();
        assert!(matches!(err, QaError::Evaluation(_)));
    }

    #[test]
    fn test_parse_score_garbage_token() {
        let err = parse_score("SCORE: excellent").unwrap_err();
        assert!(matches!(err, QaError::Evaluation(_)));
    }

    #[tokio::test]
    async fn test_fixed_judge() {
        let judge = FixedJudge::new(0.9, 0.1);
        assert_eq!(judge.relevancy("q", "r", None).await.unwrap(), 0.9);
        assert_eq!(judge.hallucination("r", None).await.unwrap(), 0.1);
    }
}
