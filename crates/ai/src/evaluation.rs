use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("evaluation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("evaluation service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("evaluation response did not match the expected JSON shape: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("evaluation response contained no text content")]
    EmptyResponse,
}

/// Structured scoring artifact returned by the evaluation service.
///
/// `overall_score` is the service's own figure; we do not recompute it from
/// the criterion scores. Gross inconsistency between the two is a
/// data-quality signal for downstream consumers, not a validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub scores: EvaluationScores,
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
}

/// Per-criterion scores, each expected in [1, 10].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationScores {
    pub framework: f64,
    pub clarity: f64,
    pub depth: f64,
    pub user_focus: f64,
    pub business_acumen: f64,
}

/// Trait for pluggable answer-scoring backends.
#[async_trait]
pub trait Evaluator: Send + Sync + 'static {
    /// Scores a transcribed answer against the question it responds to.
    async fn evaluate(
        &self,
        question_title: &str,
        question_description: &str,
        transcript: &str,
    ) -> Result<Evaluation, EvaluationError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// Answer scoring via the Anthropic messages API.
pub struct ClaudeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ClaudeClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, EvaluationError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
        })
    }
}

#[async_trait]
impl Evaluator for ClaudeClient {
    async fn evaluate(
        &self,
        question_title: &str,
        question_description: &str,
        transcript: &str,
    ) -> Result<Evaluation, EvaluationError> {
        let prompt = build_rubric_prompt(question_title, question_description, transcript);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .ok_or(EvaluationError::EmptyResponse)?;

        let evaluation = parse_evaluation(text)?;
        debug!(overall = evaluation.overall_score, "evaluation complete");
        Ok(evaluation)
    }

    fn name(&self) -> &str {
        "claude"
    }
}

/// Parses an [`Evaluation`] out of a model response, tolerating the JSON
/// being wrapped in a markdown code fence (with or without a language tag)
/// and surrounded by prose.
pub fn parse_evaluation(text: &str) -> Result<Evaluation, EvaluationError> {
    Ok(serde_json::from_str(extract_json_block(text))?)
}

/// Returns the JSON payload of a model response.
///
/// If the text contains a fenced code block, the content between the first
/// fence line (whose language tag, if any, is discarded) and the closing
/// fence is returned. Otherwise the trimmed text itself is returned and left
/// to the JSON parser to accept or reject.
pub fn extract_json_block(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text.trim();
    };
    let after_fence = &text[open + 3..];
    // Drop the rest of the fence line (e.g. a "json" tag).
    let body = match after_fence.find('\n') {
        Some(eol) => &after_fence[eol + 1..],
        None => after_fence,
    };
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

fn build_rubric_prompt(title: &str, description: &str, transcript: &str) -> String {
    format!(
        r#"You are an experienced product management interviewer evaluating a candidate's answer to a PM interview question.

Question: {title}
Description: {description}

Candidate's Answer:
{transcript}

Please evaluate this answer on the following criteria (score each out of 10):
1. Framework/Structure - Did they use a clear framework or structured approach?
2. Clarity - Was the answer clear and easy to follow?
3. Depth - Did they provide sufficient detail and depth in their analysis?
4. User Focus - Did they demonstrate understanding of user needs?
5. Business Acumen - Did they show business/product sense?

Provide your evaluation in JSON format with the following structure:
{{
    "scores": {{
        "framework": <score 1-10>,
        "clarity": <score 1-10>,
        "depth": <score 1-10>,
        "user_focus": <score 1-10>,
        "business_acumen": <score 1-10>
    }},
    "overall_score": <average score>,
    "strengths": ["strength 1", "strength 2", ...],
    "improvements": ["area for improvement 1", "area for improvement 2", ...],
    "summary": "Brief 2-3 sentence summary of the answer quality"
}}

Be constructive but honest in your feedback."#
    )
}
