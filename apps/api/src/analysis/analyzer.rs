//! Analyzer: one outbound provider call per résumé, typed result back.
//!
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`; production wires `GeminiAnalyzer`,
//! flow tests wire a stub.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::analysis::prompts::ANALYSIS_PROMPT_TEMPLATE;
use crate::analysis::schema::analysis_response_schema;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::AnalysisResult;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("Analysis result rejected: {0}")]
    InvalidResult(String),

    #[error("Analysis task was interrupted")]
    Interrupted,
}

/// The analyzer seam. Implement this to swap providers without touching the flow.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, resume_text: &str) -> Result<AnalysisResult, AnalysisError>;
}

/// Fills the analysis template. The résumé text goes in verbatim.
pub fn build_analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{resume_text}", resume_text)
}

/// Production analyzer backed by Gemini structured output. No caching:
/// every call reaches the provider.
pub struct GeminiAnalyzer {
    llm: LlmClient,
    schema: Value,
}

impl GeminiAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            schema: analysis_response_schema(),
        }
    }
}

#[async_trait]
impl ResumeAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, resume_text: &str) -> Result<AnalysisResult, AnalysisError> {
        let prompt = build_analysis_prompt(resume_text);

        let result: AnalysisResult = self
            .llm
            .call_json(&prompt, Some(JSON_ONLY_SYSTEM), &self.schema)
            .await?;
        result.check_score().map_err(AnalysisError::InvalidResult)?;

        info!(
            "Analysis complete: ats_score={}, improvements={}, missing_keywords={}",
            result.ats_score,
            result.key_improvements.len(),
            result.missing_keywords.len()
        );
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::analysis::schema::ATS_SCORE;
    use crate::llm_client::{mock, RetryPolicy};
    use crate::models::analysis::sample_result;

    const RESUME: &str = "张三\n软件工程师\n2020-2023 某某科技有限公司 负责后端开发, 使用 Rust 和 Go.";

    async fn analyzer_for(reply: (StatusCode, Value)) -> GeminiAnalyzer {
        let (base, _) = mock::spawn(vec![reply]).await;
        let llm = LlmClient::new(
            "test-key".into(),
            RetryPolicy::single_attempt(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base);
        GeminiAnalyzer::new(llm)
    }

    #[test]
    fn test_prompt_embeds_resume_verbatim() {
        let prompt = build_analysis_prompt(RESUME);
        assert!(prompt.ends_with(RESUME));
        assert!(prompt.contains("ATS"));
        assert!(prompt.contains("6. Provide a high-quality professional Chinese translation"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{no_fabrication}"));
    }

    #[tokio::test]
    async fn test_well_formed_reply_yields_result() {
        let body = serde_json::to_string(&sample_result()).unwrap();
        let analyzer = analyzer_for((StatusCode::OK, mock::reply_with_text(&body))).await;
        let result = analyzer.analyze(RESUME).await.unwrap();
        assert_eq!(result, sample_result());
    }

    #[tokio::test]
    async fn test_empty_reply_is_distinct_failure() {
        let analyzer = analyzer_for((StatusCode::OK, json!({ "candidates": [] }))).await;
        let err = analyzer.analyze(RESUME).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Provider(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_reply_missing_a_field_is_parse_failure() {
        let mut value = serde_json::to_value(sample_result()).unwrap();
        value.as_object_mut().unwrap().remove("missingKeywords");
        let analyzer =
            analyzer_for((StatusCode::OK, mock::reply_with_text(&value.to_string()))).await;
        let err = analyzer.analyze(RESUME).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Provider(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_reply_without_score_is_parse_failure() {
        let mut value = serde_json::to_value(sample_result()).unwrap();
        value.as_object_mut().unwrap().remove(ATS_SCORE);
        let analyzer =
            analyzer_for((StatusCode::OK, mock::reply_with_text(&value.to_string()))).await;
        let err = analyzer.analyze(RESUME).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Provider(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected() {
        let mut result = sample_result();
        result.ats_score = 140.0;
        let body = serde_json::to_string(&result).unwrap();
        let analyzer = analyzer_for((StatusCode::OK, mock::reply_with_text(&body))).await;
        let err = analyzer.analyze(RESUME).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidResult(_)));
    }

    #[tokio::test]
    async fn test_provider_error_passes_through() {
        let analyzer = analyzer_for((
            StatusCode::FORBIDDEN,
            json!({ "error": { "message": "permission denied" } }),
        ))
        .await;
        let err = analyzer.analyze(RESUME).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Provider(LlmError::Api { status: 403, .. })
        ));
    }
}
