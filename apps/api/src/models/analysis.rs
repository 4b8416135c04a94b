use serde::{Deserialize, Serialize};

/// Structured output of one résumé analysis, exactly as the provider returns it.
///
/// Created once per successful call and never mutated afterwards. Unknown fields
/// are rejected so schema drift on the provider side surfaces as a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisResult {
    /// ATS compatibility, 0 – 100.
    pub ats_score: f64,
    pub summary: String,
    /// Written in Chinese.
    pub key_improvements: Vec<String>,
    /// Written in English.
    pub missing_keywords: Vec<String>,
    /// Markdown.
    pub optimized_content_english: String,
    /// Markdown.
    pub optimized_content_chinese: String,
}

impl AnalysisResult {
    /// Checks the one constraint the JSON schema cannot express for us.
    pub fn check_score(&self) -> Result<(), String> {
        if !self.ats_score.is_finite() || !(0.0..=100.0).contains(&self.ats_score) {
            return Err(format!(
                "atsScore must be between 0 and 100, got {}",
                self.ats_score
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_result() -> AnalysisResult {
    AnalysisResult {
        ats_score: 72.0,
        summary: "Backend engineer with four years of Rust and Go experience.".to_string(),
        key_improvements: vec!["量化了业绩".to_string(), "使用了更强的动词".to_string()],
        missing_keywords: vec!["Kubernetes".to_string(), "CI/CD".to_string()],
        optimized_content_english: "# Zhang San\n\n## Experience\n\n- Cut p99 latency by 40%\n"
            .to_string(),
        optimized_content_chinese: "# 张三\n\n## 工作经历\n\n- 将 p99 延迟降低 40%\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_camel_case_reply() {
        let json = r##"{
            "atsScore": 64.5,
            "summary": "Data analyst moving into product.",
            "keyImprovements": ["量化了业绩"],
            "missingKeywords": ["SQL", "A/B testing"],
            "optimizedContentEnglish": "# Li Si",
            "optimizedContentChinese": "# 李四"
        }"##;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert!((result.ats_score - 64.5).abs() < f64::EPSILON);
        assert_eq!(result.missing_keywords, vec!["SQL", "A/B testing"]);
        assert_eq!(result.optimized_content_chinese, "# 李四");
    }

    #[test]
    fn test_missing_field_fails() {
        let json = r##"{
            "atsScore": 64,
            "summary": "x",
            "keyImprovements": [],
            "missingKeywords": [],
            "optimizedContentEnglish": "# x"
        }"##;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn test_extra_field_fails() {
        let mut value = serde_json::to_value(sample_result()).unwrap();
        value["confidence"] = serde_json::json!(0.9);
        assert!(serde_json::from_value::<AnalysisResult>(value).is_err());
    }

    #[test]
    fn test_score_bounds() {
        let mut result = sample_result();
        assert!(result.check_score().is_ok());
        result.ats_score = 100.0;
        assert!(result.check_score().is_ok());
        result.ats_score = 101.0;
        assert!(result.check_score().is_err());
        result.ats_score = -1.0;
        assert!(result.check_score().is_err());
        result.ats_score = f64::NAN;
        assert!(result.check_score().is_err());
    }
}
