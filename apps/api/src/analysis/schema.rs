//! Response schema sent with every analysis call.
//!
//! Gemini's schema dialect uses upper-case type names (`OBJECT`, `STRING`, …).

use serde_json::{json, Value};

pub const ATS_SCORE: &str = "atsScore";
pub const SUMMARY: &str = "summary";
pub const KEY_IMPROVEMENTS: &str = "keyImprovements";
pub const MISSING_KEYWORDS: &str = "missingKeywords";
pub const OPTIMIZED_ENGLISH: &str = "optimizedContentEnglish";
pub const OPTIMIZED_CHINESE: &str = "optimizedContentChinese";

/// Fields the schema marks as required. The score is declared but left optional
/// here; `AnalysisResult` still needs it, so a reply without it fails to parse.
pub const REQUIRED_FIELDS: [&str; 5] = [
    SUMMARY,
    KEY_IMPROVEMENTS,
    OPTIMIZED_ENGLISH,
    OPTIMIZED_CHINESE,
    MISSING_KEYWORDS,
];

pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            ATS_SCORE: {
                "type": "NUMBER",
                "description": "Score from 0 to 100"
            },
            SUMMARY: {
                "type": "STRING",
                "description": "A 2-3 sentence professional summary in English"
            },
            KEY_IMPROVEMENTS: {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of specific improvements made in Chinese"
            },
            MISSING_KEYWORDS: {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of important keywords that were missing (in English)"
            },
            OPTIMIZED_ENGLISH: {
                "type": "STRING",
                "description": "The full optimized resume in English (Markdown format)"
            },
            OPTIMIZED_CHINESE: {
                "type": "STRING",
                "description": "The full optimized resume in Chinese (Markdown format)"
            }
        },
        "required": REQUIRED_FIELDS
    })
}
