// Résumé analysis: prompt, response schema and the analyzer seam.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod schema;

pub use analyzer::{AnalysisError, GeminiAnalyzer, ResumeAnalyzer};
