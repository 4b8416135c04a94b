// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System instruction fragment that enforces JSON-only output.
/// Sent alongside a response schema; the schema alone does not stop chatter in text parts.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every rewriting prompt.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Only rephrase, reorder and quantify what the source text already states. \
    Do NOT invent employers, dates, degrees, titles or metrics. \
    If a detail is missing, leave it out rather than guessing.";
