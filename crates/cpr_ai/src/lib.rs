pub mod gemini;
pub mod guardrails;
pub mod llm;
pub mod report;
