mod gemini_client;

pub use gemini_client::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, build_prompt, parse_candidates,
};
