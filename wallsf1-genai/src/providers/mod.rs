//! Concrete image generation backends.

pub mod gemini;

pub use gemini::GeminiProvider;
