//! Trait definition for pluggable image generation backends.

use crate::types::{GenerationRequest, GenerationResult};

/// A prompt-to-image backend.
///
/// Implementations issue exactly one outbound call per [`generate`] and
/// normalise every failure into a [`GenerationError`](crate::GenerationError)
/// classification. No retries are performed.
///
/// All implementations must be `Send + Sync` so a session can hold one
/// behind a shared reference.
///
/// [`generate`]: ImageProvider::generate
pub trait ImageProvider: Send + Sync {
    /// Turn a prompt and aspect ratio into an image.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = GenerationResult> + Send;

    /// Short provider name used in logs.
    fn name(&self) -> &'static str;
}
