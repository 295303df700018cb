//! Text generation port.
//!
//! The provider is a black box: a prompt goes in, text comes out. Calls are
//! stateless.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::domain::errors::DomainResult;

#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a complete response for `prompt`.
    async fn generate(&self, prompt: &str) -> DomainResult<String>;

    /// Generate a response as a sequence of text chunks.
    ///
    /// The default implementation yields the whole of [`Generator::generate`]
    /// as a single chunk.
    async fn generate_stream(&self, prompt: &str) -> DomainResult<BoxStream<'static, DomainResult<String>>> {
        let text = self.generate(prompt).await?;
        Ok(stream::once(async move { Ok(text) }).boxed())
    }
}
