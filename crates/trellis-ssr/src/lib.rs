//! Render Trellis elements to HTML strings.
//!
//! Synchronous components run against a throwaway runtime, so hooks see their
//! initial values and effects never run. Async components are awaited. A
//! subtree that suspends is replaced by the fallback of its nearest
//! [`Element::suspense`] boundary.

mod error;
pub mod renderer;

use trellis_core::Element;

pub use crate::error::SsrError;
pub use crate::renderer::Renderer;

/// A convenience function to render an element tree to a string.
pub async fn render_to_string(element: &Element) -> Result<String, SsrError> {
    Renderer::new().render(element).await
}
