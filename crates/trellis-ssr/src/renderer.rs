use std::fmt::Write;

use futures::future::{FutureExt, LocalBoxFuture};
use trellis_core::{AttributeValue, Element, Runtime, TagElement};

use crate::error::SsrError;

/// Walks an element tree and writes its markup.
#[derive(Debug, Default)]
pub struct Renderer {
    components: usize,
    fallbacks: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn render(&mut self, element: &Element) -> Result<String, SsrError> {
        let mut buf = String::new();
        self.render_to(&mut buf, element).await?;
        log::debug!(
            "rendered {} components ({} suspense fallbacks) into {} bytes",
            self.components,
            self.fallbacks,
            buf.len()
        );
        Ok(buf)
    }

    /// Components invoked so far, sync and async.
    pub fn components_rendered(&self) -> usize {
        self.components
    }

    pub fn render_to<'a>(
        &'a mut self,
        buf: &'a mut String,
        element: &'a Element,
    ) -> LocalBoxFuture<'a, Result<(), SsrError>> {
        async move {
            match element {
                Element::Empty => {}
                Element::Text(text) => {
                    write!(buf, "{}", askama_escape::escape(&**text, askama_escape::Html))?
                }
                Element::List(children) | Element::Fragment(children) => {
                    for child in children.iter() {
                        self.render_to(buf, child).await?;
                    }
                }
                Element::Tag(tag) => self.render_tag(buf, tag).await?,
                Element::Component(component) => {
                    self.components += 1;
                    // Fresh runtime per component: same-named siblings must
                    // not share hook slots.
                    let rendered = Runtime::detached()
                        .call_component(component)
                        .map_err(SsrError::UnhandledSuspense)?;
                    self.render_to(buf, &rendered).await?;
                }
                Element::AsyncComponent(component) => {
                    self.components += 1;
                    let rendered = component.start().await.map_err(|source| {
                        SsrError::AsyncComponent {
                            name: component.name(),
                            source,
                        }
                    })?;
                    self.render_to(buf, &rendered).await?;
                }
                Element::Suspense(boundary) => {
                    let mut content = String::new();
                    match self.render_to(&mut content, boundary.content()).await {
                        Ok(()) => buf.push_str(&content),
                        Err(SsrError::UnhandledSuspense(suspended)) => {
                            log::trace!("rendering suspense fallback: {suspended}");
                            self.fallbacks += 1;
                            self.render_to(buf, boundary.fallback()).await?;
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
            Ok(())
        }
        .boxed_local()
    }

    async fn render_tag(&mut self, buf: &mut String, tag: &TagElement) -> Result<(), SsrError> {
        let name = tag.tag_name();
        write!(buf, "<{name}")?;
        for (attribute, value) in tag.attributes() {
            let attribute = attribute.to_ascii_lowercase();
            match value {
                AttributeValue::Bool(true) => write!(buf, " {attribute}")?,
                AttributeValue::Bool(false) => {}
                value => {
                    if let Some(text) = value.to_host_string() {
                        write!(
                            buf,
                            " {attribute}=\"{}\"",
                            askama_escape::escape(text.as_str(), askama_escape::Html)
                        )?;
                    }
                }
            }
        }
        if let Some(class_name) = tag.class_name() {
            write!(
                buf,
                " class=\"{}\"",
                askama_escape::escape(class_name, askama_escape::Html)
            )?;
        }

        let mut styles = tag.styles().peekable();
        if styles.peek().is_some() {
            buf.push_str(" style=\"");
            for (index, (property, value)) in styles.enumerate() {
                if index > 0 {
                    buf.push(' ');
                }
                write!(
                    buf,
                    "{}: {};",
                    kebab_case(property),
                    askama_escape::escape(value, askama_escape::Html)
                )?;
            }
            buf.push('"');
        }
        buf.push('>');

        for child in tag.child_elements() {
            self.render_to(buf, child).await?;
        }
        write!(buf, "</{name}>")?;
        Ok(())
    }
}

/// `backgroundColor` becomes `background-color`; names that already contain a
/// dash are left alone.
fn kebab_case(property: &str) -> String {
    if property.contains('-') {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::kebab_case;

    #[test]
    fn converts_camel_case_properties() {
        assert_eq!(kebab_case("backgroundColor"), "background-color");
        assert_eq!(kebab_case("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(kebab_case("color"), "color");
        assert_eq!(kebab_case("--custom-Value"), "--custom-Value");
    }
}
