use std::error::Error;
use std::fmt;

use trellis_core::Suspended;

#[derive(Debug)]
pub enum SsrError {
    /// A component suspended with no [`trellis_core::Element::suspense`]
    /// boundary above it.
    UnhandledSuspense(Suspended),
    AsyncComponent {
        name: &'static str,
        source: Box<dyn Error>,
    },
    Format(fmt::Error),
}

impl fmt::Display for SsrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsrError::UnhandledSuspense(suspended) => {
                write!(f, "suspended outside of any suspense boundary: {suspended}")
            }
            SsrError::AsyncComponent { name, source } => {
                write!(f, "async component {name} failed: {source}")
            }
            SsrError::Format(err) => write!(f, "failed to write markup: {err}"),
        }
    }
}

impl Error for SsrError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SsrError::AsyncComponent { source, .. } => Some(source.as_ref()),
            SsrError::Format(err) => Some(err),
            SsrError::UnhandledSuspense(_) => None,
        }
    }
}

impl From<fmt::Error> for SsrError {
    fn from(err: fmt::Error) -> Self {
        SsrError::Format(err)
    }
}
