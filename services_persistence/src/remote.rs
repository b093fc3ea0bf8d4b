//! Remote default content

use content_store::Document;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No network, or the page was not served over HTTP
    #[error("Remote content is unavailable")]
    Unavailable,

    #[error("Remote content request failed with status {0}")]
    Http(u16),

    #[error("Remote content is malformed: {0}")]
    Malformed(String),
}

/// Source of the published default document
pub trait RemoteSource {
    fn fetch_default(&mut self) -> Result<Document, FetchError>;
}

impl<R: RemoteSource + ?Sized> RemoteSource for Box<R> {
    fn fetch_default(&mut self) -> Result<Document, FetchError> {
        (**self).fetch_default()
    }
}

/// Remote source for hosts without network access
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl RemoteSource for Offline {
    fn fetch_default(&mut self) -> Result<Document, FetchError> {
        Err(FetchError::Unavailable)
    }
}

/// Answers fetches from a prepared queue, then reports unavailability
#[derive(Debug, Default)]
pub struct ScriptedRemote {
    responses: VecDeque<Result<Document, FetchError>>,
    fetches: usize,
}

impl ScriptedRemote {
    pub fn new(responses: impl IntoIterator<Item = Result<Document, FetchError>>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            fetches: 0,
        }
    }

    pub fn serving(document: Document) -> Self {
        Self::new([Ok(document)])
    }

    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl RemoteSource for ScriptedRemote {
    fn fetch_default(&mut self) -> Result<Document, FetchError> {
        self.fetches += 1;
        self.responses
            .pop_front()
            .unwrap_or(Err(FetchError::Unavailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_is_unavailable() {
        assert_eq!(Offline.fetch_default(), Err(FetchError::Unavailable));
    }

    #[test]
    fn test_scripted_remote_drains() {
        let mut doc = Document::new();
        doc.insert("title", "Hi");
        let mut remote = ScriptedRemote::new([Err(FetchError::Http(404)), Ok(doc.clone())]);

        assert_eq!(remote.fetch_default(), Err(FetchError::Http(404)));
        assert_eq!(remote.fetch_default(), Ok(doc));
        assert_eq!(remote.fetch_default(), Err(FetchError::Unavailable));
        assert_eq!(remote.fetches(), 3);
    }
}
