//! Page: The JSON envelope returned by the feed endpoints.

use super::post::{deserialize_libraries, deserialize_nullable, Command, Library, Post};
use crate::error::FetchError;
use serde::Deserialize;

/// One response of the initial-load or next-page endpoint.
///
/// `content` is newest first. An empty or absent `content` marks the end
/// of history.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
pub struct Page {
    /// Posts in this page.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub content: Vec<Post>,
    /// Libraries needed by the page as a whole.
    #[serde(default, deserialize_with = "deserialize_libraries")]
    pub libraries: Vec<Library>,
    /// Commands to run once the page is rendered.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub commands: Vec<Command>,
}

impl Page {
    /// A page holding only posts.
    pub fn of(posts: Vec<Post>) -> Self {
        Self {
            content: posts,
            ..Self::default()
        }
    }

    /// Decode a response body fetched from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Malformed`] when the body is not a page document.
    pub fn from_json(url: &str, body: &str) -> Result<Self, FetchError> {
        serde_json::from_str(body).map_err(|source| FetchError::Malformed {
            url: url.to_string(),
            source,
        })
    }

    /// Whether this page signals the end of history.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
