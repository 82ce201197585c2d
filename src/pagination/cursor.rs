//! Pagination cursor: Pull-based loading of older pages.

use crate::asset::{AssetBundle, AssetLoader, AssetRuntime};
use crate::error::FetchError;
use crate::post::{Created, Page};
use crate::stream::{Document, Mutation, StreamState};
use tracing::{debug, info, warn};

/// Placeholder substituted with the cursor value in the next-page URL.
pub const CURSOR_PLACEHOLDER: &str = "%s";

/// Guards and cursor for fetching older pages.
///
/// At most one fetch is in flight. Once the backend returns an empty page
/// the cursor is exhausted for the rest of the session.
///
/// The cursor is the `created` time of the oldest loaded post. Posts that
/// share a timestamp across a page boundary can therefore be skipped or
/// repeated; repeats are absorbed by the stream's id dedup.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
    in_flight: bool,
    exhausted: bool,
    cursor_value: Option<Created>,
}

impl PaginationCursor {
    /// Create a fresh cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fetch should start now.
    pub const fn should_fetch(&self, last_visible: bool) -> bool {
        !self.in_flight && !self.exhausted && last_visible
    }

    /// Mark a fetch as started. Returns `false` if one is already in flight
    /// or history is exhausted, in which case nothing changes.
    pub fn begin_fetch(&mut self) -> bool {
        if self.in_flight || self.exhausted {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Apply a fetched page to the stream.
    ///
    /// An empty page exhausts the cursor instead of mutating the stream.
    pub fn on_page_loaded<D, R>(
        &mut self,
        page: Page,
        stream: &mut StreamState,
        document: &mut D,
        assets: &mut AssetLoader<R>,
    ) -> Mutation
    where
        D: Document + ?Sized,
        R: AssetRuntime,
    {
        self.in_flight = false;
        let envelope = AssetBundle::from_page(&page);
        let mutation = stream.append_page(page.content, envelope, document, assets);
        if mutation == Mutation::EmptyPage {
            info!("end of history reached");
            self.exhausted = true;
        }
        self.track(stream);
        mutation
    }

    /// Release the in-flight guard after a failed fetch. A later scroll retries.
    pub fn on_fetch_failed(&mut self, error: &FetchError) {
        self.in_flight = false;
        warn!(%error, "next page fetch failed");
    }

    /// Refresh the cursor value from the stream's oldest post.
    pub fn track(&mut self, stream: &StreamState) {
        self.cursor_value = stream.last_post().map(|post| post.created);
        debug!(cursor = ?self.cursor_value, "pagination cursor updated");
    }

    /// Build the next-page URL from a template containing [`CURSOR_PLACEHOLDER`].
    ///
    /// Returns `None` while no post is loaded.
    pub fn next_page_url(&self, template: &str) -> Option<String> {
        self.cursor_value
            .map(|created| template.replacen(CURSOR_PLACEHOLDER, &created.to_string(), 1))
    }

    /// Whether a fetch is in flight.
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the end of history has been reached.
    pub const fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Current cursor value.
    pub const fn cursor_value(&self) -> Option<Created> {
        self.cursor_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordingRuntime, TextDocument};
    use crate::layout::Viewport;
    use crate::post::Post;
    use proptest::prelude::*;

    fn fixture() -> (StreamState, TextDocument, AssetLoader<RecordingRuntime>) {
        let mut stream = StreamState::new();
        let mut doc = TextDocument::new(Viewport::new(400, 300));
        let mut assets = AssetLoader::new(RecordingRuntime::default());
        stream.initialize(
            vec![Post::new(3, 300, "c"), Post::new(2, 200, "b"), Post::new(1, 100, "a")],
            AssetBundle::default(),
            &mut doc,
            &mut assets,
        );
        (stream, doc, assets)
    }

    #[test]
    fn test_should_fetch_guards() {
        let mut cursor = PaginationCursor::new();
        assert!(!cursor.should_fetch(false));
        assert!(cursor.should_fetch(true));

        assert!(cursor.begin_fetch());
        assert!(cursor.in_flight());
        assert!(!cursor.should_fetch(true));
        assert!(!cursor.begin_fetch());
    }

    #[test]
    fn test_next_page_url_uses_oldest_created() {
        let (stream, _, _) = fixture();
        let mut cursor = PaginationCursor::new();
        assert_eq!(cursor.next_page_url("/liveblog/7/posts/%s"), None);

        cursor.track(&stream);
        assert_eq!(cursor.cursor_value(), Some(Created(100)));
        assert_eq!(
            cursor.next_page_url("/liveblog/7/posts/%s?_format=json"),
            Some("/liveblog/7/posts/100?_format=json".to_string())
        );
    }

    #[test]
    fn test_empty_page_exhausts() {
        let (mut stream, mut doc, mut assets) = fixture();
        let mut cursor = PaginationCursor::new();
        cursor.begin_fetch();

        let result = cursor.on_page_loaded(Page::default(), &mut stream, &mut doc, &mut assets);
        assert_eq!(result, Mutation::EmptyPage);
        assert!(cursor.exhausted());
        assert!(!cursor.in_flight());
        assert!(!cursor.should_fetch(true));
        assert!(!cursor.begin_fetch());
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_page_moves_cursor() {
        let (mut stream, mut doc, mut assets) = fixture();
        let mut cursor = PaginationCursor::new();
        cursor.begin_fetch();

        let page = Page::of(vec![Post::new(0, 50, "older")]);
        cursor.on_page_loaded(page, &mut stream, &mut doc, &mut assets);
        assert_eq!(cursor.cursor_value(), Some(Created(50)));
        assert!(!cursor.exhausted());
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut cursor = PaginationCursor::new();
        cursor.begin_fetch();
        cursor.on_fetch_failed(&FetchError::Transport {
            url: "/next/1".to_string(),
            message: "timeout".to_string(),
        });
        assert!(!cursor.in_flight());
        assert!(!cursor.exhausted());
        assert!(cursor.should_fetch(true));
    }

    #[derive(Debug, Clone)]
    enum Step {
        Scroll(bool),
        Complete(bool),
        Fail,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            any::<bool>().prop_map(Step::Scroll),
            any::<bool>().prop_map(Step::Complete),
            Just(Step::Fail),
        ]
    }

    proptest! {
        #[test]
        fn prop_single_fetch_in_flight(steps in prop::collection::vec(step(), 0..80)) {
            let (mut stream, mut doc, mut assets) = fixture();
            let mut cursor = PaginationCursor::new();
            let mut outstanding = 0usize;
            let mut next_id = 1_000u64;

            for step in steps {
                match step {
                    Step::Scroll(visible) => {
                        if cursor.should_fetch(visible) && cursor.begin_fetch() {
                            outstanding += 1;
                        }
                    }
                    Step::Complete(empty) if outstanding > 0 => {
                        outstanding -= 1;
                        let page = if empty {
                            Page::default()
                        } else {
                            next_id += 1;
                            Page::of(vec![Post::new(next_id, 1, "p")])
                        };
                        cursor.on_page_loaded(page, &mut stream, &mut doc, &mut assets);
                    }
                    Step::Fail if outstanding > 0 => {
                        outstanding -= 1;
                        cursor.on_fetch_failed(&FetchError::Disconnected);
                    }
                    _ => {}
                }
                prop_assert!(outstanding <= 1);
                if cursor.exhausted() {
                    prop_assert!(!cursor.should_fetch(true));
                }
            }
        }
    }
}
