//! Stream state: The merged, de-duplicated, newest-first post sequence.

use super::document::Document;
use crate::anchor::{anchored, Direction};
use crate::asset::{AssetBundle, AssetLoader, AssetRuntime, AssetScope};
use crate::layout::NodeId;
use crate::post::{Post, PostId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Result of a stream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The sequence was replaced wholesale.
    Initialized {
        /// Number of posts now in the stream.
        posts: usize,
    },
    /// A new post was inserted at the head.
    Prepended,
    /// A page was appended at the tail.
    Appended {
        /// Posts actually inserted.
        added: usize,
        /// Posts dropped because their id was already present.
        duplicates: usize,
    },
    /// An existing post was replaced in place.
    Replaced {
        /// Position of the replaced post.
        index: usize,
    },
    /// The post id was already present; nothing changed.
    Duplicate,
    /// An edit for a post that is not loaded; nothing changed.
    NotLoaded,
    /// An empty page: end of history, nothing changed.
    EmptyPage,
}

impl Mutation {
    /// Whether the sequence changed.
    pub const fn changed(&self) -> bool {
        match self {
            Self::Initialized { .. } | Self::Prepended | Self::Replaced { .. } => true,
            Self::Appended { added, .. } => *added > 0,
            Self::Duplicate | Self::NotLoaded | Self::EmptyPage => false,
        }
    }
}

/// The ordered post sequence and its rendered nodes.
///
/// Ids are unique. Order is exactly as received: the backend's newest-first
/// order for pages, with realtime additions placed at the head. Nothing is
/// re-sorted locally.
#[derive(Debug, Default)]
pub struct StreamState {
    /// Posts, newest first.
    posts: Vec<Post>,
    /// Ids present in `posts`.
    ids: HashSet<PostId>,
    /// Back-references to the nodes the document created for each post.
    rendered_nodes: HashMap<PostId, NodeId>,
}

impl StreamState {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence with the first page.
    pub fn initialize<D, R>(
        &mut self,
        posts: Vec<Post>,
        envelope: AssetBundle,
        document: &mut D,
        assets: &mut AssetLoader<R>,
    ) -> Mutation
    where
        D: Document + ?Sized,
        R: AssetRuntime,
    {
        self.clear(document);

        let mut bundle = envelope;
        for post in posts {
            if !self.ids.insert(post.id.clone()) {
                debug!(id = %post.id, "duplicate id in initial page skipped");
                continue;
            }
            let node = document.mount(self.posts.len(), &post);
            self.rendered_nodes.insert(post.id.clone(), node);
            bundle.union(AssetBundle::from_post(&post));
            self.posts.push(post);
        }

        assets.handle(&bundle, AssetScope::Document);
        info!(posts = self.posts.len(), "stream initialized");
        Mutation::Initialized {
            posts: self.posts.len(),
        }
    }

    /// Insert a post at the head, unless its id is already present.
    ///
    /// The insertion is anchored on the current first node so the reader's
    /// view does not jump.
    pub fn prepend_one<D, R>(
        &mut self,
        post: Post,
        document: &mut D,
        assets: &mut AssetLoader<R>,
    ) -> Mutation
    where
        D: Document + ?Sized,
        R: AssetRuntime,
    {
        if self.ids.contains(&post.id) {
            debug!(id = %post.id, "duplicate post ignored");
            return Mutation::Duplicate;
        }

        let reference = self.first_node();
        let bundle = AssetBundle::from_post(&post);
        let node = anchored(document, reference, Direction::Up, |doc| {
            let node = doc.mount(0, &post);
            assets.handle(&bundle, AssetScope::Document);
            node
        });

        debug!(id = %post.id, "post prepended");
        self.ids.insert(post.id.clone());
        self.rendered_nodes.insert(post.id.clone(), node);
        self.posts.insert(0, post);
        Mutation::Prepended
    }

    /// Append an older page at the tail.
    ///
    /// Posts whose id is already present are dropped. An empty page changes
    /// nothing and reports [`Mutation::EmptyPage`].
    pub fn append_page<D, R>(
        &mut self,
        posts: Vec<Post>,
        envelope: AssetBundle,
        document: &mut D,
        assets: &mut AssetLoader<R>,
    ) -> Mutation
    where
        D: Document + ?Sized,
        R: AssetRuntime,
    {
        if posts.is_empty() {
            return Mutation::EmptyPage;
        }

        let mut bundle = envelope;
        let mut added = 0;
        let mut duplicates = 0;
        for post in posts {
            if !self.ids.insert(post.id.clone()) {
                duplicates += 1;
                continue;
            }
            let node = document.mount(self.posts.len(), &post);
            self.rendered_nodes.insert(post.id.clone(), node);
            bundle.union(AssetBundle::from_post(&post));
            self.posts.push(post);
            added += 1;
        }

        if added > 0 {
            assets.handle(&bundle, AssetScope::Document);
        }
        if duplicates > 0 {
            debug!(duplicates, "overlapping page entries dropped");
        }
        debug!(added, total = self.posts.len(), "page appended");
        Mutation::Appended { added, duplicates }
    }

    /// Replace an existing post in place.
    ///
    /// Edits for posts not loaded in this session are dropped. The update is
    /// anchored on the edited post's own node.
    pub fn replace_one<D, R>(
        &mut self,
        edited: Post,
        document: &mut D,
        assets: &mut AssetLoader<R>,
    ) -> Mutation
    where
        D: Document + ?Sized,
        R: AssetRuntime,
    {
        let Some(index) = self.position(&edited.id) else {
            debug!(id = %edited.id, "edit for unknown post dropped");
            return Mutation::NotLoaded;
        };

        let node = self.rendered_nodes.get(&edited.id).copied();
        let bundle = AssetBundle::from_post(&edited);
        anchored(document, node, Direction::Up, |doc| {
            if let Some(node) = node {
                doc.update(node, &edited);
            }
            assets.handle(&bundle, AssetScope::Document);
        });

        debug!(id = %edited.id, index, "post replaced");
        self.posts[index] = edited;
        Mutation::Replaced { index }
    }

    /// Drop every post and node.
    pub fn clear<D: Document + ?Sized>(&mut self, document: &mut D) {
        document.clear();
        self.posts.clear();
        self.ids.clear();
        self.rendered_nodes.clear();
    }

    /// Posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Ids in stream order.
    pub fn ids(&self) -> impl Iterator<Item = &PostId> {
        self.posts.iter().map(|post| &post.id)
    }

    /// Number of posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Check if the stream is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Check whether a post id is present.
    pub fn contains(&self, id: &PostId) -> bool {
        self.ids.contains(id)
    }

    /// Look up a post by id.
    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }

    /// The oldest loaded post.
    pub fn last_post(&self) -> Option<&Post> {
        self.posts.last()
    }

    /// Node of a post, if rendered.
    pub fn node_of(&self, id: &PostId) -> Option<NodeId> {
        self.rendered_nodes.get(id).copied()
    }

    /// Node of the newest post.
    pub fn first_node(&self) -> Option<NodeId> {
        self.posts.first().and_then(|post| self.node_of(&post.id))
    }

    /// Node of the oldest post.
    pub fn last_node(&self) -> Option<NodeId> {
        self.last_post().and_then(|post| self.node_of(&post.id))
    }

    fn position(&self, id: &PostId) -> Option<usize> {
        if !self.ids.contains(id) {
            return None;
        }
        self.posts.iter().position(|post| &post.id == id)
    }
}
