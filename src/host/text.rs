//! Text document: An in-memory document that lays posts out as wrapped text.
//!
//! Each post becomes a block of fixed-height lines wrapped to the viewport
//! width. This gives the stream a real, measurable layout without a browser.

use crate::anchor::ScrollContainer;
use crate::layout::{NodeId, Rect, Viewport};
use crate::post::Post;
use crate::stream::Document;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Pixel metrics of the text layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    /// Width of one terminal-style column.
    pub char_width: i32,
    /// Height of one line.
    pub line_height: i32,
    /// Vertical gap after each post.
    pub block_spacing: i32,
    /// Height of the page chrome above the post list.
    pub chrome_height: i32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8,
            line_height: 20,
            block_spacing: 10,
            chrome_height: 60,
        }
    }
}

#[derive(Debug, Clone)]
struct Block {
    node: NodeId,
    content: String,
    lines: Vec<String>,
}

/// A scrolling column of wrapped text blocks.
#[derive(Debug)]
pub struct TextDocument {
    viewport: Viewport,
    metrics: TextMetrics,
    blocks: Vec<Block>,
    scroll_top: i32,
    next_node: u64,
}

impl TextDocument {
    /// Create an empty document with default metrics.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_metrics(viewport, TextMetrics::default())
    }

    /// Create an empty document with custom metrics.
    pub const fn with_metrics(viewport: Viewport, metrics: TextMetrics) -> Self {
        Self {
            viewport,
            metrics,
            blocks: Vec::new(),
            scroll_top: 0,
            next_node: 0,
        }
    }

    /// Number of mounted nodes.
    pub fn node_count(&self) -> usize {
        self.blocks.len()
    }

    /// Content currently rendered in `node`.
    pub fn node_content(&self, node: NodeId) -> Option<&str> {
        self.block(node).map(|block| block.content.as_str())
    }

    /// Scroll by a signed amount, clamped to the content.
    pub fn scroll_by(&mut self, dy: i32) {
        self.set_scroll_top(self.scroll_top + dy);
    }

    /// Scroll so the end of the content is visible.
    pub fn scroll_to_bottom(&mut self) {
        self.set_scroll_top(i32::MAX);
    }

    /// Lines that intersect the viewport, top to bottom.
    pub fn visible_lines(&self) -> Vec<&str> {
        let mut visible = Vec::new();
        let mut y = self.metrics.chrome_height - self.scroll_top;
        for block in &self.blocks {
            for line in &block.lines {
                if y + self.metrics.line_height > 0 && y < self.viewport.height {
                    visible.push(line.as_str());
                }
                y += self.metrics.line_height;
            }
            y += self.metrics.block_spacing;
        }
        visible
    }

    fn columns(&self) -> usize {
        usize::try_from(self.viewport.width / self.metrics.char_width.max(1))
            .unwrap_or(0)
            .max(1)
    }

    fn block(&self, node: NodeId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.node == node)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn block_height(&self, block: &Block) -> i32 {
        block.lines.len() as i32 * self.metrics.line_height + self.metrics.block_spacing
    }

    fn max_scroll(&self) -> i32 {
        (self.scroll_height() - self.viewport.height).max(0)
    }
}

impl ScrollContainer for TextDocument {
    fn scroll_top(&self) -> i32 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, value: i32) {
        self.scroll_top = value.clamp(0, self.max_scroll());
    }

    fn scroll_height(&self) -> i32 {
        self.metrics.chrome_height
            + self
                .blocks
                .iter()
                .map(|block| self.block_height(block))
                .sum::<i32>()
    }

    fn node_rect(&self, node: NodeId) -> Option<Rect> {
        let mut y = self.metrics.chrome_height - self.scroll_top;
        for block in &self.blocks {
            let height = self.block_height(block);
            if block.node == node {
                return Some(Rect::new(0, y, self.viewport.width, height));
            }
            y += height;
        }
        None
    }
}

impl Document for TextDocument {
    fn mount(&mut self, index: usize, post: &Post) -> NodeId {
        let node = NodeId::new(self.next_node);
        self.next_node += 1;

        let block = Block {
            node,
            content: post.content.clone(),
            lines: wrap(&post.content, self.columns()),
        };
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
        node
    }

    fn update(&mut self, node: NodeId, post: &Post) {
        let columns = self.columns();
        if let Some(block) = self.blocks.iter_mut().find(|block| block.node == node) {
            block.content.clone_from(&post.content);
            block.lines = wrap(&post.content, columns);
        }
    }

    fn clear(&mut self) {
        self.blocks.clear();
        self.scroll_top = 0;
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Rewraps every block to the new width.
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let columns = self.columns();
        for block in &mut self.blocks {
            block.lines = wrap(&block.content, columns);
        }
        self.set_scroll_top(self.scroll_top);
    }
}

/// Wrap text to `columns` display columns, breaking on hard newlines too.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for hard in text.split('\n') {
        let mut line = String::new();
        let mut width = 0;
        for grapheme in hard.graphemes(true) {
            let w = UnicodeWidthStr::width(grapheme);
            if width + w > columns && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0;
            }
            line.push_str(grapheme);
            width += w;
        }
        lines.push(line);
    }
    lines
}
