//! Point quadtree for rectangular range queries over map items.
//!
//! The tree recursively partitions a bounding rectangle into four equal
//! quadrants and distributes item references among them, so a range
//! query only descends into regions that can actually contain matches.
//!
//! # Storage
//!
//! Nodes live in a single arena (`Vec<Node>`) and refer to their
//! children by index, not by owning pointers; items are referenced by
//! index into the caller-owned slice. The arena is filled in preorder
//! during construction and never changes afterwards: build once, query
//! concurrently from as many threads as you like.
//!
//! # Boundary rule
//!
//! Rectangles are half-open, so an item sitting exactly on a split line
//! belongs to the quadrant that *starts* at that line. Every item inside
//! the bounding rectangle therefore lands in exactly one leaf; items
//! outside it are not indexed at all.
//!
//! # Example
//!
//! ```
//! use blockatlas::geom::{Point, Rect};
//! use blockatlas::item::Item;
//! use blockatlas::quadtree::QuadTree;
//!
//! let items = vec![
//!     Item::new("anvil", 0, 0),
//!     Item::new("chest", 70, 70),
//! ];
//! let tree = QuadTree::build(Rect::new(-100, -100, 200, 200), &items);
//!
//! let hits = tree.find(Rect::new(-1, -1, 2, 2));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].name, "anvil");
//! ```

use tracing::debug;

use crate::geom::{Point, Rect};

/// Default maximum number of items a node keeps before subdividing.
pub const MAX_NODE_ITEMS: usize = 16;

/// Default maximum subdivision depth.
pub const MAX_DEPTH: u8 = 8;

/// Anything with a position in the map coordinate space.
pub trait Located {
    fn position(&self) -> Point;
}

impl Located for Point {
    fn position(&self) -> Point {
        *self
    }
}

/// One region of the partition: either a leaf holding item references
/// or an interior node with exactly four children.
#[derive(Debug, Clone)]
pub struct Node {
    rect: Rect,
    depth: u8,
    items: Vec<u32>,
    children: Option<[u32; 4]>,
}

impl Node {
    /// Region covered by this node.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Distance from the root (root is 0).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Whether this node holds its items directly.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of items stored directly on this node (zero for interior
    /// nodes, which delegate everything to their children).
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Indices into the item slice the tree was built over.
    pub fn item_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|&i| i as usize)
    }
}

/// Immutable point quadtree over a borrowed item collection.
#[derive(Debug)]
pub struct QuadTree<'a, T> {
    items: &'a [T],
    nodes: Vec<Node>,
    max_items: usize,
    max_depth: u8,
}

impl<'a, T: Located> QuadTree<'a, T> {
    /// Build a tree over `rect` with the default subdivision limits.
    ///
    /// Items whose position falls outside `rect` are not indexed.
    pub fn build(rect: Rect, items: &'a [T]) -> Self {
        Self::with_limits(rect, items, MAX_NODE_ITEMS, MAX_DEPTH)
    }

    /// Build with explicit limits: a node subdivides while it holds more
    /// than `max_items` items and its depth is below `max_depth`.
    pub fn with_limits(rect: Rect, items: &'a [T], max_items: usize, max_depth: u8) -> Self {
        let mut tree = Self {
            items,
            nodes: Vec::new(),
            max_items,
            max_depth,
        };
        let root_items: Vec<u32> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| rect.contains(item.position()))
            .map(|(i, _)| i as u32)
            .collect();
        tree.build_node(rect, 0, root_items);
        tree
    }

    fn build_node(&mut self, rect: Rect, depth: u8, item_idxs: Vec<u32>) -> u32 {
        let node_idx = self.nodes.len() as u32;
        self.nodes.push(Node {
            rect,
            depth,
            items: Vec::new(),
            children: None,
        });
        if item_idxs.len() <= self.max_items || depth >= self.max_depth {
            self.nodes[node_idx as usize].items = item_idxs;
            return node_idx;
        }
        let quads = rect.quadrants();
        let mut buckets: [Vec<u32>; 4] = Default::default();
        for i in item_idxs {
            let p = self.items[i as usize].position();
            // Half-open membership puts each item in exactly one bucket
            for (quad, bucket) in quads.iter().zip(buckets.iter_mut()) {
                if quad.contains(p) {
                    bucket.push(i);
                    break;
                }
            }
        }
        let mut children = [0u32; 4];
        for (k, bucket) in buckets.into_iter().enumerate() {
            children[k] = self.build_node(quads[k], depth + 1, bucket);
        }
        self.nodes[node_idx as usize].children = Some(children);
        node_idx
    }

    /// The item collection this tree indexes.
    pub fn items(&self) -> &'a [T] {
        self.items
    }

    /// All nodes in preorder (the root first).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// All items whose position falls inside `rect`.
    ///
    /// Subtrees whose region does not intersect the query are pruned
    /// without visiting their items. Result order is unspecified; no
    /// item appears twice because each indexed item lives in exactly
    /// one leaf.
    pub fn find(&self, rect: Rect) -> Vec<&'a T> {
        let mut out = Vec::new();
        self.collect_items(0, rect, &mut out);
        out
    }

    fn collect_items(&self, node_idx: u32, rect: Rect, out: &mut Vec<&'a T>) {
        let node = &self.nodes[node_idx as usize];
        if !node.rect.intersects(&rect) {
            return;
        }
        match node.children {
            Some(children) => {
                for child in children {
                    self.collect_items(child, rect, out);
                }
            }
            None => {
                for &i in &node.items {
                    let item = &self.items[i as usize];
                    if rect.contains(item.position()) {
                        out.push(item);
                    }
                }
            }
        }
    }

    /// All nodes whose region intersects `rect`, in preorder.
    ///
    /// Useful for callers that want per-node groupings, e.g. drawing one
    /// box per visited region over a composited view.
    pub fn find_nodes(&self, rect: Rect) -> Vec<&Node> {
        let mut out = Vec::new();
        self.collect_nodes(0, rect, &mut out);
        out
    }

    fn collect_nodes<'t>(&'t self, node_idx: u32, rect: Rect, out: &mut Vec<&'t Node>) {
        let node = &self.nodes[node_idx as usize];
        if !node.rect.intersects(&rect) {
            return;
        }
        out.push(node);
        if let Some(children) = node.children {
            for child in children {
                self.collect_nodes(child, rect, out);
            }
        }
    }

    /// Dump every node's region, depth and item count to the debug log.
    pub fn print(&self) {
        for node in &self.nodes {
            debug!(
                depth = node.depth,
                rect = ?node.rect,
                items = node.items.len(),
                leaf = node.is_leaf(),
                "quadtree node"
            );
        }
    }
}
