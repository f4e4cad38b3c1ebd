//! Arena-backed mosaic tree and the grid splitter
//!
//! Nodes own their pixel data and are owned by the tree. Parent links are
//! plain indices into the arena, so ownership stays strictly parent to child
//! and no reference cycles exist.

use crate::io::error::{GazeError, Result, invalid_split_factor};
use crate::spatial::PixelBuffer;
use crate::spatial::normalize::trim;
use image::imageops;

/// Index of a node inside its [`MosaicTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Pixel rectangle of one grid cell inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Cell width
    pub width: u32,
    /// Cell height
    pub height: u32,
}

/// Rectangle covered by cell `(grid_x, grid_y)` of an `n` x `n` grid
///
/// The parent dimensions must already be divisible by `n`; the splitter and
/// the compositor both go through this function so seams always agree.
pub const fn grid_cell(width: u32, height: u32, n: u32, grid_x: u32, grid_y: u32) -> CellRect {
    let x_step = width / n;
    let y_step = height / n;
    CellRect {
        x: grid_x * x_step,
        y: grid_y * y_step,
        width: x_step,
        height: y_step,
    }
}

/// A rectangular region of the target image, possibly subdivided further
#[derive(Debug, Clone)]
pub struct MosaicNode {
    buffer: PixelBuffer,
    matched: Option<PixelBuffer>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    grid_x: u32,
    grid_y: u32,
    split_factor: Option<u32>,
    depth: u32,
}

impl MosaicNode {
    const fn new(buffer: PixelBuffer, parent: Option<NodeId>, grid: (u32, u32), depth: u32) -> Self {
        Self {
            buffer,
            matched: None,
            parent,
            children: Vec::new(),
            grid_x: grid.0,
            grid_y: grid.1,
            split_factor: None,
            depth,
        }
    }

    /// Raw pixels of this region
    pub const fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Resolved output, once matched or assembled
    pub const fn matched(&self) -> Option<&PixelBuffer> {
        self.matched.as_ref()
    }

    /// Containing node, absent for the root
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in split order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Column and row inside the parent's grid
    pub const fn grid_position(&self) -> (u32, u32) {
        (self.grid_x, self.grid_y)
    }

    /// Grid size of this node's own children, `None` for a leaf
    pub const fn split_factor(&self) -> Option<u32> {
        self.split_factor
    }

    /// Distance from the root
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether `matched` has been set
    pub const fn is_resolved(&self) -> bool {
        self.matched.is_some()
    }

    /// Width and height of the raw buffer
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }
}

/// Owner of every node in a mosaic, rooted at the full target image
#[derive(Debug, Clone)]
pub struct MosaicTree {
    nodes: Vec<MosaicNode>,
}

impl MosaicTree {
    /// Create a tree whose root holds the whole target
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            nodes: vec![MosaicNode::new(buffer, None, (0, 0), 0)],
        }
    }

    /// Id of the root node
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes, which never happens once built
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if the id is not part of this tree
    pub fn node(&self, id: NodeId) -> Result<&MosaicNode> {
        self.nodes.get(id.0).ok_or(GazeError::UnknownNode {
            index: id.0,
            node_count: self.nodes.len(),
        })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MosaicNode> {
        let node_count = self.nodes.len();
        self.nodes.get_mut(id.0).ok_or(GazeError::UnknownNode {
            index: id.0,
            node_count,
        })
    }

    /// Split a node into an `n` x `n` grid of children
    ///
    /// The node's buffer is first trimmed so both dimensions divide by `n`.
    /// Children are stored column-major (`x` outer, `y` inner) and each holds
    /// an independent copy of its cell. The split is a single level; call it
    /// again on a child to go deeper.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSplitFactor` if `n` is zero, if the node is already
    /// split or resolved, or if `n` exceeds either dimension. The tree is left
    /// untouched on failure.
    pub fn split(&mut self, id: NodeId, n: u32) -> Result<()> {
        if n == 0 {
            return Err(invalid_split_factor(n, &"split factor must be at least 1"));
        }

        let node = self.node(id)?;
        if !node.is_leaf() || node.split_factor.is_some() {
            return Err(invalid_split_factor(n, &"node is already split"));
        }
        if node.is_resolved() {
            return Err(invalid_split_factor(n, &"node has already been gazed"));
        }

        let trimmed = trim(&node.buffer, n)?;
        let (width, height) = trimmed.dimensions();
        if width == 0 || height == 0 {
            let (w, h) = node.dimensions();
            return Err(invalid_split_factor(
                n,
                &format!("a {w}x{h} buffer cannot hold {n} cells per axis"),
            ));
        }

        let depth = node.depth + 1;
        let mut children = Vec::with_capacity(n as usize * n as usize);
        for x in 0..n {
            for y in 0..n {
                let cell = grid_cell(width, height, n, x, y);
                let pixels =
                    imageops::crop_imm(&trimmed, cell.x, cell.y, cell.width, cell.height)
                        .to_image();
                children.push(MosaicNode::new(pixels, Some(id), (x, y), depth));
            }
        }

        let first_child = self.nodes.len();
        let child_ids: Vec<NodeId> = (first_child..first_child + children.len())
            .map(NodeId)
            .collect();
        self.nodes.extend(children);

        let node = self.node_mut(id)?;
        node.buffer = trimmed;
        node.split_factor = Some(n);
        node.children = child_ids;
        Ok(())
    }

    /// Split the root, then every resulting leaf, until `depth` levels exist
    ///
    /// An unsplit root is first trimmed to a multiple of `n^depth` so every
    /// level divides evenly and no cell loses pixels to a deeper trim.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSplitFactor` if any level cannot be split by `n`
    pub fn split_to_depth(&mut self, n: u32, depth: u32) -> Result<()> {
        if n == 0 {
            return Err(invalid_split_factor(n, &"split factor must be at least 1"));
        }

        let root = self.node_mut(NodeId(0))?;
        if root.is_leaf() && !root.is_resolved() && depth > 1 {
            let trimmed = trim(&root.buffer, n.saturating_pow(depth))?;
            if trimmed.width() > 0 && trimmed.height() > 0 {
                root.buffer = trimmed;
            }
        }

        for _ in 0..depth {
            for leaf in self.leaves() {
                self.split(leaf, n)?;
            }
        }
        Ok(())
    }

    /// Leaf ids in pre-order
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            if node.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        leaves
    }

    /// Pixel size of one child cell of a split node
    ///
    /// # Errors
    ///
    /// Returns `InvalidSplitFactor` if the node has not been split
    pub fn tile_dimensions(&self, id: NodeId) -> Result<(u32, u32)> {
        let node = self.node(id)?;
        let n = node
            .split_factor
            .ok_or_else(|| invalid_split_factor(0, &"target node has not been split"))?;
        let (width, height) = node.dimensions();
        Ok((width / n, height / n))
    }

    /// Store a node's resolved output
    ///
    /// Returns `false` without touching the node if it was already resolved.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if the id is not part of this tree
    pub fn set_matched(&mut self, id: NodeId, buffer: PixelBuffer) -> Result<bool> {
        let node = self.node_mut(id)?;
        if node.matched.is_some() {
            return Ok(false);
        }
        node.matched = Some(buffer);
        Ok(true)
    }

    /// Iterate over every node with its id, in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MosaicNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}
