//! Tests for the mosaic tree arena and the grid splitter

#[cfg(test)]
mod tests {
    use gaze::GazeError;
    use gaze::spatial::tree::grid_cell;
    use gaze::spatial::{MosaicTree, PixelBuffer};
    use image::Rgba;
    use std::collections::HashSet;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    // Tests n squared children exactly tile the parent
    // Verified by overlapping neighbouring cells by one pixel
    #[test]
    fn test_split_coverage() {
        let mut tree = MosaicTree::new(gradient(100, 60));
        let root = tree.root();
        tree.split(root, 5).unwrap();

        let node = tree.node(root).unwrap();
        assert_eq!(node.children().len(), 25);
        assert_eq!(node.split_factor(), Some(5));

        let mut covered = HashSet::new();
        let mut pixel_total = 0;
        for &child_id in node.children() {
            let child = tree.node(child_id).unwrap();
            let (gx, gy) = child.grid_position();
            let cell = grid_cell(100, 60, 5, gx, gy);
            assert_eq!(child.dimensions(), (20, 12));
            pixel_total += child.buffer().width() * child.buffer().height();

            for (x, y, pixel) in child.buffer().enumerate_pixels() {
                let position = (cell.x + x, cell.y + y);
                assert!(covered.insert(position), "pixel {position:?} covered twice");
                assert_eq!(pixel, node.buffer().get_pixel(position.0, position.1));
            }
        }

        assert_eq!(pixel_total, 100 * 60);
        assert_eq!(covered.len(), 100 * 60);
    }

    // Tests children are stored column-major with distinct grid positions
    // Verified by swapping the loop order
    #[test]
    fn test_split_child_order() {
        let mut tree = MosaicTree::new(gradient(30, 30));
        let root = tree.root();
        tree.split(root, 3).unwrap();

        let positions: Vec<(u32, u32)> = tree
            .node(root)
            .unwrap()
            .children()
            .iter()
            .map(|&id| tree.node(id).unwrap().grid_position())
            .collect();

        assert_eq!(
            positions,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2)
            ]
        );
    }

    // Tests children point back to their parent and sit one level deeper
    // Verified by leaving the parent link empty
    #[test]
    fn test_split_parent_links() {
        let mut tree = MosaicTree::new(gradient(20, 20));
        let root = tree.root();
        tree.split(root, 2).unwrap();

        assert_eq!(tree.node(root).unwrap().parent(), None);
        for &child in tree.node(root).unwrap().children() {
            let node = tree.node(child).unwrap();
            assert_eq!(node.parent(), Some(root));
            assert_eq!(node.depth(), 1);
            assert!(node.is_leaf());
            assert_eq!(node.split_factor(), None);
        }
    }

    // Tests the parent buffer is trimmed before splitting
    // Verified by skipping the trim step
    #[test]
    fn test_split_trims_parent() {
        let mut tree = MosaicTree::new(gradient(103, 101));
        let root = tree.root();
        tree.split(root, 10).unwrap();

        assert_eq!(tree.node(root).unwrap().dimensions(), (100, 100));
        assert_eq!(tree.tile_dimensions(root).unwrap(), (10, 10));
    }

    // Tests invalid split factors leave the tree untouched
    // Verified by pushing children before validating
    #[test]
    fn test_split_rejects_invalid_factor() {
        let mut tree = MosaicTree::new(gradient(8, 8));
        let root = tree.root();

        let zero = tree.split(root, 0);
        assert!(matches!(zero, Err(GazeError::InvalidSplitFactor { value: 0, .. })));

        let too_large = tree.split(root, 9);
        assert!(matches!(too_large, Err(GazeError::InvalidSplitFactor { value: 9, .. })));

        assert_eq!(tree.len(), 1);
        assert!(tree.node(root).unwrap().is_leaf());
        assert_eq!(tree.node(root).unwrap().dimensions(), (8, 8));
    }

    // Tests a node cannot be split twice
    // Verified by removing the already-split check
    #[test]
    fn test_split_twice_rejected() {
        let mut tree = MosaicTree::new(gradient(8, 8));
        let root = tree.root();
        tree.split(root, 2).unwrap();

        assert!(tree.split(root, 2).is_err());
        assert_eq!(tree.len(), 5);
    }

    // Tests a resolved node cannot be split
    // Verified by removing the resolved check
    #[test]
    fn test_split_resolved_rejected() {
        let mut tree = MosaicTree::new(gradient(8, 8));
        let root = tree.root();
        tree.set_matched(root, gradient(8, 8)).unwrap();

        assert!(tree.split(root, 2).is_err());
    }

    // Tests a new tree holds exactly its root and grows by n² per split
    // Verified by starting the arena empty
    #[test]
    fn test_tree_size() {
        let mut tree = MosaicTree::new(gradient(9, 9));
        assert!(!tree.is_empty());
        assert_eq!(tree.len(), 1);

        let root = tree.root();
        tree.split(root, 3).unwrap();
        assert!(!tree.is_empty());
        assert_eq!(tree.len(), 10);
    }

    // Tests recursive splitting builds every level
    // Verified by splitting only the root
    #[test]
    fn test_split_to_depth() {
        let mut tree = MosaicTree::new(gradient(100, 100));
        tree.split_to_depth(2, 2).unwrap();

        assert_eq!(tree.len(), 1 + 4 + 16);
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 16);
        for leaf in leaves {
            let node = tree.node(leaf).unwrap();
            assert_eq!(node.depth(), 2);
            assert_eq!(node.dimensions(), (25, 25));
        }
    }

    // Tests the root is trimmed once for every level up front
    // Verified by trimming each level separately
    #[test]
    fn test_split_to_depth_trims_root_for_all_levels() {
        let mut tree = MosaicTree::new(gradient(83, 81));
        tree.split_to_depth(2, 2).unwrap();

        assert_eq!(tree.node(tree.root()).unwrap().dimensions(), (80, 80));
        for leaf in tree.leaves() {
            assert_eq!(tree.node(leaf).unwrap().dimensions(), (20, 20));
        }
    }

    // Tests leaves are listed in pre-order
    // Verified by listing leaves in arena order
    #[test]
    fn test_leaves_pre_order() {
        let mut tree = MosaicTree::new(gradient(40, 40));
        let root = tree.root();
        tree.split(root, 2).unwrap();
        let first = tree.node(root).unwrap().children().first().copied().unwrap();
        tree.split(first, 2).unwrap();

        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 7);

        let grandchildren = tree.node(first).unwrap().children().to_vec();
        assert_eq!(leaves.get(..4).unwrap(), grandchildren.as_slice());
    }

    // Tests an unsplit node has no tile size
    // Verified by defaulting the split factor to one
    #[test]
    fn test_tile_dimensions_requires_split() {
        let tree = MosaicTree::new(gradient(8, 8));
        assert!(tree.tile_dimensions(tree.root()).is_err());
    }

    // Tests a match is never overwritten
    // Verified by always replacing the stored buffer
    #[test]
    fn test_set_matched_once() {
        let mut tree = MosaicTree::new(gradient(4, 4));
        let root = tree.root();
        let red = PixelBuffer::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let blue = PixelBuffer::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        assert!(tree.set_matched(root, red.clone()).unwrap());
        assert!(!tree.set_matched(root, blue).unwrap());
        assert_eq!(tree.node(root).unwrap().matched(), Some(&red));
    }

    // Tests ids from another tree are rejected
    // Verified by clamping the index into range
    #[test]
    fn test_unknown_node() {
        let mut large = MosaicTree::new(gradient(8, 8));
        let root = large.root();
        large.split(root, 2).unwrap();
        let foreign = large.leaves().last().copied().unwrap();

        let small = MosaicTree::new(gradient(8, 8));
        let result = small.node(foreign);
        assert!(matches!(
            result,
            Err(GazeError::UnknownNode {
                index: 4,
                node_count: 1
            })
        ));
    }

    // Tests cell rectangles line up on multiples of the step
    // Verified by rounding the step up
    #[test]
    fn test_grid_cell() {
        let cell = grid_cell(100, 60, 4, 3, 2);
        assert_eq!((cell.x, cell.y, cell.width, cell.height), (75, 30, 25, 15));
    }
}
