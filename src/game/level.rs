// Static level geometry

use crate::core::math::Rect;

/// An immovable solid rectangle of level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CollisionBlock {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Owns the level's collision blocks. Block order is scan order: collision
/// resolution takes the first overlapping block, so it must stay stable.
#[derive(Debug, Default)]
pub struct Level {
    blocks: Vec<CollisionBlock>,
}

impl Level {
    pub fn new(blocks: Vec<CollisionBlock>) -> Self {
        Self { blocks }
    }

    /// Build a level from a row-major tile grid; nonzero cells are solid.
    /// Blocks are emitted in grid scan order (left to right, top to
    /// bottom).
    pub fn from_tile_grid<R: AsRef<[u8]>>(rows: &[R], tile_size: f32) -> Self {
        let mut blocks = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            for (col_index, &cell) in row.as_ref().iter().enumerate() {
                if cell != 0 {
                    blocks.push(CollisionBlock::new(
                        col_index as f32 * tile_size,
                        row_index as f32 * tile_size,
                        tile_size,
                        tile_size,
                    ));
                }
            }
        }

        Self { blocks }
    }

    /// The blocks in scan order
    pub fn blocks(&self) -> &[CollisionBlock] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_bounds() {
        let block = CollisionBlock::new(32.0, 48.0, 16.0, 16.0);
        let bounds = block.bounds();
        assert_eq!(bounds.x, 32.0);
        assert_eq!(bounds.right(), 48.0);
        assert_eq!(bounds.bottom(), 64.0);
    }

    #[test]
    fn test_explicit_block_list_keeps_order() {
        let first = CollisionBlock::new(0.0, 0.0, 16.0, 16.0);
        let second = CollisionBlock::new(16.0, 0.0, 16.0, 16.0);
        let level = Level::new(vec![first, second]);
        assert_eq!(level.blocks(), &[first, second]);
    }

    #[test]
    fn test_grid_marks_solid_cells() {
        let grid = [[0u8, 1, 0], [1, 0, 1]];
        let level = Level::from_tile_grid(&grid, 16.0);

        assert_eq!(level.blocks().len(), 3);
        assert_eq!(level.blocks()[0], CollisionBlock::new(16.0, 0.0, 16.0, 16.0));
        assert_eq!(level.blocks()[1], CollisionBlock::new(0.0, 16.0, 16.0, 16.0));
        assert_eq!(level.blocks()[2], CollisionBlock::new(32.0, 16.0, 16.0, 16.0));
    }

    #[test]
    fn test_grid_scan_order_is_row_major() {
        let grid = [[1u8, 1], [1, 1]];
        let level = Level::from_tile_grid(&grid, 8.0);

        let positions: Vec<(f32, f32)> = level.blocks().iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(
            positions,
            vec![(0.0, 0.0), (8.0, 0.0), (0.0, 8.0), (8.0, 8.0)]
        );
    }

    #[test]
    fn test_empty_grid_has_no_blocks() {
        let grid: [[u8; 4]; 2] = [[0; 4]; 2];
        let level = Level::from_tile_grid(&grid, 16.0);
        assert!(level.blocks().is_empty());
    }
}
