//! World-block grid coordinates.
//!
//! The world is a plane of square blocks keyed by integer (x, z) grid
//! coordinates. This module holds the coordinate math the streaming manager
//! is built on: which block a viewer position falls in, and the fixed-order
//! ring of the eight neighbors around a center block.

use cgmath::{Point2, Point3};

/// Integer (x, z) pair identifying one world block.
///
/// Hashable, so the resident-block map can be keyed by it directly.
pub type GridCoordinate = Point2<i32>;

/// Computes the grid coordinate of the block containing `viewer`.
///
/// A block of size `s` at coordinate `(cx, cz)` spans
/// `[cx*s - s/2, cx*s + s/2)` on each axis, so the viewer position is
/// shifted by half a block before the floor division.
///
/// # Arguments
/// * `viewer` - The viewer's world position; only x and z matter
/// * `block_size` - Edge length of one block in world units
pub fn center_block_for(viewer: Point3<f32>, block_size: f32) -> GridCoordinate {
    let half = block_size / 2.0;
    Point2::new(
        ((viewer.x + half) / block_size).floor() as i32,
        ((viewer.z + half) / block_size).floor() as i32,
    )
}

/// The eight neighbors of `center` in fixed display-slot order.
///
/// Order is upper-left, upper-mid, upper-right, level-left, level-right,
/// lower-left, lower-mid, lower-right ("upper" meaning +z). The order
/// matters: it determines the slot each neighbor occupies in the 9-element
/// display list.
pub fn neighbor_ring(center: GridCoordinate) -> [GridCoordinate; 8] {
    [
        Point2::new(center.x - 1, center.y + 1), // upper left
        Point2::new(center.x, center.y + 1),     // upper mid
        Point2::new(center.x + 1, center.y + 1), // upper right
        Point2::new(center.x - 1, center.y),     // level left
        Point2::new(center.x + 1, center.y),     // level right
        Point2::new(center.x - 1, center.y - 1), // lower left
        Point2::new(center.x, center.y - 1),     // lower mid
        Point2::new(center.x + 1, center.y - 1), // lower right
    ]
}
