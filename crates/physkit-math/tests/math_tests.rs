//! Integration tests for physkit-math.

use physkit_math::{Grid, IndexBox};

fn unit_grid_2d() -> Grid<2> {
    Grid::new([0.0, 0.0], [1.0, 2.0], [4, 4]).unwrap()
}

// ─── Construction Tests ───────────────────────────────────────

#[test]
fn dx_per_axis() {
    let grid = unit_grid_2d();
    assert_eq!(grid.dx(), [0.25, 0.5]);
    assert_eq!(grid.min_edge_length(), 0.25);
    assert_eq!(grid.max_edge_length(), 0.5);
    assert!((grid.cell_size() - 0.125).abs() < 1e-12);
}

#[test]
fn zero_cells_rejected() {
    assert!(Grid::<3>::new([0.0; 3], [1.0; 3], [2, 0, 2]).is_err());
}

#[test]
fn empty_domain_rejected() {
    assert!(Grid::<2>::uniform([0.0, 1.0], [1.0, 1.0], 4).is_err());
}

#[test]
fn node_and_cell_counts() {
    let grid = Grid::<3>::uniform([0.0; 3], [1.0; 3], 2).unwrap();
    assert_eq!(grid.node_num(), [3, 3, 3]);
    assert_eq!(grid.node_count(), 27);
    assert_eq!(grid.cell_count(), 8);
    assert_eq!(grid.nodes().count(), 27);
    assert_eq!(grid.cells().count(), 8);
}

// ─── Position Queries ─────────────────────────────────────────

#[test]
fn node_positions() {
    let grid = unit_grid_2d();
    assert_eq!(grid.node([0, 0]).unwrap(), [0.0, 0.0]);
    assert_eq!(grid.node([4, 4]).unwrap(), [1.0, 2.0]);
    assert!(grid.node([5, 0]).is_err());
}

#[test]
fn cell_corners_and_center() {
    let grid = unit_grid_2d();
    assert_eq!(grid.cell_min_corner_node([1, 1]).unwrap(), [0.25, 0.5]);
    assert_eq!(grid.cell_max_corner_node([1, 1]).unwrap(), [0.5, 1.0]);
    assert_eq!(grid.cell_center([1, 1]).unwrap(), [0.375, 0.75]);
    assert!(grid.cell_center([4, 0]).is_err());
}

#[test]
fn cell_index_inside_and_clamped() {
    let grid = unit_grid_2d();
    assert_eq!(grid.cell_index([0.3, 1.1]), [1, 2]);
    assert_eq!(grid.cell_index([-1.0, 5.0]), [0, 3]);
}

#[test]
fn interpolation_weight_is_fractional_offset() {
    let grid = unit_grid_2d();
    let (idx, w) = grid.cell_index_and_interpolation_weight([0.3, 0.75]);
    assert_eq!(idx, [1, 1]);
    assert!((w[0] - 0.2).abs() < 1e-12);
    assert!((w[1] - 0.5).abs() < 1e-12);
}

#[test]
fn set_cell_num_updates_dx() {
    let mut grid = unit_grid_2d();
    grid.set_cell_num([2, 8]).unwrap();
    assert_eq!(grid.dx(), [0.5, 0.25]);
    assert!(grid.set_cell_num([0, 1]).is_err());
}

#[test]
fn set_domain_updates_dx() {
    let mut grid = unit_grid_2d();
    grid.set_domain([-1.0, -1.0], [1.0, 1.0]).unwrap();
    assert_eq!(grid.dx(), [0.5, 0.5]);
}

// ─── Indexing Tests ───────────────────────────────────────────

#[test]
fn flat_index_round_trip() {
    let grid = Grid::<3>::new([0.0; 3], [1.0; 3], [2, 3, 4]).unwrap();
    for (expected, idx) in grid.nodes().enumerate() {
        let flat = grid.flat_node_index(idx);
        assert_eq!(flat, expected);
        assert_eq!(grid.node_index_from_flat(flat), idx);
    }
}

#[test]
fn boundary_nodes() {
    let grid = unit_grid_2d();
    assert!(grid.is_boundary_node([0, 2]));
    assert!(grid.is_boundary_node([2, 4]));
    assert!(!grid.is_boundary_node([2, 2]));
}

#[test]
fn nodes_near_is_clamped() {
    let grid = unit_grid_2d();
    let near: Vec<_> = grid.nodes_near([0.0, 0.0], [0.3, 0.6]).collect();
    assert_eq!(near, vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
}

#[test]
fn nodes_near_far_outside_is_empty() {
    let grid = unit_grid_2d();
    assert_eq!(grid.nodes_near([5.0, 5.0], [0.3, 0.3]).count(), 0);
}

#[test]
fn index_box_order() {
    let items: Vec<_> = IndexBox::new([0, 0], [1, 1]).collect();
    assert_eq!(items, vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
    assert_eq!(IndexBox::new([2, 0], [1, 1]).count(), 0);
}
