//! Uniform Cartesian grid, dimension-generic over `D`.
//!
//! The grid covers the axis-aligned domain `[min_corner, max_corner]`
//! with `cell_num[a]` cells along axis `a`. Nodes sit on cell corners,
//! so there are `cell_num[a] + 1` nodes per axis.
//!
//! ```text
//! node(i) = min_corner + i * dx
//! ```

use physkit_types::{PhysError, PhysResult, Scalar};

/// A uniform background grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<const D: usize> {
    min_corner: [Scalar; D],
    max_corner: [Scalar; D],
    cell_num: [u32; D],
    dx: [Scalar; D],
}

impl<const D: usize> Grid<D> {
    /// Creates a grid over `[min_corner, max_corner]` with per-axis cell counts.
    pub fn new(
        min_corner: [Scalar; D],
        max_corner: [Scalar; D],
        cell_num: [u32; D],
    ) -> PhysResult<Self> {
        check_domain(&min_corner, &max_corner)?;
        check_cell_num(&cell_num)?;
        Ok(Self {
            min_corner,
            max_corner,
            cell_num,
            dx: compute_dx(&min_corner, &max_corner, &cell_num),
        })
    }

    /// Creates a grid with the same cell count along every axis.
    pub fn uniform(
        min_corner: [Scalar; D],
        max_corner: [Scalar; D],
        cell_num: u32,
    ) -> PhysResult<Self> {
        Self::new(min_corner, max_corner, [cell_num; D])
    }

    #[inline]
    pub fn min_corner(&self) -> [Scalar; D] {
        self.min_corner
    }

    #[inline]
    pub fn max_corner(&self) -> [Scalar; D] {
        self.max_corner
    }

    /// Cell edge length per axis.
    #[inline]
    pub fn dx(&self) -> [Scalar; D] {
        self.dx
    }

    #[inline]
    pub fn cell_num(&self) -> [u32; D] {
        self.cell_num
    }

    /// Node count per axis (`cell_num + 1`).
    pub fn node_num(&self) -> [u32; D] {
        std::array::from_fn(|a| self.cell_num[a] + 1)
    }

    /// Total number of grid nodes.
    pub fn node_count(&self) -> usize {
        self.node_num().iter().map(|&n| n as usize).product()
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.cell_num.iter().map(|&n| n as usize).product()
    }

    /// Shortest cell edge. Bounds the CFL time step.
    pub fn min_edge_length(&self) -> Scalar {
        self.dx.iter().copied().fold(Scalar::INFINITY, Scalar::min)
    }

    /// Longest cell edge.
    pub fn max_edge_length(&self) -> Scalar {
        self.dx.iter().copied().fold(0.0, Scalar::max)
    }

    /// Volume (area in 2D) of a single cell.
    pub fn cell_size(&self) -> Scalar {
        self.dx.iter().product()
    }

    /// World position of node `idx`.
    pub fn node(&self, idx: [u32; D]) -> PhysResult<[Scalar; D]> {
        for a in 0..D {
            if idx[a] > self.cell_num[a] {
                return Err(PhysError::Config(format!(
                    "Grid node index {:?} out of range (cells: {:?})",
                    idx, self.cell_num
                )));
            }
        }
        Ok(self.node_unchecked(idx))
    }

    /// World position of the cell's minimum corner node.
    pub fn cell_min_corner_node(&self, idx: [u32; D]) -> PhysResult<[Scalar; D]> {
        self.check_cell(idx)?;
        Ok(self.node_unchecked(idx))
    }

    /// World position of the cell's maximum corner node.
    pub fn cell_max_corner_node(&self, idx: [u32; D]) -> PhysResult<[Scalar; D]> {
        let min = self.cell_min_corner_node(idx)?;
        Ok(std::array::from_fn(|a| min[a] + self.dx[a]))
    }

    /// World position of the cell center.
    pub fn cell_center(&self, idx: [u32; D]) -> PhysResult<[Scalar; D]> {
        let min = self.cell_min_corner_node(idx)?;
        Ok(std::array::from_fn(|a| min[a] + 0.5 * self.dx[a]))
    }

    /// Index of the cell containing `position`.
    ///
    /// Points outside the domain are clamped to the closest cell.
    pub fn cell_index(&self, position: [Scalar; D]) -> [u32; D] {
        self.cell_index_and_interpolation_weight(position).0
    }

    /// Cell index plus the fractional position inside that cell (per axis, in `[0, 1]`).
    pub fn cell_index_and_interpolation_weight(
        &self,
        position: [Scalar; D],
    ) -> ([u32; D], [Scalar; D]) {
        let mut out_of_range = false;
        let mut idx = [0u32; D];
        let mut weight = [0.0; D];
        for a in 0..D {
            let mut bias = position[a] - self.min_corner[a];
            if bias < 0.0 {
                out_of_range = true;
                bias = 0.0;
            }
            let mut cell = (bias / self.dx[a]).floor() as u32;
            if cell >= self.cell_num[a] {
                out_of_range = true;
                cell = self.cell_num[a] - 1;
            }
            idx[a] = cell;
            weight[a] = (bias / self.dx[a] - cell as Scalar).min(1.0);
        }
        if out_of_range {
            tracing::warn!(?position, "point out of grid range, clamped to closest cell");
        }
        (idx, weight)
    }

    /// Changes the cell counts, keeping the domain.
    pub fn set_cell_num(&mut self, cell_num: [u32; D]) -> PhysResult<()> {
        check_cell_num(&cell_num)?;
        self.cell_num = cell_num;
        self.dx = compute_dx(&self.min_corner, &self.max_corner, &self.cell_num);
        Ok(())
    }

    /// Changes the domain, keeping the cell counts.
    pub fn set_domain(&mut self, min_corner: [Scalar; D], max_corner: [Scalar; D]) -> PhysResult<()> {
        check_domain(&min_corner, &max_corner)?;
        self.min_corner = min_corner;
        self.max_corner = max_corner;
        self.dx = compute_dx(&self.min_corner, &self.max_corner, &self.cell_num);
        Ok(())
    }

    /// Returns true if `position` lies inside the closed domain.
    pub fn contains(&self, position: [Scalar; D]) -> bool {
        (0..D).all(|a| position[a] >= self.min_corner[a] && position[a] <= self.max_corner[a])
    }

    /// Projects `position` onto the closed domain.
    pub fn clamp_position(&self, position: [Scalar; D]) -> [Scalar; D] {
        std::array::from_fn(|a| position[a].clamp(self.min_corner[a], self.max_corner[a]))
    }

    /// Returns true if the node lies on the domain boundary.
    pub fn is_boundary_node(&self, idx: [u32; D]) -> bool {
        (0..D).any(|a| idx[a] == 0 || idx[a] >= self.cell_num[a])
    }

    /// Row-major flat index of a node (axis 0 varies fastest).
    pub fn flat_node_index(&self, idx: [u32; D]) -> usize {
        let node_num = self.node_num();
        let mut flat = 0usize;
        for a in (0..D).rev() {
            flat = flat * node_num[a] as usize + idx[a] as usize;
        }
        flat
    }

    /// Inverse of [`Grid::flat_node_index`].
    pub fn node_index_from_flat(&self, mut flat: usize) -> [u32; D] {
        let node_num = self.node_num();
        let mut idx = [0u32; D];
        for a in 0..D {
            let n = node_num[a] as usize;
            idx[a] = (flat % n) as u32;
            flat /= n;
        }
        idx
    }

    /// Iterates all node indices.
    pub fn nodes(&self) -> IndexBox<D> {
        IndexBox::new([0; D], self.cell_num)
    }

    /// Iterates all cell indices.
    pub fn cells(&self) -> IndexBox<D> {
        IndexBox::new([0; D], std::array::from_fn(|a| self.cell_num[a] - 1))
    }

    /// Nodes within `radius` (per axis, world units) of `position`.
    ///
    /// The box is clamped to the grid; it is empty when the
    /// position is farther than `radius` outside the domain.
    pub fn nodes_near(&self, position: [Scalar; D], radius: [Scalar; D]) -> IndexBox<D> {
        let mut lo = [0u32; D];
        let mut hi = [0u32; D];
        for a in 0..D {
            let rel = (position[a] - self.min_corner[a]) / self.dx[a];
            let r = radius[a] / self.dx[a];
            let first = (rel - r).ceil().max(0.0);
            let last = (rel + r).floor().min(self.cell_num[a] as Scalar);
            if last < first {
                return IndexBox::empty();
            }
            lo[a] = first as u32;
            hi[a] = last as u32;
        }
        IndexBox::new(lo, hi)
    }

    fn node_unchecked(&self, idx: [u32; D]) -> [Scalar; D] {
        std::array::from_fn(|a| self.min_corner[a] + idx[a] as Scalar * self.dx[a])
    }

    fn check_cell(&self, idx: [u32; D]) -> PhysResult<()> {
        for a in 0..D {
            if idx[a] >= self.cell_num[a] {
                return Err(PhysError::Config(format!(
                    "Grid cell index {:?} out of range (cells: {:?})",
                    idx, self.cell_num
                )));
            }
        }
        Ok(())
    }
}

fn check_domain<const D: usize>(min: &[Scalar; D], max: &[Scalar; D]) -> PhysResult<()> {
    if D == 0 {
        return Err(PhysError::Config("Grid dimension must be at least 1".into()));
    }
    for a in 0..D {
        if !(min[a].is_finite() && max[a].is_finite()) || max[a] <= min[a] {
            return Err(PhysError::Config(format!(
                "Grid domain is empty along axis {a}: [{}, {}]",
                min[a], max[a]
            )));
        }
    }
    Ok(())
}

fn check_cell_num<const D: usize>(cell_num: &[u32; D]) -> PhysResult<()> {
    if cell_num.iter().any(|&n| n == 0) {
        return Err(PhysError::Config(format!(
            "Grid cell number must be greater than zero, got {:?}",
            cell_num
        )));
    }
    Ok(())
}

fn compute_dx<const D: usize>(
    min: &[Scalar; D],
    max: &[Scalar; D],
    cell_num: &[u32; D],
) -> [Scalar; D] {
    std::array::from_fn(|a| (max[a] - min[a]) / cell_num[a] as Scalar)
}

/// Iterator over an inclusive box of multi-indices `lo..=hi`, axis 0 fastest.
#[derive(Debug, Clone)]
pub struct IndexBox<const D: usize> {
    lo: [u32; D],
    hi: [u32; D],
    next: Option<[u32; D]>,
}

impl<const D: usize> IndexBox<D> {
    /// Creates the box `lo..=hi`. Empty if any `hi[a] < lo[a]`.
    pub fn new(lo: [u32; D], hi: [u32; D]) -> Self {
        let empty = D == 0 || (0..D).any(|a| hi[a] < lo[a]);
        Self {
            lo,
            hi,
            next: if empty { None } else { Some(lo) },
        }
    }

    /// A box that yields nothing.
    pub fn empty() -> Self {
        Self {
            lo: [0; D],
            hi: [0; D],
            next: None,
        }
    }
}

impl<const D: usize> Iterator for IndexBox<D> {
    type Item = [u32; D];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut succ = current;
        let mut axis = 0;
        loop {
            if axis == D {
                self.next = None;
                break;
            }
            if succ[axis] < self.hi[axis] {
                succ[axis] += 1;
                self.next = Some(succ);
                break;
            }
            succ[axis] = self.lo[axis];
            axis += 1;
        }
        Some(current)
    }
}
