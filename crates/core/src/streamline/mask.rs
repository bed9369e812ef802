use ndarray::Array2;

/// A mask cell is already claimed by another trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Occupied;

/// Coarse occupancy grid that keeps streamlines apart.
///
/// A trajectory claims each cell it enters. Staying inside the current cell
/// is always allowed; entering any claimed cell is not.
#[derive(Debug)]
pub(super) struct OccupancyMask {
    cells: Array2<bool>,
    current: Option<(usize, usize)>,
    trajectory: Vec<(usize, usize)>,
}

impl OccupancyMask {
    pub(super) fn new(nx: usize, ny: usize) -> Self {
        Self {
            cells: Array2::from_elem((ny, nx), false),
            current: None,
            trajectory: Vec::new(),
        }
    }

    pub(super) fn nx(&self) -> usize {
        self.cells.ncols()
    }

    pub(super) fn ny(&self) -> usize {
        self.cells.nrows()
    }

    pub(super) fn is_free(&self, (x, y): (usize, usize)) -> bool {
        !self.cells[[y, x]]
    }

    /// Begins a new trajectory at `cell`, claiming it.
    pub(super) fn start(&mut self, cell: (usize, usize)) -> Result<(), Occupied> {
        self.trajectory.clear();
        self.current = None;
        self.update(cell)
    }

    /// Moves back to `cell` without claiming it, for tracing the other direction.
    pub(super) fn reset_start(&mut self, cell: (usize, usize)) {
        self.current = Some(cell);
    }

    /// Records that the trajectory is now in `cell`.
    pub(super) fn update(&mut self, cell: (usize, usize)) -> Result<(), Occupied> {
        if self.current == Some(cell) {
            return Ok(());
        }

        let (x, y) = cell;
        if self.cells[[y, x]] {
            return Err(Occupied);
        }

        self.cells[[y, x]] = true;
        self.trajectory.push(cell);
        self.current = Some(cell);
        Ok(())
    }

    /// Releases every cell claimed by the current trajectory.
    pub(super) fn undo(&mut self) {
        for (x, y) in self.trajectory.drain(..) {
            self.cells[[y, x]] = false;
        }
    }

    #[cfg(test)]
    pub(super) fn claimed(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
