use lane_blast_core::{CellCoord, CellId, CellSnapshot, Color};

#[derive(Clone, Debug)]
struct Cell {
    color: Color,
    coord: CellCoord,
    active: bool,
    reserved: bool,
}

/// Result of clearing a grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClearOutcome {
    Cleared { coord: CellCoord, color: Color },
    AlreadyCleared,
    Unknown,
}

/// Arena of cells addressed by lane and row.
///
/// Each lane lists its cell ids from row zero upward; collapsing a lane
/// reassigns rows without copying colors, so a cell keeps its identity while
/// it moves toward the front.
#[derive(Clone, Debug, Default)]
pub(crate) struct Grid {
    rows: u32,
    cells: Vec<Cell>,
    lanes: Vec<Vec<CellId>>,
}

impl Grid {
    /// Builds a grid from rows listed front first. Short rows are padded with red.
    pub(crate) fn from_rows(rows: &[Vec<Color>]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, Vec::len);

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut lanes = Vec::with_capacity(width);
        for lane in 0..width {
            let mut column = Vec::with_capacity(rows.len());
            for (row, colors) in rows.iter().enumerate() {
                let id = CellId::new(cells.len() as u32);
                cells.push(Cell {
                    color: colors.get(lane).copied().unwrap_or(Color::Red),
                    coord: CellCoord::new(lane as u32, row as u32),
                    active: true,
                    reserved: false,
                });
                column.push(id);
            }
            lanes.push(column);
        }

        Self {
            rows: height,
            cells,
            lanes,
        }
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.lanes.len() as u32, self.rows)
    }

    pub(crate) fn cell_at(&self, coord: CellCoord) -> Option<CellId> {
        self.lanes
            .get(coord.lane() as usize)
            .and_then(|column| column.get(coord.row() as usize))
            .copied()
    }

    pub(crate) fn snapshot(&self, id: CellId) -> Option<CellSnapshot> {
        self.cells.get(id.get() as usize).map(|cell| CellSnapshot {
            id,
            coord: cell.coord,
            color: cell.color,
            active: cell.active,
            reserved: cell.reserved,
        })
    }

    pub(crate) fn is_active(&self, id: CellId) -> bool {
        self.cells
            .get(id.get() as usize)
            .is_some_and(|cell| cell.active)
    }

    /// Marks an active cell as the target of an in-flight projectile.
    pub(crate) fn reserve(&mut self, id: CellId) -> bool {
        match self.cells.get_mut(id.get() as usize) {
            Some(cell) if cell.active && !cell.reserved => {
                cell.reserved = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn release_reservation(&mut self, id: CellId) {
        if let Some(cell) = self.cells.get_mut(id.get() as usize) {
            cell.reserved = false;
        }
    }

    /// Deactivates the cell and drops its reservation.
    pub(crate) fn clear(&mut self, id: CellId) -> ClearOutcome {
        let Some(cell) = self.cells.get_mut(id.get() as usize) else {
            return ClearOutcome::Unknown;
        };
        if !cell.active {
            return ClearOutcome::AlreadyCleared;
        }

        cell.active = false;
        cell.reserved = false;
        ClearOutcome::Cleared {
            coord: cell.coord,
            color: cell.color,
        }
    }

    /// Shifts every cell above `from_row` down by one row and parks the cell
    /// previously at `from_row` on top of the lane.
    ///
    /// The collapse completes within the call. A second hit on the same cell
    /// never reaches it because [`Grid::clear`] reports `AlreadyCleared`.
    /// Returns the number of active cells left in the lane; unknown lanes are
    /// left untouched and report zero.
    pub(crate) fn collapse_lane(&mut self, lane: u32, from_row: u32) -> u32 {
        let Some(column) = self.lanes.get_mut(lane as usize) else {
            return 0;
        };

        let from = from_row as usize;
        if from < column.len() {
            let retired = column.remove(from);
            column.push(retired);
            for (row, id) in column.iter().enumerate().skip(from) {
                if let Some(cell) = self.cells.get_mut(id.get() as usize) {
                    cell.coord = CellCoord::new(lane, row as u32);
                }
            }
        }

        self.active_in_lane(lane)
    }

    pub(crate) fn active_in_lane(&self, lane: u32) -> u32 {
        self.lanes.get(lane as usize).map_or(0, |column| {
            column.iter().filter(|id| self.is_active(**id)).count() as u32
        })
    }

    /// Snapshots of one lane, row zero first.
    pub(crate) fn lane_snapshots(&self, lane: u32) -> Vec<CellSnapshot> {
        self.lanes.get(lane as usize).map_or_else(Vec::new, |column| {
            column.iter().filter_map(|id| self.snapshot(*id)).collect()
        })
    }

    /// Snapshots of the whole grid in lane-major order.
    pub(crate) fn snapshots(&self) -> Vec<CellSnapshot> {
        self.lanes
            .iter()
            .flat_map(|column| column.iter().filter_map(|id| self.snapshot(*id)))
            .collect()
    }
}
