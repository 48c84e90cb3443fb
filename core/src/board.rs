use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size grid of cells, addressed either by `(row, col)` or by the flat row-major index
/// `row * cols + col`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board<T> {
    cells: Array2<T>,
}

impl<T: Clone> Board<T> {
    pub fn filled(size: Coord2, value: T) -> Self {
        Self {
            cells: Array2::from_elem(size.to_nd_index(), value),
        }
    }
}

impl<T: Default> Board<T> {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }
}

impl<T> Board<T> {
    /// Builds a board from row-major cells, the length must match `rows * cols`.
    pub fn from_cells(size: Coord2, cells: Vec<T>) -> Result<Self> {
        let cells = Array2::from_shape_vec(size.to_nd_index(), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Ok(Self { cells })
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions always come from a `Coord2`
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        index < self.len()
    }

    pub fn index_of(&self, (row, col): Coord2) -> Option<CellIndex> {
        let (rows, cols) = self.size();
        (row < rows && col < cols).then(|| usize::from(row) * usize::from(cols) + usize::from(col))
    }

    pub fn coords_of(&self, index: CellIndex) -> Option<Coord2> {
        let cols = usize::from(self.cols());
        if cols == 0 || !self.contains(index) {
            return None;
        }
        Some(((index / cols) as Coord, (index % cols) as Coord))
    }

    pub fn get(&self, index: CellIndex) -> Option<&T> {
        let coords = self.coords_of(index)?;
        self.cells.get(coords.to_nd_index())
    }

    pub fn get_mut(&mut self, index: CellIndex) -> Option<&mut T> {
        let coords = self.coords_of(index)?;
        self.cells.get_mut(coords.to_nd_index())
    }

    pub fn at(&self, coords: Coord2) -> Option<&T> {
        self.cells.get(coords.to_nd_index())
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    pub fn indexed(&self) -> impl Iterator<Item = (CellIndex, &T)> {
        self.cells.iter().enumerate()
    }

    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.cells.iter().filter(|cell| pred(cell)).count()
    }

    pub fn swap(&mut self, a: CellIndex, b: CellIndex) {
        if let (Some(a), Some(b)) = (self.coords_of(a), self.coords_of(b)) {
            self.cells.swap(a.to_nd_index(), b.to_nd_index());
        }
    }

    /// Surrounding cells, including diagonals.
    pub fn neighbors(&self, index: CellIndex) -> impl Iterator<Item = CellIndex> + use<T> {
        self.iter_with(index, &SURROUNDING)
    }

    /// Cells sharing an edge with `index`.
    pub fn orthogonal(&self, index: CellIndex) -> impl Iterator<Item = CellIndex> + use<T> {
        self.iter_with(index, &ORTHOGONAL)
    }

    /// The cell one step away in `dir`, if it exists.
    pub fn step(&self, index: CellIndex, dir: Direction) -> Option<CellIndex> {
        let coords = self.coords_of(index)?;
        let next = apply_delta(coords, dir.delta(), self.size())?;
        self.index_of(next)
    }

    fn iter_with(
        &self,
        index: CellIndex,
        displacements: &'static [(isize, isize)],
    ) -> impl Iterator<Item = CellIndex> + use<T> {
        let size = self.size();
        let cols = usize::from(size.1);
        let center = self.coords_of(index);
        center
            .map(|center| NeighborIter::new(center, size, displacements))
            .into_iter()
            .flatten()
            .map(move |(row, col)| usize::from(row) * cols + usize::from(col))
    }
}

impl<T> Index<CellIndex> for Board<T> {
    type Output = T;

    fn index(&self, index: CellIndex) -> &Self::Output {
        let cols = self.cells.ncols();
        &self.cells[[index / cols, index % cols]]
    }
}

impl<T> IndexMut<CellIndex> for Board<T> {
    fn index_mut(&mut self, index: CellIndex) -> &mut Self::Output {
        let cols = self.cells.ncols();
        &mut self.cells[[index / cols, index % cols]]
    }
}

impl<T> Index<Coord2> for Board<T> {
    type Output = T;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl<T> IndexMut<Coord2> for Board<T> {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn index_and_coords_agree() {
        let board: Board<u8> = Board::new((3, 4));

        for index in 0..board.len() {
            let coords = board.coords_of(index).unwrap();
            assert_eq!(board.index_of(coords), Some(index));
        }
        assert_eq!(board.coords_of(5), Some((1, 1)));
        assert_eq!(board.coords_of(12), None);
        assert_eq!(board.index_of((3, 0)), None);
    }

    #[test]
    fn from_cells_rejects_wrong_length() {
        assert_eq!(
            Board::from_cells((2, 2), vec![1, 2, 3]),
            Err(GameError::InvalidBoardShape)
        );

        let board = Board::from_cells((2, 2), vec![1, 2, 3, 4]).unwrap();
        assert_eq!(board[(1, 0)], 3);
        assert_eq!(board[3], 4);
    }

    #[test]
    fn neighbors_use_flat_indices() {
        let board: Board<u8> = Board::new((3, 3));

        let around_center: Vec<_> = board.neighbors(4).collect();
        assert_eq!(around_center, [0, 1, 2, 3, 5, 6, 7, 8]);

        let edge: Vec<_> = board.orthogonal(3).collect();
        assert_eq!(edge, [0, 6, 4]);

        assert_eq!(board.neighbors(9).count(), 0);
    }

    #[test]
    fn step_stops_at_edges() {
        let board: Board<u8> = Board::new((2, 2));

        assert_eq!(board.step(0, Direction::Right), Some(1));
        assert_eq!(board.step(0, Direction::Up), None);
        assert_eq!(board.step(3, Direction::Up), Some(1));
    }
}
