use super::*;

/// Placement attempts a single solve may spend before giving up.
const SOLVE_BUDGET: usize = 200_000;

/// Every digit 1 through 9, as bits 1..=9.
const ALL_DIGITS: u16 = 0b11_1111_1110;

fn row_cells(row: usize) -> impl Iterator<Item = CellIndex> {
    (0..9).map(move |col| row * 9 + col)
}

fn col_cells(col: usize) -> impl Iterator<Item = CellIndex> {
    (0..9).map(move |row| row * 9 + col)
}

fn box_cells(index: usize) -> impl Iterator<Item = CellIndex> {
    let top = index / BOX * BOX;
    let left = index % BOX * BOX;
    (0..9).map(move |i| (top + i / BOX) * 9 + left + i % BOX)
}

impl SudokuGrid {
    /// Whether `digit` may go at `index` without repeating in its row, column, or box. The cell's
    /// own value is ignored.
    pub fn is_safe(&self, index: CellIndex, digit: u8) -> bool {
        let (row, col) = (index / 9, index % 9);
        let box_index = row / BOX * BOX + col / BOX;

        row_cells(row)
            .chain(col_cells(col))
            .chain(box_cells(box_index))
            .filter(|&other| other != index)
            .all(|other| self.get(other) != Some(digit))
    }

    /// Complete, with every row, column, and box holding 1 through 9 exactly once.
    pub fn is_solved(&self) -> bool {
        self.is_full()
            && (0..9).all(|unit| {
                self.digit_mask(row_cells(unit)) == ALL_DIGITS
                    && self.digit_mask(col_cells(unit)) == ALL_DIGITS
                    && self.digit_mask(box_cells(unit)) == ALL_DIGITS
            })
    }

    fn digit_mask(&self, cells: impl Iterator<Item = CellIndex>) -> u16 {
        cells.fold(0, |mask, index| {
            mask | self.get(index).map_or(0, |digit| 1u16 << digit)
        })
    }

    /// Backtracking fill of every empty cell, trying digits in ascending order. Leaves the grid
    /// untouched and returns `false` when no solution turns up within the budget.
    pub fn solve(&mut self) -> bool {
        let mut budget = SOLVE_BUDGET;
        let solved = self.solve_within(&mut budget);
        if !solved {
            log::warn!("sudoku: solver gave up with {} cells filled", self.filled());
        }
        solved
    }

    fn solve_within(&mut self, budget: &mut usize) -> bool {
        let Some(index) = self.digits().position(|digit| digit == EMPTY) else {
            return true;
        };

        for digit in 1..=9 {
            if *budget == 0 {
                return false;
            }
            *budget -= 1;

            if self.is_safe(index, digit) {
                self.set(index, digit);
                if self.solve_within(budget) {
                    return true;
                }
                self.set(index, EMPTY);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> SudokuGrid {
        let digits = (0..81)
            .map(|index| {
                let (row, col) = (index / 9, index % 9);
                ((row * 3 + row / 3 + col) % 9 + 1) as u8
            })
            .collect();
        SudokuGrid::from_digits(digits).unwrap()
    }

    #[test]
    fn box_cells_cover_the_box() {
        let cells: Vec<_> = box_cells(4).collect();
        assert_eq!(cells, [30, 31, 32, 39, 40, 41, 48, 49, 50]);
    }

    #[test]
    fn safety_checks_row_column_and_box() {
        let mut grid = SudokuGrid::empty();
        grid.set(0, 5);

        assert!(!grid.is_safe(8, 5), "row");
        assert!(!grid.is_safe(72, 5), "column");
        assert!(!grid.is_safe(20, 5), "box");
        assert!(grid.is_safe(40, 5));
        assert!(grid.is_safe(0, 5), "own cell is ignored");
    }

    #[test]
    fn solved_means_full_and_unique() {
        let mut grid = pattern();
        assert!(grid.is_solved());

        grid.set(0, EMPTY);
        assert!(!grid.is_solved());

        let mut swapped = pattern();
        let (a, b) = (swapped.get(0).unwrap(), swapped.get(1).unwrap());
        swapped.set(0, b);
        swapped.set(1, a);
        assert!(swapped.is_full());
        assert!(!swapped.is_solved());
    }

    #[test]
    fn solver_fills_the_empty_grid() {
        let mut grid = SudokuGrid::empty();
        assert!(grid.solve());
        assert!(grid.is_solved());
    }

    #[test]
    fn solver_completes_a_partial_grid() {
        let solution = pattern();
        let mut grid = solution.clone();
        for index in (0..81).step_by(2) {
            grid.set(index, EMPTY);
        }

        assert!(grid.solve());
        assert!(grid.is_solved());
        // filled cells are never changed
        for index in (1..81).step_by(2) {
            assert_eq!(grid.get(index), solution.get(index));
        }
    }
}
