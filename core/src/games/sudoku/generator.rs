use super::*;

/// A generated board: the full solution and the givens left after punching holes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub solution: SudokuGrid,
    pub givens: SudokuGrid,
}

impl Puzzle {
    /// Random solution with `holes` cells cleared. The puzzle is not checked for a unique answer.
    pub fn generate(holes: usize, rng: &mut GameRng) -> Self {
        let solution = full_solution(rng);
        let givens = punch_holes(&solution, holes, rng);
        log::debug!("sudoku: generated {} givens", givens.filled());
        Self { solution, givens }
    }
}

/// Shuffled digits in the three diagonal boxes. They share no row or column, so any fill is valid.
fn fill_diagonal(grid: &mut SudokuGrid, rng: &mut GameRng) {
    for b in 0..BOX {
        let mut digits = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        rng.shuffle(&mut digits);
        for (i, digit) in digits.into_iter().enumerate() {
            let row = b * BOX + i / BOX;
            let col = b * BOX + i % BOX;
            grid.set(row * 9 + col, digit);
        }
    }
}

/// Always-valid shifted pattern, used when the solver runs out of budget.
fn fallback_solution() -> SudokuGrid {
    let mut grid = SudokuGrid::empty();
    for index in 0..81 {
        let (row, col) = (index / 9, index % 9);
        grid.set(index, ((row * 3 + row / 3 + col) % 9 + 1) as u8);
    }
    grid
}

fn full_solution(rng: &mut GameRng) -> SudokuGrid {
    let mut grid = SudokuGrid::empty();
    fill_diagonal(&mut grid, rng);
    if grid.solve() {
        grid
    } else {
        log::warn!("sudoku: falling back to the fixed pattern");
        fallback_solution()
    }
}

/// Clears `holes` distinct cells picked at random, capped at the whole grid.
fn punch_holes(solution: &SudokuGrid, holes: usize, rng: &mut GameRng) -> SudokuGrid {
    let mut givens = solution.clone();
    let mut order: Vec<CellIndex> = (0..81).collect();
    rng.shuffle(&mut order);
    for index in order.into_iter().take(holes) {
        givens.set(index, EMPTY);
    }
    givens
}
