//! Conway's transition rule (B3/S23).
//!
//! The rule decides a cell's next state from its current state and the number
//! of live cells among its eight neighbors.

/// Next state of a cell under Conway's rule.
///
/// - A live cell with 2 or 3 live neighbors survives, otherwise it dies
/// - A dead cell with exactly 3 live neighbors becomes alive
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Row and column deltas of the Moore neighborhood, expressed modulo the grid
/// size so that only unsigned additions are needed.
///
/// A delta pair whose values are both zero is skipped. On grids narrower than
/// three cells a wrapped delta may still land on the cell itself.
#[inline]
pub fn neighbor_deltas(width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    [height - 1, 0, 1].into_iter().flat_map(move |dr| {
        [width - 1, 0, 1]
            .into_iter()
            .filter(move |&dc| !(dr == 0 && dc == 0))
            .map(move |dc| (dr, dc))
    })
}
