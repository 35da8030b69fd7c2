//! Growable, zero-initialized byte tape that extends in both directions.
//!
//! This is the Rust counterpart of the tape class emitted into every generated
//! C++ program (see [`codegen::template`](crate::codegen::template)), and follows
//! exactly the same growth rules: moving past either end of the buffer doubles
//! its capacity, keeping the old contents in the half closest to the cursor.

/// Initial number of cells of a tape.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    // Physical index of the current cell
    cursor: usize,
    // Physical index of the cell the program started on
    origin: usize
}

impl Default for Tape {
    fn default() -> Self {
        Tape::with_capacity(DEFAULT_TAPE_SIZE)
    }
}

impl Tape {

    /// Creates a new tape with `capacity` zeroed cells and the cursor on the first one.
    /// Panics if the capacity is zero.
    pub fn with_capacity(capacity: usize) -> Tape {
        if capacity == 0 {
            panic!("Tape size must be at least 1.");
        }
        Tape {
            cells: vec![0; capacity],
            cursor: 0,
            origin: 0
        }
    }

    /// Number of cells currently allocated.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Position of the cursor relative to the starting cell.
    pub fn cursor(&self) -> isize {
        self.cursor as isize - self.origin as isize
    }

    /// Lowest physical index reachable without growing.
    pub fn low_bound(&self) -> usize {
        0
    }

    /// Highest physical index reachable without growing.
    pub fn high_bound(&self) -> usize {
        self.cells.len() - 1
    }

    /// Raw cells, in physical order.
    pub fn cells(&self) -> &[u8] {
        &*self.cells
    }

    /// Value of the cell at the given position relative to the starting cell,
    /// zero if the tape never grew that far.
    pub fn cell_at(&self, logical: isize) -> u8 {
        let physical = self.origin as isize + logical;
        if physical < 0 {
            0
        } else {
            self.cells.get(physical as usize).cloned().unwrap_or(0)
        }
    }

    pub fn get(&self) -> u8 {
        self.cells[self.cursor]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    /// Adds `amount` to the current cell, wrapping around modulo 256.
    pub fn add(&mut self, amount: u32) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_add(amount as u8);
    }

    /// Subtracts `amount` from the current cell, wrapping around modulo 256.
    pub fn sub(&mut self, amount: u32) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_sub(amount as u8);
    }

    pub fn move_left(&mut self, amount: usize) {
        while self.cursor < self.low_bound() + amount {
            self.grow_left();
        }
        self.cursor -= amount;
    }

    pub fn move_right(&mut self, amount: usize) {
        while self.cursor + amount > self.high_bound() {
            self.grow_right();
        }
        self.cursor += amount;
    }

    // Doubles the capacity, moving the existing cells to the upper half
    fn grow_left(&mut self) {
        let capacity = self.cells.len();
        trace!("Growing tape left: {} -> {} cells.", capacity, capacity * 2);

        let mut cells = vec![0; capacity * 2];
        cells[capacity..].copy_from_slice(&self.cells);
        self.cells = cells;

        self.cursor += capacity;
        self.origin += capacity;
    }

    // Doubles the capacity, appending zeroed cells at the end
    fn grow_right(&mut self) {
        let capacity = self.cells.len();
        trace!("Growing tape right: {} -> {} cells.", capacity, capacity * 2);

        self.cells.resize(capacity * 2, 0);
    }

}
