use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Floor,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

/// Carve origin; always floor in a generated maze.
pub const START: Pos = Pos { x: 1, y: 1 };

#[derive(Debug, Error)]
#[error("maze needs at least 3x3 cells, got {rows}x{cols}")]
pub struct DimensionError {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Tile>>,
}

// Lattice steps for the depth-first carve, tried in this fixed order.
const CARVE_OFFSETS: [(isize, isize); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

impl Maze {
    /// Generates a maze by randomized depth-first carving from (1,1).
    ///
    /// The result is a perfect maze over the odd-odd interior lattice:
    /// every floor cell is reachable from (1,1) and there is exactly one
    /// path between any two floor cells. The border ring stays wall.
    /// Even dimensions leave the rightmost column / bottommost row pair
    /// of the interior as wall, since the bound check uses `dim - 1`
    /// regardless of parity.
    pub fn generate(rng: &mut impl Rng, rows: usize, cols: usize) -> Result<Self, DimensionError> {
        if rows < 3 || cols < 3 {
            return Err(DimensionError { rows, cols });
        }

        let mut cells = vec![vec![Tile::Wall; cols]; rows];
        cells[START.y][START.x] = Tile::Floor;
        let mut stack = vec![(START.x, START.y)];

        while let Some(&(cx, cy)) = stack.last() {
            let mut neighbors = Vec::new();
            for (dx, dy) in CARVE_OFFSETS {
                let nx = cx as isize + dx;
                let ny = cy as isize + dy;
                if nx > 0
                    && ny > 0
                    && nx < cols as isize - 1
                    && ny < rows as isize - 1
                    && cells[ny as usize][nx as usize] == Tile::Wall
                {
                    neighbors.push((nx as usize, ny as usize));
                }
            }

            match neighbors.choose(rng) {
                Some(&(nx, ny)) => {
                    // Open the wall between the two lattice cells, then the cell itself.
                    cells[(cy + ny) / 2][(cx + nx) / 2] = Tile::Floor;
                    cells[ny][nx] = Tile::Floor;
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }

        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile(&self, x: usize, y: usize) -> Tile {
        self.cells[y][x]
    }

    pub fn is_floor(&self, x: usize, y: usize) -> bool {
        self.cells[y][x] == Tile::Floor
    }
}

/// Picks the cell that hosts the info block.
///
/// Scans rows bottom-to-top starting at `rows - 2`; the first row holding
/// any floor cell decides the y, a uniformly random floor cell in that row
/// decides the x. `None` means the maze has no floor in the scanned range
/// and the caller skips spawning the block.
pub fn place_info_block(maze: &Maze, rng: &mut impl Rng) -> Option<Pos> {
    for y in (0..=maze.rows() - 2).rev() {
        let floors: Vec<usize> = (0..maze.cols()).filter(|&x| maze.is_floor(x, y)).collect();
        if let Some(&x) = floors.choose(rng) {
            return Some(Pos { x, y });
        }
    }
    None
}
