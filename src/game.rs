use rand::Rng;

use crate::maze::{place_info_block, DimensionError, Maze, Pos, START};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Playing,
    // Info overlay is up; ticks are frozen until the player dismisses it.
    Info,
}

pub struct Game {
    pub maze: Maze,
    pub player: Pos,
    pub info_block: Option<Pos>,
    pub dir: Option<Dir>,
    pub facing: Dir,
    pub mode: Mode,
    pub level: u32,
    pub steps: u32,
}

impl Game {
    pub fn new(rng: &mut impl Rng, rows: usize, cols: usize) -> Result<Self, DimensionError> {
        let maze = Maze::generate(rng, rows, cols)?;
        let info_block = place_info_block(&maze, rng);
        Ok(Self {
            maze,
            player: START,
            info_block,
            dir: None,
            facing: Dir::Down,
            mode: Mode::Playing,
            level: 1,
            steps: 0,
        })
    }

    // A pressed direction sticks until a wall or another press replaces it,
    // like the original's persistent velocity.
    pub fn apply_input(&mut self, desired_dir: Option<Dir>) {
        if self.mode != Mode::Playing {
            return;
        }
        if let Some(dir) = desired_dir {
            self.dir = Some(dir);
            self.facing = dir;
        }
    }

    pub fn tick(&mut self) {
        if self.mode != Mode::Playing {
            return;
        }
        self.move_player();
        if self.info_block == Some(self.player) {
            self.mode = Mode::Info;
        }
    }

    fn move_player(&mut self) {
        if let Some(dir) = self.dir {
            if can_move(&self.maze, self.player, dir) {
                self.player = step(self.player, dir);
                self.steps += 1;
            } else {
                self.dir = None;
            }
        }
    }

    /// Closes the info overlay and restarts with a fresh maze, matching
    /// the original's full scene reset.
    pub fn dismiss_info(&mut self, rng: &mut impl Rng) {
        let rows = self.maze.rows();
        let cols = self.maze.cols();
        // Dimensions were validated when the session started.
        if let Ok(maze) = Maze::generate(rng, rows, cols) {
            self.info_block = place_info_block(&maze, rng);
            self.maze = maze;
        }
        self.player = START;
        self.dir = None;
        self.facing = Dir::Down;
        self.mode = Mode::Playing;
        self.level += 1;
        self.steps = 0;
    }
}

pub fn can_move(maze: &Maze, pos: Pos, dir: Dir) -> bool {
    let (dx, dy) = dir.delta();
    let nx = pos.x as isize + dx;
    let ny = pos.y as isize + dy;
    if nx < 0 || ny < 0 || nx >= maze.cols() as isize || ny >= maze.rows() as isize {
        return false;
    }
    maze.is_floor(nx as usize, ny as usize)
}

fn step(pos: Pos, dir: Dir) -> Pos {
    let (dx, dy) = dir.delta();
    Pos {
        x: (pos.x as isize + dx) as usize,
        y: (pos.y as isize + dy) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(seed: u64) -> Game {
        Game::new(&mut StdRng::seed_from_u64(seed), 9, 9).unwrap()
    }

    #[test]
    fn new_game_starts_at_carve_origin() {
        let game = game(1);
        assert_eq!(game.player, START);
        assert_eq!(game.mode, Mode::Playing);
        assert_eq!(game.level, 1);
        let block = game.info_block.expect("generated maze has floor cells");
        assert!(game.maze.is_floor(block.x, block.y));
    }

    #[test]
    fn walls_stop_movement() {
        let mut game = game(2);
        // (1,0) and (0,1) are border walls around the start.
        game.apply_input(Some(Dir::Up));
        game.tick();
        assert_eq!(game.player, START);
        assert_eq!(game.dir, None);
        game.apply_input(Some(Dir::Left));
        game.tick();
        assert_eq!(game.player, START);
        assert_eq!(game.steps, 0);
    }

    #[test]
    fn direction_persists_across_ticks() {
        let mut game = game(3);
        let open = [Dir::Up, Dir::Down, Dir::Left, Dir::Right]
            .into_iter()
            .find(|&d| can_move(&game.maze, game.player, d))
            .expect("start has an open neighbor");
        game.apply_input(Some(open));
        game.tick();
        assert_ne!(game.player, START);
        assert_eq!(game.dir, Some(open));
        assert_eq!(game.facing, open);
        assert_eq!(game.steps, 1);
    }

    #[test]
    fn reaching_the_info_block_freezes_the_game() {
        let mut game = game(4);
        // Drop the block right next to the start so one step lands on it.
        let open = [Dir::Up, Dir::Down, Dir::Left, Dir::Right]
            .into_iter()
            .find(|&d| can_move(&game.maze, game.player, d))
            .unwrap();
        game.info_block = Some(step(game.player, open));
        game.apply_input(Some(open));
        game.tick();
        assert_eq!(game.mode, Mode::Info);

        let frozen = game.player;
        game.apply_input(Some(open));
        game.tick();
        assert_eq!(game.player, frozen);
    }

    #[test]
    fn dismissing_the_overlay_resets_the_level() {
        let mut game = game(5);
        game.info_block = Some(game.player);
        game.tick();
        assert_eq!(game.mode, Mode::Info);

        game.dismiss_info(&mut StdRng::seed_from_u64(6));
        assert_eq!(game.mode, Mode::Playing);
        assert_eq!(game.player, START);
        assert_eq!(game.dir, None);
        assert_eq!(game.facing, Dir::Down);
        assert_eq!(game.level, 2);
        assert_eq!(game.steps, 0);
        assert_eq!(game.maze.rows(), 9);
        assert_eq!(game.maze.cols(), 9);
    }
}
