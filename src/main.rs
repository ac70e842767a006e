use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

mod game;
mod maze;

use game::{Dir, Game, Mode};
use maze::{Pos, Tile};

const MIN_GRID: usize = 3;
const CELL_W: usize = 2;
const DEFAULT_TICK_MS: u64 = 120;
const DEFAULT_RENDER_FPS: u64 = 60;

const INFO_MESSAGE: [&str; 3] = [
    "You found the info block!",
    "",
    "Press Enter to explore a new maze.",
];

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player(Dir),
    Wall,
    Floor,
    Info,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Floor,
                    color: Color::Reset,
                };
                cols * rows
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

struct Settings {
    tick_ms: u64,
    render_fps: u64,
    seed: Option<u64>,
    rows: Option<usize>,
    cols: Option<usize>,
}

fn main() -> Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout) -> Result<()> {
    let settings = read_settings();
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Like the original sizing the maze to the window, fill the terminal:
    // one row for the HUD, one spare, and two columns per cell.
    let (term_w, term_h) = terminal::size()?;
    let cols = settings
        .cols
        .unwrap_or(term_w as usize / CELL_W)
        .max(MIN_GRID);
    let rows = settings
        .rows
        .unwrap_or((term_h as usize).saturating_sub(2))
        .max(MIN_GRID);

    let mut game = Game::new(&mut rng, rows, cols)?;
    let mut renderer = Renderer::new(cols, rows);
    let mut pending_dir: Option<Dir> = None;
    let mut last_tick = Instant::now();
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Enter | KeyCode::Char(' ') if game.mode == Mode::Info => {
                        game.dismiss_info(&mut rng);
                        pending_dir = None;
                        renderer.needs_full = true;
                    }
                    KeyCode::Up | KeyCode::Char('k') => pending_dir = Some(Dir::Up),
                    KeyCode::Down | KeyCode::Char('j') => pending_dir = Some(Dir::Down),
                    KeyCode::Left | KeyCode::Char('h') => pending_dir = Some(Dir::Left),
                    KeyCode::Right | KeyCode::Char('l') => pending_dir = Some(Dir::Right),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(settings.tick_ms) {
            last_tick = Instant::now();
            game.apply_input(pending_dir.take());
            game.tick();
        }
        render(stdout, &game, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn read_settings() -> Settings {
    fn parse<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok().and_then(|v| v.parse().ok())
    }
    Settings {
        tick_ms: parse("MOCHILA_TICK_MS")
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TICK_MS),
        render_fps: parse("MOCHILA_FPS")
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_RENDER_FPS),
        seed: parse("MOCHILA_SEED"),
        rows: parse("MOCHILA_ROWS"),
        cols: parse("MOCHILA_COLS"),
    }
}

fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let rows = game.maze.rows();
    let cols = game.maze.cols();
    let needed_h = (rows + 2) as u16;
    let needed_w = (cols * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let hud = format!(
        "Level: {}  Steps: {}  Maze: {}x{}  (arrows/hjkl move, q quits)",
        game.level, game.steps, cols, rows
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..rows {
        for x in 0..cols {
            let cell = cell_for(game, Pos { x, y });
            let idx = y * cols + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    if game.mode == Mode::Info {
        draw_info_overlay(stdout, renderer, rows, cols)?;
        // Repaint the maze underneath once the overlay goes away.
        renderer.needs_full = true;
    }

    stdout.flush()?;
    Ok(())
}

fn cell_for(game: &Game, pos: Pos) -> Cell {
    if pos == game.player {
        return Cell {
            glyph: Glyph::Player(game.facing),
            color: Color::Yellow,
        };
    }
    if game.info_block == Some(pos) {
        return Cell {
            glyph: Glyph::Info,
            color: Color::Magenta,
        };
    }
    match game.maze.tile(pos.x, pos.y) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Floor => Cell {
            glyph: Glyph::Floor,
            color: Color::Reset,
        },
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: Cell,
) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player(Dir::Up) => "▲",
        Glyph::Player(Dir::Down) => "▼",
        Glyph::Player(Dir::Left) => "◀",
        Glyph::Player(Dir::Right) => "▶",
        Glyph::Wall => "██",
        Glyph::Floor => "  ",
        Glyph::Info => "📦",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

// The terminal stand-in for the original's message overlay: a centered box
// drawn over the frozen maze.
fn draw_info_overlay(
    stdout: &mut Stdout,
    renderer: &Renderer,
    rows: usize,
    cols: usize,
) -> io::Result<()> {
    let inner = INFO_MESSAGE
        .iter()
        .map(|line| UnicodeWidthStr::width(*line))
        .max()
        .unwrap_or(0)
        + 2;
    let box_w = inner + 2;
    let box_h = INFO_MESSAGE.len() + 2;

    let maze_w = cols * CELL_W;
    let box_x = renderer.origin_x + (maze_w.saturating_sub(box_w) / 2) as u16;
    let box_y = renderer.origin_y + (rows.saturating_sub(box_h) / 2) as u16;

    stdout.queue(SetForegroundColor(Color::White))?;
    stdout.queue(MoveTo(box_x, box_y))?;
    stdout.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    for (i, line) in INFO_MESSAGE.iter().enumerate() {
        let pad = inner - UnicodeWidthStr::width(*line) - 1;
        stdout.queue(MoveTo(box_x, box_y + 1 + i as u16))?;
        stdout.queue(Print(format!("│ {}{}│", line, " ".repeat(pad))))?;
    }
    stdout.queue(MoveTo(box_x, box_y + 1 + INFO_MESSAGE.len() as u16))?;
    stdout.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
    stdout.queue(ResetColor)?;
    Ok(())
}
