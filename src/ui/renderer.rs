/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The playfield's logical units (600×400, cell 20) are mapped here:
/// one game cell = 2 terminal columns × 1 row, plus a one-cell border
/// ring around the playable lattice.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::Pos;
use crate::sim::session::{GameSession, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap pixels on VTE terminals match the cell color and
    /// no horizontal lines show through.
    const BASE_BG: Color = Color::Rgb { r: 12, g: 12, b: 12 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each game cell spans 2 terminal columns (roughly square on screen).
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const FIELD_ROW: usize = 2;

const SNAKE_HEAD: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const SNAKE_BODY: Color = Color::Rgb { r: 0, g: 190, b: 0 };
const FRUIT: Color = Color::Rgb { r: 230, g: 40, b: 40 };
const BORDER: Color = Color::Rgb { r: 169, g: 169, b: 169 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &GameSession) -> io::Result<()> {
        self.sync_terminal_size()?;

        // Detect phase change → clear for clean transition
        let phase_changed = self.last_phase != Some(session.phase);
        if phase_changed {
            self.back.cells.fill(Cell::INVALID);
            queue!(
                self.writer,
                SetBackgroundColor(Cell::BASE_BG),
                Clear(ClearType::All)
            )?;
            self.last_phase = Some(session.phase);
        }

        self.front.clear();
        self.compose_game(session);
        if session.phase == Phase::GameOver {
            self.compose_game_over(session);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Present one cutscene frame stretched to the whole terminal.
    /// Nearest-neighbour sampling, red on black.
    pub fn blit_cutscene(&mut self, frame: &[&str]) -> io::Result<()> {
        self.sync_terminal_size()?;

        self.front.clear();
        let src_h = frame.len().max(1);
        let src_w = frame.iter().map(|r| r.chars().count()).max().unwrap_or(1);
        let rows: Vec<Vec<char>> = frame.iter().map(|r| r.chars().collect()).collect();

        for y in 0..self.term_h {
            let sy = y * src_h / self.term_h.max(1);
            let row = &rows[sy.min(src_h - 1)];
            for x in 0..self.term_w {
                let sx = x * src_w / self.term_w.max(1);
                let ch = row.get(sx).copied().unwrap_or(' ');
                self.front
                    .set(x, y, Cell::new(ch, FRUIT, Color::Black));
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn sync_terminal_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(
                self.writer,
                SetBackgroundColor(Cell::BASE_BG),
                Clear(ClearType::All)
            )?;
        }
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame. Not ResetColor:
        // the terminal's native default may differ from BASE_BG and
        // cause line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                let mut tmp = [0u8; 4];
                queue!(self.writer, Print(&*cell.ch.encode_utf8(&mut tmp)))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    /// Terminal position of a logical game position.
    /// The border ring occupies lattice index -1 and cols/rows.
    fn field_pos(&self, session: &GameSession, p: Pos) -> (usize, usize) {
        let g = &session.grid;
        let kx = ((p.x - g.min_x) / g.cell + 1) as usize;
        let ky = ((p.y - g.min_y) / g.cell + 1) as usize;
        (kx * CELL_W, FIELD_ROW + ky)
    }

    fn put_game_cell(&mut self, col: usize, row: usize, ch: char, fg: Color, bg: Color) {
        self.front.set(col, row, Cell::new(ch, fg, bg));
        self.front.set(col + 1, row, Cell::new(ch, fg, bg));
    }

    fn compose_game(&mut self, session: &GameSession) {
        let buf_w = self.front.width;
        let cols = session.grid.cols() as usize;
        let rows = session.grid.rows() as usize;

        // ── HUD row (speed overlay belongs to Playing only) ──
        if session.phase == Phase::Playing {
            let hud = format!(
                " Speed: {:<4} Crashes: {}/{} ",
                session.snake.speed as i32,
                session.snake.crashes,
                session.max_crashes,
            );
            for x in 0..buf_w {
                self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
            }
            self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
        }

        // ── Boundary ring ──
        for k in 0..cols + 2 {
            self.put_game_cell(k * CELL_W, FIELD_ROW, '▒', BORDER, Color::Reset);
            self.put_game_cell(k * CELL_W, FIELD_ROW + rows + 1, '▒', BORDER, Color::Reset);
        }
        for k in 1..rows + 1 {
            self.put_game_cell(0, FIELD_ROW + k, '▒', BORDER, Color::Reset);
            self.put_game_cell((cols + 1) * CELL_W, FIELD_ROW + k, '▒', BORDER, Color::Reset);
        }

        // ── Fruit ──
        let (fc, fr) = self.field_pos(session, session.fruit.position);
        self.put_game_cell(fc, fr, '█', FRUIT, Color::Reset);

        // ── Snake (tail first so the head wins on overlap) ──
        for (i, &seg) in session.snake.body.iter().enumerate().rev() {
            let (c, r) = self.field_pos(session, seg);
            let color = if i == 0 { SNAKE_HEAD } else { SNAKE_BODY };
            self.put_game_cell(c, r, '█', color, Color::Reset);
        }

        // ── Help bar ──
        let help_row = FIELD_ROW + rows + 3;
        let help = " Arrows/WASD: steer (controls are reversed)   Esc: quit";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }

    fn compose_game_over(&mut self, session: &GameSession) {
        let rows = session.grid.rows() as usize;
        let msg = "Game Over! Press Q to quit or R to restart.";
        let row = FIELD_ROW + rows / 2;
        let col = self.front.width.saturating_sub(msg.len()) / 2;
        self.front.put_str(col, row, msg, FRUIT, Color::Black);
    }
}
