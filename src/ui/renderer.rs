/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. The game draws into `front` through the `Surface` trait
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// ## Scale
///   One terminal cell covers GLYPH_WIDTH × LINE_HEIGHT logical units, so
///   the 600×480 screen is a 60×24 block of cells, centered in the
///   terminal. Sprites become solid glyph blocks; anything drawn outside
///   the block is clipped.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::geometry::Rect;
use crate::domain::viewport::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::game::Game;
use crate::sim::surface::{Brush, Sprite, SpriteId, Surface, TextStyle, GLYPH_WIDTH, LINE_HEIGHT};

/// Logical screen size in terminal cells.
const COLS: usize = (SCREEN_WIDTH / GLYPH_WIDTH) as usize;
const ROWS: usize = (SCREEN_HEIGHT / LINE_HEIGHT) as usize;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// Using the same RGB for `Clear(ClearType::All)` and every cell's
    /// background keeps VTE terminals from showing lines between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
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
}

// ── Canvas: Surface over the front buffer ──

/// The logical screen placed at (`left`, `top`) of a frame buffer.
struct Canvas<'a> {
    buf: &'a mut FrameBuffer,
    left: usize,
    top: usize,
}

/// Glyph, foreground and background a sprite is drawn with.
fn sprite_look(sprite: &Sprite) -> (char, Color, Color) {
    let right_row = sprite.source().y0 > 0;
    match sprite.id() {
        SpriteId::Splash | SpriteId::GameOver => (' ', Color::White, Color::Rgb { r: 30, g: 45, b: 30 }),
        SpriteId::WorldMap => ('·', Color::Rgb { r: 60, g: 110, b: 60 }, Color::Rgb { r: 30, g: 70, b: 35 }),
        SpriteId::LevelIcon => ('▲', Color::Rgb { r: 240, g: 200, b: 80 }, Color::Rgb { r: 110, g: 70, b: 40 }),
        SpriteId::LevelIconDone => ('✓', Color::Rgb { r: 160, g: 255, b: 160 }, Color::Rgb { r: 50, g: 90, b: 50 }),
        SpriteId::Avatar => ('@', Color::Yellow, Color::Rgb { r: 30, g: 70, b: 35 }),
        SpriteId::Player => (if right_row { '►' } else { '◄' }, Color::Yellow, Color::Rgb { r: 70, g: 60, b: 20 }),
        SpriteId::Brick => ('▓', Color::Rgb { r: 180, g: 120, b: 60 }, Color::Rgb { r: 100, g: 65, b: 30 }),
        SpriteId::Block => ('█', Color::Rgb { r: 120, g: 120, b: 120 }, Color::Rgb { r: 70, g: 70, b: 70 }),
        SpriteId::Portal => ('O', Color::Rgb { r: 200, g: 120, b: 255 }, Color::Rgb { r: 60, g: 20, b: 90 }),
        SpriteId::PortalGem => ('◆', Color::Rgb { r: 220, g: 100, b: 255 }, Color::Reset),
        SpriteId::ShinyBall => ('●', Color::Rgb { r: 120, g: 255, b: 120 }, Color::Reset),
        SpriteId::Blob => ('~', Color::Rgb { r: 120, g: 220, b: 60 }, Color::Rgb { r: 40, g: 90, b: 20 }),
        SpriteId::Yorp => (if right_row { '>' } else { '<' }, Color::Red, Color::Rgb { r: 90, g: 30, b: 30 }),
        SpriteId::MessageBox | SpriteId::StatsBox => (' ', Color::White, Color::Rgb { r: 40, g: 40, b: 70 }),
        SpriteId::LifeIcon => ('♥', Color::Red, Color::Reset),
        SpriteId::GemSlot => ('·', Color::DarkGrey, Color::Rgb { r: 30, g: 30, b: 50 }),
    }
}

fn style_colors(style: TextStyle) -> Color {
    match style {
        TextStyle::Title => Color::Rgb { r: 255, g: 220, b: 80 },
        TextStyle::Normal => Color::White,
        TextStyle::Highlight => Color::Rgb { r: 120, g: 255, b: 160 },
        TextStyle::Dim => Color::DarkGrey,
        TextStyle::Hud => Color::Rgb { r: 200, g: 220, b: 255 },
    }
}

impl Canvas<'_> {
    /// Cells covered by a logical rectangle, clipped to the screen.
    fn cells_of(rect: &Rect) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        if rect.is_empty() {
            return None;
        }
        let col0 = rect.x0.div_euclid(GLYPH_WIDTH).max(0) as usize;
        let row0 = rect.y0.div_euclid(LINE_HEIGHT).max(0) as usize;
        let col1 = ((rect.x1 + GLYPH_WIDTH - 1).div_euclid(GLYPH_WIDTH).max(0) as usize).min(COLS);
        let row1 = ((rect.y1 + LINE_HEIGHT - 1).div_euclid(LINE_HEIGHT).max(0) as usize).min(ROWS);
        if col0 >= col1 || row0 >= row1 {
            return None;
        }
        Some((col0..col1, row0..row1))
    }

    fn cell(&self, col: usize, row: usize) -> Cell {
        self.buf.get(self.left + col, self.top + row)
    }

    fn put(&mut self, col: usize, row: usize, cell: Cell) {
        if col < COLS && row < ROWS {
            self.buf.set(self.left + col, self.top + row, cell);
        }
    }

    fn paint(&mut self, rect: &Rect, ch: char, fg: Color, bg: Color) {
        let Some((cols, rows)) = Self::cells_of(rect) else {
            return;
        };
        for row in rows {
            for col in cols.clone() {
                let under = self.cell(col, row);
                let bg = if bg == Color::Reset { under.bg } else { bg };
                self.put(col, row, Cell { ch, fg, bg });
            }
        }
    }
}

impl Surface for Canvas<'_> {
    fn fill(&mut self, rect: Rect, brush: Brush) {
        let bg = match brush {
            Brush::Sky => Color::Rgb { r: 70, g: 120, b: 190 },
            Brush::Night => Cell::BASE_BG,
            Brush::Panel => Color::Rgb { r: 40, g: 40, b: 70 },
            Brush::Shade => {
                // Dim what is already there instead of covering it.
                let Some((cols, rows)) = Self::cells_of(&rect) else {
                    return;
                };
                for row in rows {
                    for col in cols.clone() {
                        let under = self.cell(col, row);
                        self.put(col, row, Cell { ch: under.ch, fg: Color::DarkGrey, bg: Cell::BASE_BG });
                    }
                }
                return;
            }
        };
        self.paint(&rect, ' ', Color::White, bg);
    }

    fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) {
        let (ch, fg, bg) = sprite_look(sprite);
        let rect = Rect::new(x, y, sprite.width(), sprite.height());
        self.paint(&rect, ch, fg, bg);
    }

    fn text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) {
        let row = y.div_euclid(LINE_HEIGHT);
        if !(0..ROWS as i32).contains(&row) {
            return;
        }
        let fg = style_colors(style);
        let mut col = x.div_euclid(GLYPH_WIDTH);
        for ch in text.chars() {
            if (0..COLS as i32).contains(&col) {
                let under = self.cell(col as usize, row as usize);
                self.put(col as usize, row as usize, Cell { ch, fg, bg: under.bg });
            }
            col += 1;
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_scene: Option<&'static str>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_scene: None,
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
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, game: &Game) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Scene change → clear for clean transition
        let scene = game.scene().name();
        if self.last_scene != Some(scene) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_scene = Some(scene);
        }

        self.front.clear();
        let mut canvas = Canvas {
            left: self.term_w.saturating_sub(COLS) / 2,
            top: self.term_h.saturating_sub(ROWS) / 2,
            buf: &mut self.front,
        };
        game.draw(&mut canvas);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the
        // terminal's own default and show lines between rows.
        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Cell::BASE_BG))?;

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
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
