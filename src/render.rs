use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use yurupet::mess::MessId;
use yurupet::model::{ActionKind, Button, Face, Playfield};
use yurupet::sim::View;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell {
                bg,
                ..Cell::default()
            };
        }
    }
}

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Write only the cells that changed since the last frame.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Screen geometry + hit-testing
------------------------------ */

const BUTTONS: [(Button, &str, &str); 3] = [
    (Button::Feed, "( F )", "feed"),
    (Button::Play, "( P )", "play"),
    (Button::Clean, "( C )", "clean"),
];
const BUTTON_HALF_W: i32 = 2;

#[derive(Clone, Copy, Debug)]
pub(crate) enum Target {
    Button(Button),
    Mess(MessId),
}

/// Where the pet window and buttons sit for a given terminal size.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub(crate) pf: Playfield,
    /// Top-left interior cell of the pet window.
    pub(crate) ox: i32,
    pub(crate) oy: i32,
}

impl Layout {
    pub(crate) fn new(cols: u16, pf: Playfield) -> Self {
        let ox = ((cols as i32 - pf.width as i32 - 2) / 2).max(0) + 1;
        Self { pf, ox, oy: 2 }
    }

    fn buttons_row(&self) -> i32 {
        self.oy + self.pf.height as i32 + 2
    }

    fn button_center(&self, i: usize) -> i32 {
        self.ox + (self.pf.width as i32 * (i as i32 + 1)) / 4
    }

    pub(crate) fn hit(&self, col: u16, row: u16, view: &View) -> Option<Target> {
        let (col, row) = (col as i32, row as i32);

        if row == self.buttons_row() {
            for (i, (button, _, _)) in BUTTONS.iter().enumerate() {
                if (col - self.button_center(i)).abs() <= BUTTON_HALF_W {
                    return Some(Target::Button(*button));
                }
            }
        }

        // newest mess first so overlapping glyphs resolve to the one on top
        view.messes.iter().rev().find_map(|(id, pos)| {
            let mx = self.ox + pos.x as i32;
            let my = self.oy + pos.y as i32;
            (row == my && (col - mx).abs() <= 1).then_some(Target::Mess(*id))
        })
    }
}

/* -----------------------------
   Drawing
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
    if y < 0 {
        return;
    }
    for (i, ch) in s.chars().enumerate() {
        let xx = x + i as i32;
        if xx < 0 {
            continue;
        }
        if xx >= buf.w as i32 {
            break;
        }
        buf.set(xx as u16, y as u16, Cell { ch, fg, bg });
    }
}

fn bar(value: i32, width: usize) -> String {
    let v = value.clamp(0, 100) as usize;
    let fill = (v * width + 50) / 100;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn face_art(face: Face) -> [&'static str; 4] {
    match face {
        Face::Happy => [
            "  .-----.  ",
            " ( ^   ^ ) ",
            " (   w   ) ",
            "  '-----'  ",
        ],
        Face::Hungry => [
            "  .-----.  ",
            " ( o   o ) ",
            " (   O   ) ",
            "  '-----'  ",
        ],
        Face::Sleepy => [
            "  .-----. z",
            " ( -   - ) ",
            " (   ~   ) ",
            "  '-----'  ",
        ],
    }
}

fn tint(enable_color: bool, r: u8, g: u8, b: u8) -> Color {
    if enable_color {
        Color::Rgb { r, g, b }
    } else {
        Color::White
    }
}

fn draw_frame(buf: &mut CellBuffer, lay: &Layout, fg: Color, bg: Color) {
    let (w, h) = (lay.pf.width as i32, lay.pf.height as i32);
    let (x0, y0) = (lay.ox - 1, lay.oy - 1);
    let (x1, y1) = (lay.ox + w, lay.oy + h);
    let put = |buf: &mut CellBuffer, x: i32, y: i32, ch: char| {
        if x >= 0 && y >= 0 {
            buf.set(x as u16, y as u16, Cell { ch, fg, bg });
        }
    };
    for x in x0 + 1..x1 {
        put(buf, x, y0, '─');
        put(buf, x, y1, '─');
    }
    for y in y0 + 1..y1 {
        put(buf, x0, y, '│');
        put(buf, x1, y, '│');
    }
    put(buf, x0, y0, '┌');
    put(buf, x1, y0, '┐');
    put(buf, x0, y1, '└');
    put(buf, x1, y1, '┘');
}

/// Subpixel bob to whole rows, the same quartering the braille canvas used.
fn offset_rows(offset: i32) -> i32 {
    (offset as f32 / 4.0).round() as i32
}

pub(crate) fn draw_scene(
    buf: &mut CellBuffer,
    lay: &Layout,
    view: &View,
    toast: Option<&str>,
    enable_color: bool,
) {
    let bg = Color::Black;
    let fg = Color::White;
    let (w, h) = (lay.pf.width as i32, lay.pf.height as i32);

    draw_text(buf, lay.ox, 0, "yurupet", fg, bg);
    draw_frame(buf, lay, fg, bg);

    // need bars across the top of the window
    let bar_w = (w - 12).max(4) as usize;
    let rows = [
        ("HUN", view.hunger, tint(enable_color, 255, 179, 179)),
        ("FUN", view.fun, tint(enable_color, 179, 212, 255)),
        ("CLN", view.clean, tint(enable_color, 179, 255, 204)),
    ];
    for (i, (label, val, col)) in rows.iter().enumerate() {
        let s = format!("{label} {} {:>3}", bar(*val, bar_w), val);
        draw_text(buf, lay.ox + 1, lay.oy + i as i32, &s, *col, bg);
    }

    // pet
    let pet_col = match view.face {
        Face::Happy => tint(enable_color, 140, 240, 200),
        Face::Hungry => tint(enable_color, 255, 90, 90),
        Face::Sleepy => tint(enable_color, 160, 140, 255),
    };
    let art = face_art(view.face);
    let art_w = art[0].chars().count() as i32;
    let px = lay.ox + (w - art_w) / 2;
    let py = lay.oy + h / 2 - 1 + offset_rows(view.offset);
    for (i, line) in art.iter().enumerate() {
        draw_text(buf, px, py + i as i32, line, pet_col, bg);
    }

    if let Some(kind) = view.prop {
        let (glyph, col) = match kind {
            ActionKind::Feed => ("<onigiri>", tint(enable_color, 250, 250, 240)),
            ActionKind::Play => ("[#][#]", tint(enable_color, 255, 200, 90)),
        };
        let gx = lay.ox + (w - glyph.len() as i32) / 2;
        draw_text(buf, gx, lay.oy + h - 1, glyph, col, bg);
    }

    for (_, pos) in &view.messes {
        let col = tint(enable_color, 150, 100, 50);
        draw_text(buf, lay.ox + pos.x as i32, lay.oy + pos.y as i32, "@", col, bg);
    }

    if let Some(text) = toast {
        let tx = lay.ox + (w - text.chars().count() as i32) / 2;
        draw_text(buf, tx, lay.oy + lay.pf.top as i32 - 1, text, Color::Yellow, bg);
    }

    // buttons under the window
    let by = lay.buttons_row();
    for (i, (_, face, label)) in BUTTONS.iter().enumerate() {
        let cx = lay.button_center(i);
        let dim = view.busy;
        let bcol = if dim { Color::DarkGrey } else { fg };
        draw_text(buf, cx - BUTTON_HALF_W, by, face, bcol, bg);
        draw_text(buf, cx - label.len() as i32 / 2, by + 1, label, bcol, bg);
    }

    let age = format!("age {:.0}s", view.lifetime_secs);
    draw_text(buf, lay.ox, by + 3, &age, Color::DarkGrey, bg);

    let help = "Keys: f/1 feed | p/2 play | c/3 clean | click a mess to tidy | q quit";
    draw_text(buf, 1, buf.h as i32 - 1, help, fg, bg);
}
