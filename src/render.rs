use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::game::{Mode, Pipe, Player, Rect, RunState, PLAYFIELD_H, PLAYFIELD_W};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256.min(256) as i32;
        let mix = |x: u8, y: u8| (x as i32 + (y as i32 - x as i32) * t / 256) as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }

    fn halved(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const SKY_TOP: Rgb = Rgb(88, 160, 220);
const SKY_BOT: Rgb = Rgb(178, 218, 242);
const CLOUD_LAYERS: [Rgb; 4] = [
    Rgb(200, 221, 236),
    Rgb(216, 232, 244),
    Rgb(233, 243, 250),
    Rgb(249, 252, 255),
];
const PIPE_DARK: Rgb = Rgb(58, 108, 28);
const PIPE_MID: Rgb = Rgb(94, 162, 46);
const PIPE_LIGHT: Rgb = Rgb(132, 202, 70);
const PIPE_CAP: Rgb = Rgb(48, 90, 22);
const BIRD_BODY: Rgb = Rgb(246, 200, 70);
const BIRD_BELLY: Rgb = Rgb(255, 233, 152);
const BIRD_WING: Rgb = Rgb(212, 158, 38);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(24, 24, 24);
const BIRD_BEAK: Rgb = Rgb(231, 120, 38);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(222, 198, 128);
const PANEL_LIGHT: Rgb = Rgb(236, 216, 156);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    pub w: usize,
    pub h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Present the buffer as ▀ cells, emitting color codes only on change.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            if row > 0 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if bg != Some(top) {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        bg = Some(top);
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        fg = Some(top);
                    }
                    if bg != Some(bot) {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        bg = Some(bot);
                    }
                    queue!(out, style::Print('\u{2580}'))?;
                }
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 0,1,0, 0,0,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        'A'..='Z' => Some(&LETTERS[ch as usize - 'A' as usize]),
        _ => None,
    }
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, bits: &[u8; 15], c: Rgb, scale: i32) {
    for row in 0..5 {
        for col in 0..3 {
            if bits[(row * 3 + col) as usize] == 1 {
                let px = x + col * scale;
                let py = y + row * scale;
                buf.fill_rect(px + 1, py + 1, scale, scale, SHADOW);
                buf.fill_rect(px, py, scale, scale, c);
            }
        }
    }
}

fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 4 * scale - scale
}

/// Draw `text` centered on `cx`, top edge at `y`.
fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, c: Rgb, scale: i32) {
    let mut x = cx - text_width(text, scale) / 2;
    for ch in text.chars() {
        if let Some(bits) = glyph(ch) {
            draw_glyph(buf, x, y, bits, c, scale);
        }
        x += 4 * scale;
    }
}

// ── Playfield projection ────────────────────────────────────────────────────

// Maps the fixed logical playfield onto whatever pixel grid the terminal
// currently offers.
struct View {
    sx: f64,
    sy: f64,
}

impl View {
    fn new(w: usize, h: usize) -> Self {
        Self {
            sx: w as f64 / PLAYFIELD_W,
            sy: h as f64 / PLAYFIELD_H,
        }
    }

    fn x(&self, lx: f64) -> i32 {
        (lx * self.sx).round() as i32
    }

    fn y(&self, ly: f64) -> i32 {
        (ly * self.sy).round() as i32
    }

    // Edges are rounded independently so adjacent rectangles stay seamless.
    fn rect(&self, r: &Rect) -> (i32, i32, i32, i32) {
        let x0 = self.x(r.x);
        let y0 = self.y(r.y);
        (x0, y0, self.x(r.right()) - x0, self.y(r.bottom()) - y0)
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

pub fn draw_frame(state: &RunState, buf: &mut PixelBuf) {
    let view = View::new(buf.w, buf.h);
    draw_sky(buf);
    draw_clouds(&view, &state.scroll, buf);
    draw_pipes(&view, state.pipes(), buf);
    draw_player(&view, &state.player, buf);

    let cx = buf.w as i32 / 2;
    match &state.mode {
        Mode::Menu => draw_menu(state.muted, buf),
        Mode::Playing { score, .. } => draw_text(buf, cx, 3, &score.to_string(), WHITE, 1),
        Mode::Dead { score, .. } => draw_game_over(*score, state.best, buf),
    }
}

fn draw_sky(buf: &mut PixelBuf) {
    let (w, h) = (buf.w, buf.h);
    for y in 0..h {
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, (y * 256 / h.max(1)) as u16);
        for x in 0..w {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_clouds(view: &View, scroll: &[f64; 4], buf: &mut PixelBuf) {
    const ALTITUDES: [f64; 4] = [42.0, 104.0, 168.0, 234.0];
    for (layer, &offset) in scroll.iter().enumerate() {
        // Each layer is a repeating strip drawn twice so the wrap never shows.
        for tile in [0.0, PLAYFIELD_W] {
            let base = tile - offset;
            for k in 0..3 {
                let cx = base + 70.0 + k as f64 * 205.0 + layer as f64 * 43.0;
                draw_puff(view, buf, cx, ALTITUDES[layer], CLOUD_LAYERS[layer]);
            }
        }
    }
}

fn draw_puff(view: &View, buf: &mut PixelBuf, cx: f64, cy: f64, c: Rgb) {
    let body = Rect {
        x: cx - 58.0,
        y: cy - 10.0,
        w: 116.0,
        h: 20.0,
    };
    let bump = Rect {
        x: cx - 28.0,
        y: cy - 24.0,
        w: 56.0,
        h: 16.0,
    };
    for part in [body, bump] {
        let (x, y, w, h) = view.rect(&part);
        buf.fill_rect(x, y, w.max(1), h.max(1), c);
    }
}

fn draw_pipes(view: &View, pipes: &[Pipe], buf: &mut PixelBuf) {
    for pipe in pipes {
        let (x, y, w, h) = view.rect(&pipe.rect);
        for col in 0..w.max(1) {
            let c = Rgb::lerp(PIPE_LIGHT, PIPE_DARK, (col * 256 / w.max(1)) as u16);
            buf.fill_rect(x + col, y, 1, h, c);
        }

        // Cap on the gap-facing end, slightly wider than the body.
        let cap = if pipe.rect.y <= 0.0 {
            Rect {
                x: pipe.rect.x - 8.0,
                y: pipe.rect.bottom() - 14.0,
                w: pipe.rect.w + 16.0,
                h: 14.0,
            }
        } else {
            Rect {
                x: pipe.rect.x - 8.0,
                y: pipe.rect.y,
                w: pipe.rect.w + 16.0,
                h: 14.0,
            }
        };
        let (cx, cy, cw, ch) = view.rect(&cap);
        let ch = ch.max(2);
        buf.fill_rect(cx, cy, cw, ch, PIPE_MID);
        buf.fill_rect(cx, cy, cw, 1, PIPE_CAP);
        buf.fill_rect(cx, cy + ch - 1, cw, 1, PIPE_CAP);
    }
}

fn draw_player(view: &View, player: &Player, buf: &mut PixelBuf) {
    let (x, y, w, h) = view.rect(&player.rect());
    let (w, h) = (w.max(3), h.max(3));

    buf.fill_rect(x, y, w, h, BIRD_BODY);
    buf.fill_rect(x + 1, y + h * 3 / 5, w - 2, (h * 2 / 5).max(1), BIRD_BELLY);

    // Two poses keyed off vertical velocity: wing up while ascending, down
    // while descending.
    let wing_y = if player.vy < 0.0 { y + h / 5 } else { y + h / 2 };
    buf.fill_rect(x + 1, wing_y, (w / 3).max(1), (h / 3).max(1), BIRD_WING);

    let eye_x = x + w - (w / 4).max(1) - 1;
    buf.fill_rect(eye_x, y + h / 5, 2, 2, BIRD_EYE);
    buf.set(eye_x + 1, y + h / 5 + 1, BIRD_PUPIL);

    buf.fill_rect(x + w, y + h / 2 - 1, (w / 4).max(1), 2, BIRD_BEAK);
}

// ── Overlays ────────────────────────────────────────────────────────────────

fn draw_menu(muted: bool, buf: &mut PixelBuf) {
    let cx = buf.w as i32 / 2;
    let top = (buf.h as i32 / 6).max(2);
    draw_text(buf, cx, top, "CLOUDHOP", BIRD_BODY, 2);
    draw_text(buf, cx, top + 14, "PRESS SPACE TO FLAP", WHITE, 1);
    let hint = if muted { "M TO UNMUTE" } else { "M TO MUTE" };
    draw_text(buf, cx, top + 21, hint, WHITE, 1);
}

fn draw_game_over(score: u32, best: u32, buf: &mut PixelBuf) {
    let (w, h) = (buf.w, buf.h);
    for y in 0..h {
        for x in 0..w {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.halved());
        }
    }

    let cx = w as i32 / 2;
    let cy = h as i32 / 2;
    let panel_w = (w as i32 * 2 / 3).max(46);
    let panel_h = 38.min(h as i32 - 2);
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;

    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL_LIGHT);

    draw_text(buf, cx, py + 3, "GAME OVER", SHADOW, 2);
    draw_text(buf, cx, py + 15, &format!("SCORE {score}"), WHITE, 1);
    draw_text(buf, cx, py + 22, &format!("BEST {best}"), BIRD_BODY, 1);
    draw_text(buf, cx, py + 29, "SPACE TO RETRY", WHITE, 1);
}
