//! Software-rendered editor window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ MODE - Active|Inactive           status text │
//! │                                              │
//! │    ┌──────┐ 1-2      camera frame with       │
//! │    │      │          motion pixels tinted    │
//! │    │ w    │                                  │
//! │    └──────┘                                  │
//! │ key legend                                   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The window is the same size as the frames, so window pixels are zone
//! coordinates.

use std::sync::mpsc::{self, Receiver, Sender};

use minifb::{InputCallback, Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use zone_trigger::{Command, EditorInput, Mode, Registry};

use crate::motion::GrayFrame;

// ════════════════════════════════════════════════════════════════════════════
// Colours
// ════════════════════════════════════════════════════════════════════════════

const PRESSED_COLOR: u32 = 0xFFFF0000;
const ARMED_COLOR: u32 = 0xFF0000FF;
const IDLE_COLOR: u32 = 0xFF00FFFF;
const IDLE_INVERTED_COLOR: u32 = 0xFFFFFF00;
const MOTION_TINT: u32 = 0xFFFF4080;
const TEXT_COLOR: u32 = 0xFFFFFFFF;
const DISARMED_TEXT: u32 = 0xFFFF3030;
const LEGEND_COLOR: u32 = 0xFFAAAAAA;
const BORDER: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// Input
// ════════════════════════════════════════════════════════════════════════════

/// Everything gathered from the window in one poll.
#[derive(Debug, Default)]
pub struct PolledInput {
    pub events: Vec<EditorInput>,
    /// Pointer position while the right button is held (simulated hand).
    pub hand: Option<(i32, i32)>,
    pub quit: bool,
}

/// Forwards typed characters from minifb's callback to the poll loop.
struct CharForwarder {
    tx: Sender<char>,
}

impl InputCallback for CharForwarder {
    fn add_char(&mut self, uni_char: u32) {
        if let Some(c) = char::from_u32(uni_char) {
            let _ = self.tx.send(c);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    width: usize,
    height: usize,
    chars: Receiver<char>,
    last_pointer: Option<(i32, i32)>,
    left_down: bool,
}

impl Visualizer {
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        let mut window = Window::new(
            "Motion Keys",
            width,
            height,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        let (tx, chars) = mpsc::channel();
        window.set_input_callback(Box::new(CharForwarder { tx }));

        Ok(Visualizer {
            window,
            buf: vec![0xFF000000; width * height],
            width,
            height,
            chars,
            last_pointer: None,
            left_down: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll pointer and keyboard state and translate it to editor inputs.
    pub fn poll_input(&mut self) -> PolledInput {
        let mut input = PolledInput::default();
        if !self.window.is_open() || self.window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            input.quit = true;
            return input;
        }

        let pointer = self
            .window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x as i32, y as i32));

        if let Some((x, y)) = pointer {
            if self.last_pointer != Some((x, y)) {
                input.events.push(EditorInput::PointerMoved { x, y });
                self.last_pointer = Some((x, y));
            }
            let down = self.window.get_mouse_down(MouseButton::Left);
            if down && !self.left_down {
                input.events.push(EditorInput::PointerDown { x, y });
            } else if !down && self.left_down {
                input.events.push(EditorInput::PointerUp);
            }
            self.left_down = down;

            if self.window.get_mouse_down(MouseButton::Right) {
                input.hand = Some((x, y));
            }
        }

        // Printable characters come through the callback; Enter does not.
        while let Ok(c) = self.chars.try_recv() {
            if !c.is_control() {
                input.events.push(EditorInput::Key(c));
            }
        }
        if self.window.is_key_pressed(Key::Enter, KeyRepeat::No) {
            input.events.push(EditorInput::Key(Command::ENTER));
        }

        input
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        frame: Option<&GrayFrame>,
        motion: Option<&GrayFrame>,
        registry: &Registry,
        mode: Mode,
        armed: bool,
        status: &str,
    ) {
        // ── camera frame ──────────────────────────────────────────────────
        match frame {
            Some(f) if f.width == self.width && f.height == self.height => {
                for (dst, &g) in self.buf.iter_mut().zip(&f.pixels) {
                    let g = g as u32;
                    *dst = 0xFF000000 | (g << 16) | (g << 8) | g;
                }
            }
            _ => self.buf.fill(0xFF000000),
        }

        // ── motion overlay ────────────────────────────────────────────────
        if let Some(m) = motion.filter(|m| m.width == self.width && m.height == self.height) {
            for (dst, &v) in self.buf.iter_mut().zip(&m.pixels) {
                if v > 0 {
                    *dst = blend(*dst, MOTION_TINT, 0.5);
                }
            }
        }

        // ── zones ─────────────────────────────────────────────────────────
        for (_, z) in registry.iter() {
            let color = match (armed, z.is_pressed(), z.inverted) {
                (true, true, _) => PRESSED_COLOR,
                (true, false, _) => ARMED_COLOR,
                (false, _, true) => IDLE_INVERTED_COLOR,
                (false, _, false) => IDLE_COLOR,
            };
            let (x1, y1) = (z.x1.min(z.x2), z.y1.min(z.y2));
            let (w, h) = ((z.x2 - z.x1).unsigned_abs(), (z.y2 - z.y1).unsigned_abs());
            self.draw_border(x1, y1, w as usize, h as usize, color);

            let key = z.key.map(String::from).unwrap_or_else(|| "None".to_string());
            self.draw_label(&key, x1 + 5, z.y2.max(z.y1) - 14, TEXT_COLOR, 2);
            if let Some(g) = z.group() {
                self.draw_label(&format!("{}-{}", g, z.priority), x1 + 5, y1 + 5, TEXT_COLOR, 1);
            }
        }

        // ── mode / status / legend ────────────────────────────────────────
        let header = format!("{} - {}", mode.label(), if armed { "Active" } else { "Inactive" });
        let header_color = if armed { TEXT_COLOR } else { DISARMED_TEXT };
        self.draw_label(&header, 6, 6, header_color, 2);
        self.draw_label(status, 6, 24, TEXT_COLOR, 1);
        self.draw_label(
            "1=default 2=new 3=del 4=move 5=size 6=key 7=invert 8=group 9=priority \
             -=load ==save Enter=arm Esc=quit  right-drag=hand",
            6,
            self.height as i32 - 10,
            LEGEND_COLOR,
            1,
        );

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn draw_border(&mut self, x: i32, y: i32, w: usize, h: usize, color: u32) {
        let (w, h) = (w as i32, h as i32);
        for t in 0..BORDER as i32 {
            for col in x..=x + w {
                self.set_pixel(col, y + t, color);
                self.set_pixel(col, y + h - t, color);
            }
            for row in y..=y + h {
                self.set_pixel(x + t, row, color);
                self.set_pixel(x + w - t, row, color);
            }
        }
    }

    /// Minimal bitmap font: 3×5 glyphs, each pixel drawn `scale`×`scale`.
    fn draw_label(&mut self, text: &str, x: i32, y: i32, color: u32, scale: i32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3i32 {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(
                                    cx + col * scale + sx,
                                    y + row as i32 * scale + sy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx >= self.width as i32 { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let (ar, br) = ((a >> 16) & 0xFF, (b >> 16) & 0xFF);
    let (ag, bg) = ((a >> 8) & 0xFF, (b >> 8) & 0xFF);
    let (ab, bb) = (a & 0xFF, b & 0xFF);
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}
