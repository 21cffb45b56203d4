//! Motion detection: grayscale frames, background differencing and frame sources.
//!
//! The detector keeps one preprocessed *background* frame.  Each new frame is
//! blurred, brightness-matched to the background, differenced and
//! thresholded into a binary map (0 or 255 per pixel).  That map is what the
//! arbitration engine sums over each zone.

use anyhow::{ensure, Result};
use zone_trigger::IntensityMap;

// ════════════════════════════════════════════════════════════════════════════
// GrayFrame
// ════════════════════════════════════════════════════════════════════════════

/// 8-bit grayscale image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl GrayFrame {
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        GrayFrame { width, height, pixels: vec![value; width * height] }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 { self.pixels[y * self.width + x] }

    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = v;
        }
    }

    pub fn mean(&self) -> f64 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        self.pixels.iter().map(|&p| p as u64).sum::<u64>() as f64 / self.pixels.len() as f64
    }

    /// Box blur with a `(2r+1)²` kernel, clamped at the edges.
    ///
    /// Separable: one horizontal pass, one vertical pass.
    pub fn box_blur(&self, radius: usize) -> GrayFrame {
        if radius == 0 || self.pixels.is_empty() {
            return self.clone();
        }
        let (w, h) = (self.width, self.height);
        let mut tmp = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                let lo = x.saturating_sub(radius);
                let hi = (x + radius).min(w - 1);
                let sum: u32 = (lo..=hi).map(|i| self.pixels[y * w + i] as u32).sum();
                tmp[y * w + x] = (sum / (hi - lo + 1) as u32) as u8;
            }
        }
        let mut out = vec![0u8; w * h];
        for y in 0..h {
            let lo = y.saturating_sub(radius);
            let hi = (y + radius).min(h - 1);
            for x in 0..w {
                let sum: u32 = (lo..=hi).map(|j| tmp[j * w + x] as u32).sum();
                out[y * w + x] = (sum / (hi - lo + 1) as u32) as u8;
            }
        }
        GrayFrame { width: w, height: h, pixels: out }
    }
}

impl IntensityMap for GrayFrame {
    fn region_sum(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> u64 {
        let clip = |v: i32, max: usize| v.clamp(0, max as i32) as usize;
        let (x1, x2) = (clip(x1, self.width), clip(x2, self.width));
        let (y1, y2) = (clip(y1, self.height), clip(y2, self.height));
        if x1 >= x2 || y1 >= y2 {
            return 0;
        }
        (y1..y2)
            .map(|y| {
                let row = &self.pixels[y * self.width + x1..y * self.width + x2];
                row.iter().map(|&p| p as u64).sum::<u64>()
            })
            .sum()
    }
}

/// Binary difference of `current` against `background`.
///
/// `current` is first shifted by the difference in mean brightness so a
/// global lighting change does not read as motion.
pub fn frame_diff(current: &GrayFrame, background: &GrayFrame, pixel_threshold: u8) -> Result<GrayFrame> {
    ensure!(
        current.width == background.width && current.height == background.height,
        "frame {}x{} does not match background {}x{}",
        current.width,
        current.height,
        background.width,
        background.height
    );
    let beta = background.mean() - current.mean();
    let pixels = current
        .pixels
        .iter()
        .zip(&background.pixels)
        .map(|(&c, &b)| {
            let adjusted = (c as f64 + beta).round().clamp(0.0, 255.0) as i32;
            if (b as i32 - adjusted).unsigned_abs() > pixel_threshold as u32 { 255 } else { 0 }
        })
        .collect();
    Ok(GrayFrame { width: current.width, height: current.height, pixels })
}

// ════════════════════════════════════════════════════════════════════════════
// MotionDetector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct MotionDetector {
    background: Option<GrayFrame>,
    blur_radius: usize,
    pixel_threshold: u8,
}

impl MotionDetector {
    pub fn new(blur_radius: usize, pixel_threshold: u8) -> Self {
        MotionDetector { background: None, blur_radius, pixel_threshold }
    }

    pub fn is_armed(&self) -> bool { self.background.is_some() }

    /// Capture `frame` as the background.
    pub fn arm(&mut self, frame: &GrayFrame) {
        self.background = Some(frame.box_blur(self.blur_radius));
    }

    pub fn disarm(&mut self) { self.background = None; }

    /// Motion map for `frame`, or `None` while disarmed.
    pub fn detect(&self, frame: &GrayFrame) -> Result<Option<GrayFrame>> {
        let Some(bg) = &self.background else { return Ok(None) };
        let prepared = frame.box_blur(self.blur_radius);
        frame_diff(&prepared, bg, self.pixel_threshold).map(Some)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Frame sources
// ════════════════════════════════════════════════════════════════════════════

/// Anything that produces frames in zone coordinates, one per tick.
pub trait FrameSource {
    /// `None` ends the run (device gone, stream finished).
    fn next_frame(&mut self) -> Option<GrayFrame>;
}

/// Synthetic camera: a static textured scene plus a bright disc that
/// follows the "hand" position while one is set.
pub struct SimFrameSource {
    scene: GrayFrame,
    hand: Option<(i32, i32)>,
    pub hand_radius: i32,
}

impl SimFrameSource {
    pub fn new(width: usize, height: usize) -> Self {
        let mut scene = GrayFrame::filled(width, height, 0);
        for y in 0..height {
            for x in 0..width {
                // soft diagonal gradient with a faint 32px checker
                let base = 40 + ((x + y) * 60 / (width + height).max(1)) as u8;
                let check = if (x / 32 + y / 32) % 2 == 0 { 8 } else { 0 };
                scene.set(x, y, base + check);
            }
        }
        SimFrameSource { scene, hand: None, hand_radius: 18 }
    }

    pub fn set_hand(&mut self, hand: Option<(i32, i32)>) { self.hand = hand; }
}

impl FrameSource for SimFrameSource {
    fn next_frame(&mut self) -> Option<GrayFrame> {
        let mut frame = self.scene.clone();
        if let Some((cx, cy)) = self.hand {
            let r = self.hand_radius;
            for dy in -r..=r {
                for dx in -r..=r {
                    let (x, y) = (cx + dx, cy + dy);
                    if dx * dx + dy * dy <= r * r && x >= 0 && y >= 0 {
                        frame.set(x as usize, y as usize, 235);
                    }
                }
            }
        }
        Some(frame)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_sum_clips_to_frame() {
        let f = GrayFrame::filled(10, 10, 1);
        assert_eq!(f.region_sum(0, 0, 10, 10), 100);
        assert_eq!(f.region_sum(-5, -5, 5, 5), 25);
        assert_eq!(f.region_sum(8, 8, 50, 50), 4);
        assert_eq!(f.region_sum(5, 5, 2, 2), 0);
        assert_eq!(f.region_sum(20, 20, 30, 30), 0);
    }

    #[test]
    fn blur_keeps_flat_frames_flat() {
        let f = GrayFrame::filled(8, 6, 77);
        assert_eq!(f.box_blur(2), f);
    }

    #[test]
    fn blur_spreads_a_spike() {
        let mut f = GrayFrame::filled(5, 5, 0);
        f.set(2, 2, 225);
        let b = f.box_blur(1);
        assert_eq!(b.get(2, 2), 25);
        assert_eq!(b.get(1, 1), 25);
        assert_eq!(b.get(0, 0), 0);
    }

    #[test]
    fn uniform_brightness_change_is_not_motion() {
        let bg = GrayFrame::filled(4, 4, 100);
        let cur = GrayFrame::filled(4, 4, 160);
        let d = frame_diff(&cur, &bg, 35).unwrap();
        assert_eq!(d.region_sum(0, 0, 4, 4), 0);
    }

    #[test]
    fn local_change_is_motion() {
        let bg = GrayFrame::filled(10, 10, 50);
        let mut cur = bg.clone();
        cur.set(3, 3, 250);
        let d = frame_diff(&cur, &bg, 35).unwrap();
        assert_eq!(d.get(3, 3), 255);
        assert_eq!(d.get(0, 0), 0);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let a = GrayFrame::filled(4, 4, 0);
        let b = GrayFrame::filled(5, 4, 0);
        assert!(frame_diff(&a, &b, 35).is_err());
    }

    #[test]
    fn detector_reports_nothing_until_armed() {
        let mut src = SimFrameSource::new(64, 48);
        let mut det = MotionDetector::new(2, 35);
        let frame = src.next_frame().unwrap();
        assert!(det.detect(&frame).unwrap().is_none());

        det.arm(&frame);
        assert!(det.is_armed());
        let still = det.detect(&src.next_frame().unwrap()).unwrap().unwrap();
        assert_eq!(still.region_sum(0, 0, 64, 48), 0);

        src.set_hand(Some((32, 24)));
        let moving = det.detect(&src.next_frame().unwrap()).unwrap().unwrap();
        assert!(moving.region_sum(22, 14, 42, 34) > 10_000);

        det.disarm();
        assert!(det.detect(&src.next_frame().unwrap()).unwrap().is_none());
    }
}
