//! Crop hint overlay model.
//!
//! While the user pans or zooms, hosts draw a rule-of-thirds grid over the
//! crop window. The grid hides itself again after a timeout with no
//! interaction. This module computes what to draw and when; drawing is left
//! to the host.

use serde::{Deserialize, Serialize};

use crate::geometry::{Offset, Rect};

/// Default delay before the grid hides, in milliseconds.
pub const DEFAULT_HINT_TIMEOUT_MS: f64 = 1500.0;

/// Colours and stroke for the hint overlay, as `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropHint {
    pub background: u32,
    pub border: u32,
    pub border_width: f32,
    /// `None` draws no grid lines.
    pub grid_line: Option<u32>,
}

impl CropHint {
    pub const DEFAULT: CropHint = CropHint {
        background: 0xFFBA_BABA,
        border: 0xFFBA_BABA,
        border_width: 2.0,
        grid_line: Some(0xFF00_0000),
    };
}

impl Default for CropHint {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visibility of the hint grid, driven by interaction and frame time.
#[derive(Debug, Clone, PartialEq)]
pub struct HintVisibility {
    timeout_ms: f64,
    hide_at_ms: Option<f64>,
}

impl Default for HintVisibility {
    fn default() -> Self {
        Self::new(DEFAULT_HINT_TIMEOUT_MS)
    }
}

impl HintVisibility {
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            timeout_ms: timeout_ms.max(0.0),
            hide_at_ms: None,
        }
    }

    /// Show the grid at `now_ms`, restarting the hide timer.
    pub fn show(&mut self, now_ms: f64) {
        self.hide_at_ms = Some(now_ms + self.timeout_ms);
    }

    pub fn hide(&mut self) {
        self.hide_at_ms = None;
    }

    /// Advance to `now_ms`; returns whether the grid is still visible.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if matches!(self.hide_at_ms, Some(hide_at) if now_ms >= hide_at) {
            self.hide_at_ms = None;
        }
        self.is_visible()
    }

    pub fn is_visible(&self) -> bool {
        self.hide_at_ms.is_some()
    }
}

/// A straight line segment in crop-window-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub start: Offset,
    pub end: Offset,
}

/// Interior lines splitting `window` into `divisions` x `divisions` cells.
///
/// Lines are local to the window (origin at its top-left). Vertical lines come
/// first, then horizontal ones.
pub fn grid_lines(window: &Rect, divisions: u32) -> Vec<GridLine> {
    if divisions < 2 || window.width <= 0.0 || window.height <= 0.0 {
        return Vec::new();
    }

    let cell_w = window.width / divisions as f32;
    let cell_h = window.height / divisions as f32;

    let vertical = (1..divisions).map(|i| {
        let x = i as f32 * cell_w;
        GridLine {
            start: Offset::new(x, 0.0),
            end: Offset::new(x, window.height),
        }
    });
    let horizontal = (1..divisions).map(|i| {
        let y = i as f32 * cell_h;
        GridLine {
            start: Offset::new(0.0, y),
            end: Offset::new(window.width, y),
        }
    });
    vertical.chain(horizontal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_hides_after_timeout() {
        let mut hint = HintVisibility::default();
        assert!(!hint.is_visible());

        hint.show(0.0);
        assert!(hint.tick(1000.0));
        assert!(!hint.tick(1500.0));
    }

    #[test]
    fn test_show_restarts_timer() {
        let mut hint = HintVisibility::new(1500.0);
        hint.show(0.0);
        hint.show(1000.0);
        assert!(hint.tick(2000.0));
        assert!(!hint.tick(2500.0));
    }

    #[test]
    fn test_hide_is_immediate() {
        let mut hint = HintVisibility::new(1500.0);
        hint.show(0.0);
        hint.hide();
        assert!(!hint.tick(1.0));
    }

    #[test]
    fn test_rule_of_thirds_grid() {
        let lines = grid_lines(&Rect::new(-37.5, 0.0, 225.0, 300.0), 3);
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            GridLine {
                start: Offset::new(75.0, 0.0),
                end: Offset::new(75.0, 300.0)
            }
        );
        assert_eq!(
            lines[3],
            GridLine {
                start: Offset::new(0.0, 200.0),
                end: Offset::new(225.0, 200.0)
            }
        );
    }

    #[test]
    fn test_empty_window_has_no_grid() {
        assert!(grid_lines(&Rect::ZERO, 3).is_empty());
        assert!(grid_lines(&Rect::new(0.0, 0.0, 10.0, 10.0), 1).is_empty());
    }

    #[test]
    fn test_default_hint_colours() {
        let hint = CropHint::default();
        assert_eq!(hint.border, 0xFFBABABA);
        assert_eq!(hint.grid_line, Some(0xFF000000));
        assert_eq!(hint.border_width, 2.0);
    }
}
