use crate::crtc::Crtc;

use super::regs::{MAX_CURSOR_HEIGHT, MAX_CURSOR_WIDTH};

/// What actually gets programmed for a requested cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPlacement {
    pub x: u32,
    pub y: u32,
    pub hot_x: u32,
    pub hot_y: u32,
    /// Visible width, only computed when both CRTCs scan out.
    pub width: Option<u32>,
}

/// Fold negative coordinates into the hotspot; the hardware only takes unsigned positions.
pub fn clamp_position(x: i32, y: i32) -> (u32, u32, u32, u32) {
    let (x, hot_x) = if x < 0 { (0, x.unsigned_abs()) } else { (x as u32, 0) };
    let (y, hot_y) = if y < 0 { (0, y.unsigned_abs()) } else { (y as u32, 0) };
    (x, y, hot_x, hot_y)
}

/// Placement of the cursor on `crtc` for the absolute position `x`,`y`.
///
/// With both CRTCs active the cursor width is trimmed so the image never extends past the end of
/// the CRTC's viewport and its right edge never lands on a multiple of 128 pixels; either
/// corrupts the cursor on dual head. A cursor trimmed to nothing is parked below the viewport.
pub fn place_cursor(crtc: &Crtc, dual_head: bool, x: i32, y: i32) -> CursorPlacement {
    let (x, y, hot_x, hot_y) = clamp_position(x, y);
    let mut placement = CursorPlacement {
        x,
        y,
        hot_x,
        hot_y,
        width: None,
    };
    if !dual_head {
        return placement;
    }

    let mut width = MAX_CURSOR_WIDTH as i64;
    let mut cursor_end = x as i64 + width;
    let frame_end = crtc.x as i64 + crtc.width as i64;

    if cursor_end > frame_end {
        width -= cursor_end - frame_end;
        cursor_end = x as i64 + width;
    }
    if cursor_end & 0x7f == 0 {
        width -= 1;
    }
    if width <= 0 {
        placement = CursorPlacement {
            x: 0,
            y: (crtc.y as i64 + crtc.height as i64).clamp(0, u32::MAX as i64) as u32,
            hot_x: 0,
            hot_y: 0,
            width: Some(1),
        };
    } else {
        placement.width = Some(width as u32);
    }
    placement
}

/// Whether a cursor at absolute `x`,`y` can show up on `crtc`.
///
/// Only cursors entirely above-left or entirely below-right of the viewport are rejected.
pub fn has_visible_cursor(crtc: &Crtc, x: i32, y: i32) -> bool {
    let (x, y) = (x as i64, y as i64);
    let (cx, cy) = (crtc.x as i64, crtc.y as i64);

    if x + (MAX_CURSOR_WIDTH as i64) < cx && y + (MAX_CURSOR_HEIGHT as i64) < cy {
        return false;
    }
    if x >= cx + crtc.width as i64 && y >= cy + crtc.height as i64 {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn crtc(x: i32, y: i32, width: i32, height: i32) -> Crtc {
        let mut crtc = Crtc::new(0, 0);
        crtc.activate(x, y, width, height);
        crtc
    }

    #[test]
    fn negative_coordinates_become_hotspot() {
        assert_eq!(clamp_position(-5, 10), (0, 10, 5, 0));
        assert_eq!(clamp_position(7, -63), (7, 0, 0, 63));
    }

    #[test]
    fn single_head_keeps_the_full_cursor() {
        let placement = place_cursor(&crtc(0, 0, 1024, 768), false, 1000, 100);
        assert_eq!(placement.width, None);
        assert_eq!((placement.x, placement.y), (1000, 100));
    }

    #[test]
    fn dual_head_trims_at_the_frame_edge() {
        // 1000 + 64 runs 40 past the 1024 frame end; 1024 is a multiple of 128.
        let placement = place_cursor(&crtc(0, 0, 1024, 768), true, 1000, 100);
        assert_eq!(placement.width, Some(23));
    }

    #[test]
    fn dual_head_avoids_128_pixel_right_edge() {
        let placement = place_cursor(&crtc(0, 0, 1280, 1024), true, 64, 0);
        assert_eq!(placement.width, Some(63));

        let placement = place_cursor(&crtc(0, 0, 1280, 1024), true, 65, 0);
        assert_eq!(placement.width, Some(64));
    }

    #[test]
    fn dual_head_parks_a_cursor_past_the_frame() {
        let placement = place_cursor(&crtc(0, 0, 1024, 768), true, 1100, 50);
        assert_eq!(
            placement,
            CursorPlacement {
                x: 0,
                y: 768,
                hot_x: 0,
                hot_y: 0,
                width: Some(1),
            }
        );
    }

    #[test]
    fn visibility_rejects_only_diagonal_misses() {
        let c = crtc(1024, 0, 1024, 768);
        assert!(has_visible_cursor(&c, 1100, 100));
        // Entirely left of the viewport but vertically overlapping still counts as visible.
        assert!(has_visible_cursor(&c, 0, 100));

        let c = crtc(1024, 768, 1024, 768);
        assert!(!has_visible_cursor(&c, 0, 0));
        assert!(!has_visible_cursor(&c, 2048, 1536));
        assert!(has_visible_cursor(&c, 2048, 100));
    }

    proptest! {
        #[test]
        fn programmed_coordinates_are_consistent(x in -200i32..4096, y in -200i32..4096) {
            let (px, py, hx, hy) = clamp_position(x, y);
            prop_assert_eq!(px as i64 - hx as i64, x as i64);
            prop_assert_eq!(py as i64 - hy as i64, y as i64);
            prop_assert!(hx == 0 || px == 0);
            prop_assert!(hy == 0 || py == 0);
        }

        #[test]
        fn dual_head_width_stays_in_range(
            x in -100i32..3000,
            y in -100i32..3000,
            cx in 0i32..2048,
            w in 1i32..2048,
        ) {
            let placement = place_cursor(&crtc(cx, 0, w, 768), true, x, y);
            let width = placement.width.unwrap_or(0);
            prop_assert!((1..=MAX_CURSOR_WIDTH).contains(&width));
            if placement.hot_x == 0 && placement.x != 0 && width > 1 {
                prop_assert!((placement.x + width) % 128 != 0);
            }
        }
    }
}
