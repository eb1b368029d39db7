use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rhd_display::cursor::regs::{
    CURSOR_CONTROL_DISABLE, CURSOR_CONTROL_ENABLE, CURSOR_REG_STRIDE, CURSOR_UPDATE_LOCK,
    D1CUR_CONTROL, D1CUR_HOT_SPOT, D1CUR_POSITION, D1CUR_SIZE, D1CUR_SURFACE_ADDRESS, D1CUR_UPDATE,
};
use rhd_display::{crtc_pair, CrtcPair, CursorController, PreparedCursor};
use rhd_mmio::{FbAllocator, RegisterFile, RegisterWrite, VecVram};

const FB_INT: u32 = 0x8000_0000;
const D2: u32 = CURSOR_REG_STRIDE;

fn setup() -> (CursorController, RegisterFile, VecVram) {
    let mut allocator = FbAllocator::new(0x10_0000, 0x10_0000);
    let cursors = CursorController::new(0, FB_INT, &mut allocator).unwrap();
    (cursors, RegisterFile::new(), VecVram::new(0x20_0000))
}

fn dual_head() -> CrtcPair {
    let mut crtcs = crtc_pair(0);
    crtcs[0].activate(0, 0, 1024, 768);
    crtcs[1].activate(1024, 0, 1280, 1024);
    crtcs
}

/// Every register group must sit between a lock and an unlock of the same cursor.
fn assert_lock_pairing(writes: &[RegisterWrite]) {
    let mut held = [false; 2];
    for w in writes {
        let index = usize::from(w.offset >= D1CUR_CONTROL + D2);
        let reg = w.offset - index as u32 * D2;
        if reg == D1CUR_UPDATE {
            let lock = w.value == CURSOR_UPDATE_LOCK;
            assert_ne!(held[index], lock, "unbalanced lock on cursor {index}");
            held[index] = lock;
        } else {
            assert!(held[index], "write to {:#x} outside the update lock", w.offset);
        }
    }
    assert_eq!(held, [false, false]);
}

#[test]
fn show_and_hide_toggle_enable_under_lock() {
    let (mut cursors, mut regs, _) = setup();
    let crtcs = dual_head();

    cursors.show(&mut regs, &crtcs);
    assert_eq!(regs.peek(D1CUR_CONTROL), CURSOR_CONTROL_ENABLE);
    // (0,0) is more than a cursor left of CRTC 2 but overlaps it vertically.
    assert_eq!(regs.peek(D1CUR_CONTROL + D2), CURSOR_CONTROL_ENABLE);

    cursors.hide(&mut regs, &crtcs);
    assert_eq!(regs.peek(D1CUR_CONTROL), CURSOR_CONTROL_DISABLE);
    assert_eq!(regs.peek(D1CUR_CONTROL + D2), CURSOR_CONTROL_DISABLE);
    assert_lock_pairing(regs.writes());
}

#[test]
fn inactive_crtcs_are_left_alone() {
    let (mut cursors, mut regs, _) = setup();
    let mut crtcs = dual_head();
    crtcs[1].deactivate();

    cursors.show(&mut regs, &crtcs);
    cursors.set_position(&mut regs, &crtcs, 10, 10);
    assert_eq!(regs.writes_to(D1CUR_UPDATE + D2).count(), 0);
}

#[test]
fn dual_head_move_trims_the_cursor_at_the_frame_edge() {
    let (mut cursors, mut regs, _) = setup();
    let crtcs = dual_head();

    cursors.crtc_set_position(&mut regs, &crtcs, 0, 1000, 100);

    assert_eq!(
        regs.writes(),
        &[
            RegisterWrite {
                offset: D1CUR_UPDATE,
                value: CURSOR_UPDATE_LOCK,
            },
            RegisterWrite {
                offset: D1CUR_SIZE,
                value: (22 << 16) | 63,
            },
            RegisterWrite {
                offset: D1CUR_POSITION,
                value: (1000 << 16) | 100,
            },
            RegisterWrite {
                offset: D1CUR_HOT_SPOT,
                value: 0,
            },
            RegisterWrite {
                offset: D1CUR_UPDATE,
                value: 0,
            },
        ]
    );
}

#[test]
fn dual_head_parks_a_cursor_left_of_nothing() {
    let (mut cursors, mut regs, _) = setup();
    let crtcs = dual_head();

    cursors.crtc_set_position(&mut regs, &crtcs, 0, 1030, 10);

    assert_eq!(regs.peek(D1CUR_SIZE), 63);
    assert_eq!(regs.peek(D1CUR_POSITION), 768);
    assert_eq!(regs.peek(D1CUR_HOT_SPOT), 0);
}

#[test]
fn bitmap_cursor_lands_in_vram_with_opaque_colors() {
    let (mut cursors, mut regs, mut vram) = setup();
    let crtcs = dual_head();

    cursors.crtc_set_colors(0x0000_0000, 0x00ff_ffff);
    // 2x1 cursor: pixel 0 foreground, pixel 1 background.
    let bits = CursorController::realize(2, 1, &[0b01, 0, 0, 0], &[0b11, 0, 0, 0]).unwrap();
    cursors.load_bitmap(&mut regs, &mut vram, &crtcs, bits);

    for index in 0..2 {
        let cursor = cursors.cursor(index);
        let base = cursor.base();
        assert_eq!(vram.read_u32(base), Some(0xffff_ffff));
        assert_eq!(vram.read_u32(base + 4), Some(0xff00_0000));
        assert_eq!(vram.read_u32(base + 8), Some(0));
        assert_eq!(
            regs.peek(D1CUR_SURFACE_ADDRESS + cursor.reg_offset()),
            FB_INT + base
        );
        assert_eq!(regs.peek(D1CUR_SIZE + cursor.reg_offset()), 0x003f_003f);
    }
    assert_lock_pairing(regs.writes());
}

#[test]
fn save_restore_survives_a_moved_framebuffer_mapping() {
    let (mut cursors, mut regs, _) = setup();
    let crtcs = dual_head();
    regs.set(D1CUR_CONTROL, CURSOR_CONTROL_ENABLE);
    regs.set(D1CUR_SURFACE_ADDRESS, FB_INT + 0x10_0000);
    regs.set(D1CUR_POSITION, 0x0040_0030);
    regs.set(D1CUR_HOT_SPOT, 0x0002_0003);
    regs.set(D1CUR_SIZE, 0x003f_003f);

    cursors.save(&mut regs, &crtcs);
    for reg in [D1CUR_CONTROL, D1CUR_SURFACE_ADDRESS, D1CUR_POSITION, D1CUR_HOT_SPOT, D1CUR_SIZE] {
        regs.set(reg, 0);
    }
    cursors.restore(&mut regs, &crtcs);

    assert_eq!(regs.peek(D1CUR_CONTROL), CURSOR_CONTROL_ENABLE);
    assert_eq!(regs.peek(D1CUR_SURFACE_ADDRESS), FB_INT + 0x10_0000);
    assert_eq!(regs.peek(D1CUR_POSITION), 0x0040_0030);
    assert_eq!(regs.peek(D1CUR_HOT_SPOT), 0x0002_0003);
    assert_eq!(regs.peek(D1CUR_SIZE), 0x003f_003f);
    assert_lock_pairing(regs.writes());
}

#[test]
fn restore_without_save_only_toggles_the_lock() {
    let (mut cursors, mut regs, _) = setup();
    let crtcs = dual_head();
    cursors.restore(&mut regs, &crtcs);
    assert!(regs
        .writes()
        .iter()
        .all(|w| w.offset == D1CUR_UPDATE || w.offset == D1CUR_UPDATE + D2));
}

#[derive(Debug, Clone)]
enum Op {
    Show,
    Hide,
    Move(i32, i32),
    Colors(u32, u32),
    Argb(u32, u32),
    Save,
    Restore,
    Reload,
    HostSet(bool),
    HostDraw(i32, i32, bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Show),
        Just(Op::Hide),
        (-128i32..2400, -128i32..1100).prop_map(|(x, y)| Op::Move(x, y)),
        (any::<u32>(), any::<u32>()).prop_map(|(bg, fg)| Op::Colors(bg, fg)),
        (0u32..=64, 0u32..=64).prop_map(|(w, h)| Op::Argb(w, h)),
        Just(Op::Save),
        Just(Op::Restore),
        Just(Op::Reload),
        any::<bool>().prop_map(Op::HostSet),
        (-128i32..2400, -128i32..1100, any::<bool>())
            .prop_map(|(x, y, visible)| Op::HostDraw(x, y, visible)),
    ]
}

proptest! {
    #[test]
    fn every_update_is_bracketed_by_the_lock(
        ops in prop::collection::vec(op(), 1..32),
        second_active in any::<bool>(),
    ) {
        let (mut cursors, mut regs, mut vram) = setup();
        let mut crtcs = dual_head();
        if !second_active {
            crtcs[1].deactivate();
        }

        for op in ops {
            match op {
                Op::Show => cursors.show(&mut regs, &crtcs),
                Op::Hide => cursors.hide(&mut regs, &crtcs),
                Op::Move(x, y) => cursors.set_position(&mut regs, &crtcs, x, y),
                Op::Colors(bg, fg) => cursors.set_colors(&mut regs, &mut vram, &crtcs, bg, fg),
                Op::Argb(w, h) => {
                    let image = vec![0x8080_8080; (w * h) as usize];
                    prop_assert!(cursors
                        .load_argb(&mut regs, &mut vram, &crtcs, w, h, &image)
                        .is_ok());
                }
                Op::Save => cursors.save(&mut regs, &crtcs),
                Op::Restore => cursors.restore(&mut regs, &crtcs),
                Op::Reload => cursors.reload(&mut regs, &mut vram, &crtcs),
                Op::HostSet(with_image) => {
                    let prepared = PreparedCursor {
                        width: 16,
                        height: 16,
                        pixels: vec![0xff00_ff00; 256],
                    };
                    cursors.set_hardware_cursor(
                        &mut regs,
                        &mut vram,
                        &crtcs,
                        with_image.then_some(&prepared),
                        &|px| px,
                    );
                }
                Op::HostDraw(x, y, visible) => {
                    cursors.draw_hardware_cursor(&mut regs, &crtcs, x, y, visible);
                }
            }
        }

        // Save only reads; everything else must be balanced.
        assert_lock_pairing(regs.writes());
        let (bg, fg) = cursors.colors();
        prop_assert!(bg == 0 || bg >> 24 == 0xff);
        prop_assert!(fg == 0 || fg >> 24 == 0xff);
    }
}
