use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use matrix_compositor::core::{LayerBuilder, SwapController, SwapState};
use matrix_compositor::traits::RefreshLayer;
use matrix_compositor::types::{Rgb24, Rgb48};

// ============================================================================
// Role Invariant Tests
// ============================================================================

#[test]
fn test_roles_are_always_complementary() {
    let swap = SwapController::new();
    let pattern = [true, false, true, true, false, false, true];

    for requested in pattern {
        if requested {
            swap.request();
        }
        let before = swap.roles();
        let swapped = swap.perform_swap();
        let after = swap.roles();

        assert_ne!(after.draw, after.refresh);
        if swapped {
            assert_eq!(after.draw, before.refresh);
            assert_eq!(after.refresh, before.draw);
        } else {
            assert_eq!(after, before);
        }
        assert_eq!(swap.state(), SwapState::Idle);
    }
}

#[test]
fn test_swap_waits_for_next_tick() {
    let (mut writer, mut refresher) = LayerBuilder::<Rgb24>::new(4, 4).build().unwrap();

    writer.swap_buffers(false);
    assert!(writer.is_swap_pending());
    assert!(RefreshLayer::<Rgb24>::is_layer_changed(&refresher));

    refresher.tick();
    assert!(!writer.is_swap_pending());
    assert!(!RefreshLayer::<Rgb24>::is_layer_changed(&refresher));

    // No request, no swap
    assert!(!refresher.perform_swap());
}

// ============================================================================
// Swap Correctness Tests
// ============================================================================

#[test]
fn test_drawn_pixel_visible_after_swap() {
    let (mut writer, mut refresher) = LayerBuilder::<Rgb48>::new(8, 4).build().unwrap();
    let color = Rgb48::new(1000, 2000, 3000);

    writer.draw_pixel(5, 2, color);
    writer.swap_buffers(false);
    refresher.tick();

    let row = refresher.refresh_row(2).unwrap();
    assert_eq!(row[5], color);
    assert!(row.iter().enumerate().all(|(x, p)| x == 5 || *p == Rgb48::BLACK));

    // The new draw buffer is the old refresh buffer, still black
    assert_eq!(writer.read_pixel(5, 2), Rgb48::BLACK);
}

#[test]
fn test_copy_swap_leaves_identical_buffers() {
    let (mut writer, mut refresher) = LayerBuilder::<Rgb24>::new(6, 3).build().unwrap();
    for x in 0..6 {
        writer.draw_fast_vline(x, 0, 2, Rgb24::new(x as u8 * 40, 7, 200));
    }

    let stop = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                refresher.tick();
                thread::yield_now();
            }
        });

        writer.swap_buffers(true);
        stop.store(true, Ordering::Release);
    });

    let displayed: Vec<Rgb24> = (0..3).flat_map(|y| refresher.refresh_row(y).unwrap().to_vec()).collect();
    assert_eq!(
        writer.back_buffer_bytes(),
        bytemuck::cast_slice::<Rgb24, u8>(&displayed)
    );
    assert_eq!(writer.read_pixel(5, 1), Rgb24::new(200, 7, 200));
}

#[test]
fn test_drawing_after_request_waits_for_swap() {
    let (mut writer, mut refresher) = LayerBuilder::<Rgb24>::new(2, 2).build().unwrap();
    writer.fill_screen(Rgb24::WHITE);
    writer.swap_buffers(false);

    let stop = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                refresher.tick();
                thread::yield_now();
            }
        });

        // Blocks until the pending swap is done, so it lands in the new draw buffer
        writer.draw_pixel(0, 0, Rgb24::new(1, 2, 3));
        stop.store(true, Ordering::Release);
    });

    assert_eq!(refresher.refresh_row(0).unwrap(), &[Rgb24::WHITE; 2]);
    assert_eq!(writer.read_pixel(0, 0), Rgb24::new(1, 2, 3));
}

#[test]
fn test_many_frames_through_refresh_thread() {
    let (mut writer, mut refresher) = LayerBuilder::<Rgb24>::new(4, 1).build().unwrap();
    let stop = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                refresher.tick();
                if let Some(row) = refresher.refresh_row(0) {
                    // Every frame is drawn in a single color
                    assert!(row.iter().all(|p| *p == row[0]));
                }
                thread::yield_now();
            }
        });

        for frame in 0..200u32 {
            writer.fill_screen(Rgb24::new(frame as u8, 0, 0));
            writer.swap_buffers(false);
        }
        writer.copy_refresh_to_draw();
        stop.store(true, Ordering::Release);
    });

    assert_eq!(refresher.refresh_row(0).unwrap()[0], Rgb24::new(199, 0, 0));
}
