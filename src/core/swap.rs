use std::hint;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Observable swap state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapState {
    Idle,
    SwapPending,
}

/// Which of the two frames each role points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roles {
    pub draw: usize,
    pub refresh: usize,
}

/// Draw/refresh role assignment plus the pending-swap flag.
///
/// Roles live in a single atomic draw index; the refresh index is always its
/// complement, so both roles can never name the same frame. The index only
/// changes inside [`perform_swap`](Self::perform_swap), which publishes it
/// with release ordering before clearing the pending flag.
#[derive(Debug)]
pub struct SwapController {
    draw_index: AtomicU8,
    pending: AtomicBool,
}

impl SwapController {
    pub fn new() -> Self {
        Self {
            draw_index: AtomicU8::new(0),
            pending: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SwapState {
        if self.is_swap_pending() {
            SwapState::SwapPending
        } else {
            SwapState::Idle
        }
    }

    #[inline]
    pub fn is_swap_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    #[inline]
    pub fn roles(&self) -> Roles {
        let draw = self.draw_index.load(Ordering::Acquire) as usize;
        Roles {
            draw,
            refresh: draw ^ 1,
        }
    }

    /// Spin until no swap is pending
    #[inline]
    pub fn wait_idle(&self) {
        while self.pending.load(Ordering::Acquire) {
            hint::spin_loop();
        }
    }

    /// Application side: wait out any earlier swap, then mark a new one pending
    pub fn request(&self) {
        self.wait_idle();
        self.pending.store(true, Ordering::Release);
    }

    /// Refresh side: exchange roles if a swap is pending. Returns true if it did.
    pub fn perform_swap(&self) -> bool {
        if !self.pending.load(Ordering::Acquire) {
            return false;
        }

        let draw = self.draw_index.load(Ordering::Relaxed);
        self.draw_index.store(draw ^ 1, Ordering::Release);
        self.pending.store(false, Ordering::Release);
        true
    }
}

impl Default for SwapController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_drawing_into_first_frame() {
        let swap = SwapController::new();
        assert_eq!(swap.state(), SwapState::Idle);
        assert_eq!(swap.roles(), Roles { draw: 0, refresh: 1 });
    }

    #[test]
    fn perform_without_request_is_noop() {
        let swap = SwapController::new();
        assert!(!swap.perform_swap());
        assert_eq!(swap.roles().draw, 0);
    }

    #[test]
    fn request_then_perform_exchanges_roles() {
        let swap = SwapController::new();
        swap.request();
        assert_eq!(swap.state(), SwapState::SwapPending);
        assert_eq!(swap.roles().draw, 0);

        assert!(swap.perform_swap());
        assert_eq!(swap.state(), SwapState::Idle);
        assert_eq!(swap.roles(), Roles { draw: 1, refresh: 0 });
    }

    #[test]
    fn roles_never_collide() {
        let swap = SwapController::new();
        for i in 0..10 {
            if i % 3 != 0 {
                swap.request();
            }
            swap.perform_swap();
            let roles = swap.roles();
            assert_ne!(roles.draw, roles.refresh);
            assert!(roles.draw < 2 && roles.refresh < 2);
        }
    }
}
