//! Millisecond clock abstraction

/// Free-running millisecond counter
///
/// The counter wraps at `u32::MAX`; consumers compare deadlines with
/// wrapping arithmetic.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch (usually boot)
    fn now_ms(&self) -> u32;
}

/// Check whether `deadline` has been reached at `now`
///
/// Valid as long as the two instants are less than ~24 days apart.
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}
