//! Alert policy: a pure threshold comparison.
//!
//! No hysteresis.  A single reading at or above the threshold raises the
//! alert and a single reading below clears it; the loop only suppresses
//! redundant indicator writes.

/// Default CO2-equivalent warning level (ppm).
pub const DEFAULT_CO2EQ_THRESHOLD: u16 = 1500;

/// Decide the alert state for `co2eq`.
///
/// `_current` is accepted so callers can treat the policy as a state
/// transition function; the result does not depend on it.
pub fn decide(co2eq: u16, threshold: u16, _current: bool) -> bool {
    co2eq >= threshold
}
