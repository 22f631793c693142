//! CFL-bounded time step.

use physkit_types::Scalar;

/// `min(max_dt, cfl_num · min_cell_edge / (max_speed + sound_speed))`.
///
/// A zero (or otherwise non-positive) denominator leaves only `max_dt`.
///
/// ```
/// use physkit_mpm::cfl::cfl_time_step;
/// assert!((cfl_time_step(1.0, 0.5, 0.01, 1.0, 0.0) - 0.005).abs() < 1e-15);
/// assert_eq!(cfl_time_step(0.1, 0.5, 0.01, 0.0, 0.0), 0.1);
/// ```
pub fn cfl_time_step(
    max_dt: Scalar,
    cfl_num: Scalar,
    min_cell_edge: Scalar,
    max_speed: Scalar,
    sound_speed: Scalar,
) -> Scalar {
    let denominator = max_speed + sound_speed;
    if denominator > 0.0 {
        max_dt.min(cfl_num * min_cell_edge / denominator)
    } else {
        max_dt
    }
}
