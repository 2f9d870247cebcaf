//! # Stop deceleration planning
//!
//! Reshapes the target velocities of the lookahead window so the vehicle comes to rest before a
//! commanded stop waypoint. The target at each waypoint is the speed from which the vehicle could
//! stop at the stop point under a constant deceleration, `v = sqrt(2 * a * d)`, capped at the
//! lane's own target so the profile never asks for more speed than the route allows.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::Params;
use comms_if::eqpt::lane::Waypoint;
use util::maths::circular_offset;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The constants shaping a stop profile.
#[derive(Debug, Copy, Clone)]
pub struct DecelProfile {
    /// Units: meters/second^2
    pub max_decel_mss: f64,

    pub safety_offset_wps: usize,

    /// Units: meters
    pub stop_epsilon_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DecelProfile {
    pub fn from_params(params: &Params) -> Self {
        Self {
            max_decel_mss: params.max_decel_mss,
            safety_offset_wps: params.stop_safety_offset_wps,
            stop_epsilon_m: params.stop_epsilon_m,
        }
    }

    /// Find the index within the window at which the vehicle should be at rest.
    ///
    /// Returns `None` if the stop index is not inside the window `[window_start, window_start +
    /// window_len)` (taken around the circular lane), in which case the window is left as it is.
    pub fn stop_rel_index(
        &self,
        stop_abs: usize,
        window_start: usize,
        window_len: usize,
        lane_len: usize,
    ) -> Option<usize> {
        if stop_abs >= lane_len || window_len == 0 {
            return None;
        }

        let offset = circular_offset(window_start, stop_abs, lane_len);
        if offset >= window_len {
            return None;
        }

        Some(offset.saturating_sub(self.safety_offset_wps))
    }

    /// Shape the window's target velocities into a stop at `stop_abs`.
    ///
    /// Returns the shaped window and the relative stop index, or the window unmodified and `None`
    /// if the stop is outside it.
    pub fn shape(
        &self,
        window: Vec<Waypoint>,
        stop_abs: usize,
        window_start: usize,
        lane_len: usize,
    ) -> (Vec<Waypoint>, Option<usize>) {
        match self.stop_rel_index(stop_abs, window_start, window.len(), lane_len) {
            Some(stop_rel) => (self.decelerate(&window, stop_rel), Some(stop_rel)),
            None => (window, None),
        }
    }

    /// Apply the stop profile to `window`, with the vehicle at rest at `stop_rel`.
    ///
    /// Waypoints at or past `stop_rel` get a zero target.
    pub fn decelerate(&self, window: &[Waypoint], stop_rel: usize) -> Vec<Waypoint> {
        let dists = dist_to_stop(window, stop_rel);

        window
            .iter()
            .zip(dists.iter())
            .map(|(wp, dist_m)| {
                let mut vel_ms = (2.0 * self.max_decel_mss * dist_m).sqrt();
                if *dist_m < self.stop_epsilon_m {
                    vel_ms = 0.0;
                }

                Waypoint {
                    position_m: wp.position_m,
                    velocity_ms: vel_ms.min(wp.velocity_ms),
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Arc length along the window from each waypoint to the waypoint at `stop_rel`, zero at and
/// beyond it.
fn dist_to_stop(window: &[Waypoint], stop_rel: usize) -> Vec<f64> {
    let mut dists = vec![0f64; window.len()];
    let stop_rel = stop_rel.min(window.len().saturating_sub(1));

    // Accumulate backwards from the stop point
    for i in (0..stop_rel).rev() {
        dists[i] = dists[i + 1] + window[i].dist_to(&window[i + 1]);
    }

    dists
}

#[cfg(test)]
mod test {
    use super::*;

    fn profile() -> DecelProfile {
        DecelProfile {
            max_decel_mss: 3.0,
            safety_offset_wps: 3,
            stop_epsilon_m: 1.0,
        }
    }

    fn window(n: usize, spacing_m: f64, vel_ms: f64) -> Vec<Waypoint> {
        (0..n)
            .map(|i| Waypoint::new(i as f64 * spacing_m, 0.0, vel_ms))
            .collect()
    }

    #[test]
    fn test_stop_rel_index() {
        let p = profile();

        // Inside the window, offset back by the safety margin
        assert_eq!(p.stop_rel_index(150, 100, 100, 1000), Some(47));

        // Clamped at zero when the stop is right in front
        assert_eq!(p.stop_rel_index(101, 100, 100, 1000), Some(0));

        // Beyond the horizon, behind the vehicle, or off the lane
        assert_eq!(p.stop_rel_index(200, 100, 100, 1000), None);
        assert_eq!(p.stop_rel_index(99, 100, 100, 1000), None);
        assert_eq!(p.stop_rel_index(1000, 100, 100, 1000), None);

        // Windows wrapping past the end of a loop lane
        assert_eq!(p.stop_rel_index(10, 950, 100, 1000), Some(57));
    }

    #[test]
    fn test_profile_monotonic_and_capped() {
        let p = profile();
        let w = window(100, 0.5, 11.0);

        let (shaped, stop_rel) = p.shape(w.clone(), 60, 0, 1000);
        let stop_rel = stop_rel.unwrap();
        assert_eq!(stop_rel, 57);

        for i in 0..stop_rel {
            assert!(shaped[i].velocity_ms >= shaped[i + 1].velocity_ms);
        }
        for (s, o) in shaped.iter().zip(w.iter()) {
            assert!(s.velocity_ms <= o.velocity_ms);
            assert_eq!(s.position_m, o.position_m);
        }

        // Within epsilon (two waypoints at this spacing) of the stop and beyond it everything is
        // zero
        assert_eq!(shaped[stop_rel - 1].velocity_ms, 0.0);
        assert!(shaped[stop_rel - 2].velocity_ms > 0.0);
        assert!(shaped[stop_rel..].iter().all(|wp| wp.velocity_ms == 0.0));

        // Far away the route limit applies
        assert_eq!(shaped[0].velocity_ms, 11.0);
    }

    #[test]
    fn test_profile_values() {
        let p = profile();
        let shaped = p.decelerate(&window(10, 2.0, 20.0), 8);

        // 6 m from the stop: sqrt(2 * 3 * 6) = 6
        assert!((shaped[5].velocity_ms - 6.0).abs() < 1e-9);
        // 2 m from the stop: sqrt(12)
        assert!((shaped[7].velocity_ms - 12f64.sqrt()).abs() < 1e-9);
        assert_eq!(shaped[8].velocity_ms, 0.0);
    }

    #[test]
    fn test_passthrough_outside_window() {
        let p = profile();
        let w = window(100, 1.0, 11.0);
        let (out, stop_rel) = p.shape(w.clone(), 500, 0, 1000);
        assert!(stop_rel.is_none());
        assert_eq!(out, w);
    }
}
