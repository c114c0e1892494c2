//! Road surface profiles used to place the truck off the bridge.

/// Elevation of the road centreline along the span.
pub trait Roadway {
    /// Road surface elevation at `x`, metres.
    fn centerline_elevation(&self, x: f64) -> f64;
}

impl<F> Roadway for F
where
    F: Fn(f64) -> f64,
{
    fn centerline_elevation(&self, x: f64) -> f64 {
        self(x)
    }
}

/// A level road.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatRoadway {
    /// Constant surface elevation.
    pub elevation: f64,
}

impl FlatRoadway {
    /// A level road at `elevation`.
    #[must_use]
    pub const fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl Roadway for FlatRoadway {
    fn centerline_elevation(&self, _x: f64) -> f64 {
        self.elevation
    }
}

/// A road surveyed at evenly spaced stations.
///
/// Between stations the surface is linear. Beyond the first and last
/// station it stays level.
///
/// # Examples
/// ```
/// use trussbridge::{PolylineRoadway, Roadway};
///
/// let road = PolylineRoadway::new(0.0, 4.0, vec![0.0, 1.0, 1.0]);
/// assert_eq!(road.centerline_elevation(2.0), 0.5);
/// assert_eq!(road.centerline_elevation(-10.0), 0.0);
/// assert_eq!(road.centerline_elevation(100.0), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PolylineRoadway {
    /// Position of the first station.
    x_start: f64,
    /// Distance between stations.
    spacing: f64,
    /// Elevation at each station.
    elevations: Vec<f64>,
}

impl PolylineRoadway {
    /// Stations starting at `x_start`, `spacing` apart.
    ///
    /// An empty profile is treated as a level road at zero.
    #[must_use]
    pub fn new(x_start: f64, spacing: f64, elevations: Vec<f64>) -> Self {
        Self {
            x_start,
            spacing,
            elevations,
        }
    }
}

impl Roadway for PolylineRoadway {
    fn centerline_elevation(&self, x: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.elevations.first(), self.elevations.last()) else {
            return 0.0;
        };
        let s = (x - self.x_start) / self.spacing;
        if s.is_nan() || s <= 0.0 {
            return first;
        }
        let last_station = (self.elevations.len() - 1) as f64;
        if s >= last_station {
            return last;
        }
        let i = s.floor() as usize;
        let t = s - i as f64;
        (1.0 - t) * self.elevations[i] + t * self.elevations[i + 1]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn closures_are_roadways() {
        let ramp = |x: f64| 0.1 * x;
        assert_relative_eq!(ramp.centerline_elevation(20.0), 2.0);
        assert_relative_eq!(FlatRoadway::new(-0.8).centerline_elevation(7.0), -0.8);
    }

    #[test]
    fn polyline_interpolates_between_stations() {
        let road = PolylineRoadway::new(-8.0, 4.0, vec![2.0, 0.0, 0.0, 4.0]);
        assert_relative_eq!(road.centerline_elevation(-8.0), 2.0);
        assert_relative_eq!(road.centerline_elevation(-6.0), 1.0);
        assert_relative_eq!(road.centerline_elevation(0.0), 0.0);
        assert_relative_eq!(road.centerline_elevation(3.0), 3.0);
        assert_relative_eq!(road.centerline_elevation(4.0), 4.0);
        assert_relative_eq!(road.centerline_elevation(40.0), 4.0);
        assert_relative_eq!(PolylineRoadway::new(0.0, 1.0, Vec::new()).centerline_elevation(3.0), 0.0);
    }
}
