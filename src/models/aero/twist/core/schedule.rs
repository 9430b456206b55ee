use thiserror::Error;

use crate::support::aero::geometry::Distribution;

/// Twist angles at fixed span stations of the design section.
///
/// Stations are fractions of the semispan, strictly increasing from exactly
/// 0 (root) to exactly 1 (tip). Twist is in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct TwistSchedule {
    stations: Vec<f64>,
    twist: Vec<f64>,
}

/// Reasons a [`TwistSchedule`] cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("at least 2 stations are required, got {0}")]
    TooFewStations(usize),

    #[error("{stations} stations but {twist} twist values")]
    LengthMismatch { stations: usize, twist: usize },

    #[error("stations must increase strictly from 0 to 1")]
    InvalidStations,

    #[error("twist values must be finite")]
    NonFiniteTwist,
}

impl TwistSchedule {
    /// Creates a schedule from explicit stations and twist angles.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if the stations are not a valid layout of
    /// the semispan or the lengths differ.
    pub fn new(stations: Vec<f64>, twist: Vec<f64>) -> Result<Self, ScheduleError> {
        if stations.len() < 2 {
            return Err(ScheduleError::TooFewStations(stations.len()));
        }
        if stations.len() != twist.len() {
            return Err(ScheduleError::LengthMismatch {
                stations: stations.len(),
                twist: twist.len(),
            });
        }

        #[allow(clippy::float_cmp)]
        let ends_ok = stations.first() == Some(&0.0) && stations.last() == Some(&1.0);
        if !ends_ok || stations.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(ScheduleError::InvalidStations);
        }
        if twist.iter().any(|t| !t.is_finite()) {
            return Err(ScheduleError::NonFiniteTwist);
        }

        Ok(Self { stations, twist })
    }

    /// Creates an untwisted schedule with `n` evenly spaced stations.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::TooFewStations`] if `n < 2`.
    pub fn zeros(n: usize) -> Result<Self, ScheduleError> {
        let stations = evenly_spaced(n)?;
        Ok(Self {
            twist: vec![0.0; n],
            stations,
        })
    }

    /// Returns a schedule on the same stations with new twist angles.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if the length differs or a value is not finite.
    pub fn with_twist(&self, twist: Vec<f64>) -> Result<Self, ScheduleError> {
        Self::new(self.stations.clone(), twist)
    }

    #[must_use]
    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    #[must_use]
    pub fn twist(&self) -> &[f64] {
        &self.twist
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Twist table for the design section.
    #[must_use]
    pub fn to_distribution(&self) -> Distribution {
        Distribution::from_pairs(&self.stations, &self.twist)
    }
}

/// Returns `n` evenly spaced points over `[0, 1]`, with exact end points.
///
/// # Errors
///
/// Returns [`ScheduleError::TooFewStations`] if `n < 2`.
pub fn evenly_spaced(n: usize) -> Result<Vec<f64>, ScheduleError> {
    if n < 2 {
        return Err(ScheduleError::TooFewStations(n));
    }

    #[allow(clippy::cast_precision_loss)]
    let last = (n - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    let mut stations: Vec<f64> = (0..n).map(|i| i as f64 / last).collect();
    stations[n - 1] = 1.0;
    Ok(stations)
}
