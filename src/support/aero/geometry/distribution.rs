use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A spanwise distribution of a section parameter.
///
/// Either a single value applied over the whole section or a piecewise-linear
/// table of `[span_frac, value]` rows, with `span_frac` running from the
/// section root (0) to its tip (1).
/// Outside the table the end values are held constant.
///
/// In JSON a constant is a bare number and a table is a nested array:
///
/// ```
/// use twine_twist::support::aero::geometry::Distribution;
///
/// let d: Distribution = serde_json::from_str("[[0.0, 1.0], [1.0, 0.5]]").unwrap();
/// assert_eq!(d.at(0.5), 0.75);
///
/// let c: Distribution = serde_json::from_str("2.0").unwrap();
/// assert_eq!(c.at(0.3), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distribution {
    Constant(f64),
    Table(Vec<[f64; 2]>),
}

/// Reasons a [`Distribution`] table is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DistributionError {
    #[error("table has no rows")]
    Empty,
    #[error("table contains a non-finite entry")]
    NonFinite,
    #[error("table span fractions must be strictly increasing")]
    NotIncreasing,
}

impl Default for Distribution {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl Distribution {
    /// Builds a table from paired span fractions and values.
    ///
    /// Extra entries in the longer slice are ignored.
    #[must_use]
    pub fn from_pairs(span_fracs: &[f64], values: &[f64]) -> Self {
        Self::Table(
            span_fracs
                .iter()
                .zip(values)
                .map(|(&s, &v)| [s, v])
                .collect(),
        )
    }

    /// Returns the value at `span_frac` by linear interpolation.
    #[must_use]
    pub fn at(&self, span_frac: f64) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Table(rows) => interpolate(rows, span_frac),
        }
    }

    /// Returns the smallest value the distribution takes.
    #[must_use]
    pub fn min(&self) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Table(rows) => rows.iter().map(|row| row[1]).fold(f64::INFINITY, f64::min),
        }
    }

    /// Checks that the distribution is usable for interpolation.
    ///
    /// # Errors
    ///
    /// Returns a [`DistributionError`] for empty tables, non-finite entries,
    /// or span fractions that are not strictly increasing.
    pub fn validate(&self) -> Result<(), DistributionError> {
        match self {
            Self::Constant(value) if value.is_finite() => Ok(()),
            Self::Constant(_) => Err(DistributionError::NonFinite),
            Self::Table(rows) => {
                if rows.is_empty() {
                    return Err(DistributionError::Empty);
                }
                if rows.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(DistributionError::NonFinite);
                }
                if rows.windows(2).any(|pair| pair[1][0] <= pair[0][0]) {
                    return Err(DistributionError::NotIncreasing);
                }
                Ok(())
            }
        }
    }
}

fn interpolate(rows: &[[f64; 2]], x: f64) -> f64 {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return f64::NAN;
    };

    if x <= first[0] {
        return first[1];
    }
    if x >= last[0] {
        return last[1];
    }

    // The table is increasing, so exactly one interval brackets x.
    let upper = rows.partition_point(|row| row[0] <= x);
    let [x0, y0] = rows[upper - 1];
    let [x1, y1] = rows[upper];
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
