use uom::si::f64::{Angle, Area, Force, Length};

use super::geometry::Half;

/// Nondimensional force and moment coefficients of one aircraft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcesAndMoments {
    pub wind: WindAxes,
    pub body: BodyAxes,
    pub moment: Moments,
}

/// Force coefficients aligned with the freestream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindAxes {
    pub lift: f64,
    pub drag: f64,
    pub side: f64,
}

/// Force coefficients in body axes (x forward, y right, z down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyAxes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Moment coefficients about the geometry origin.
///
/// Roll and yaw are normalized by span, pitch by chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Reference quantities used to nondimensionalize forces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceGeometry {
    pub area: Area,
    pub chord: Length,
    pub span: Length,
}

impl ReferenceGeometry {
    /// Aspect ratio `b² / S`.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        (self.span * self.span / self.area).value
    }
}

/// Results at one spanwise control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    /// Fraction of the section span, root (0) to tip (1).
    pub span_frac: f64,
    pub chord: Length,
    /// Planform area of the element.
    pub area: Area,
    pub twist: Angle,
    /// Local angle of attack including induced velocity.
    pub alpha: Angle,
    /// Body-axis force on the element.
    pub force_x: Force,
    pub force_y: Force,
    pub force_z: Force,
    pub section_cl: f64,
}

/// Stations of one section half, ordered root to tip.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDistribution {
    pub section: String,
    pub half: Half,
    pub stations: Vec<Station>,
}

/// Per-station results for every section half of an aircraft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distributions {
    pub surfaces: Vec<SurfaceDistribution>,
}

impl Distributions {
    /// Returns the stations of a section half, if present.
    #[must_use]
    pub fn get(&self, section: &str, half: Half) -> Option<&[Station]> {
        self.surfaces
            .iter()
            .find(|surface| surface.section == section && surface.half == half)
            .map(|surface| surface.stations.as_slice())
    }
}
