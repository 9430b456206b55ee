//! Wing geometry descriptions.
//!
//! A [`WingGeometrySpec`] is a typed mapping from section name to
//! [`SectionSpec`]. It deserializes from the JSON layout commonly used by
//! lifting-line tools:
//!
//! ```
//! use twine_twist::support::aero::geometry::{UnitSystem, WingGeometrySpec};
//!
//! let wing: WingGeometrySpec = serde_json::from_str(r#"{
//!     "units": "English",
//!     "wings": {
//!         "design_section": {
//!             "ID": 1,
//!             "side": "both",
//!             "is_main": true,
//!             "semispan": 6.0,
//!             "chord": 1.0,
//!             "grid": { "N": 40 }
//!         }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(wing.units, UnitSystem::English);
//! assert!(wing.design_section().is_ok());
//! ```

mod distribution;

pub use distribution::{Distribution, DistributionError};

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{f64::Length, length::foot, length::meter};

/// Name of the section whose twist is optimized.
pub const DESIGN_SECTION: &str = "design_section";

/// Complete geometry of one wing, possibly made of several sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingGeometrySpec {
    /// Length unit used by every section dimension.
    #[serde(default)]
    pub units: UnitSystem,

    /// Sections keyed by name.
    #[serde(rename = "wings")]
    pub sections: BTreeMap<String, SectionSpec>,
}

/// Length unit of a geometry description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Lengths in meters.
    #[default]
    #[serde(rename = "SI")]
    Si,

    /// Lengths in feet.
    English,
}

impl UnitSystem {
    /// Converts a length given in this unit system into a quantity.
    #[must_use]
    pub fn length(self, value: f64) -> Length {
        match self {
            Self::Si => Length::new::<meter>(value),
            Self::English => Length::new::<foot>(value),
        }
    }
}

/// Geometry of a single wing section.
///
/// Span fractions in every [`Distribution`] run from the section root (0) to
/// its tip (1). Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Identifier referenced by [`ConnectTo`].
    #[serde(rename = "ID")]
    pub id: u32,

    /// Which halves of the wing this section appears on.
    #[serde(default)]
    pub side: Side,

    /// Whether this section contributes to the reference geometry.
    #[serde(default)]
    pub is_main: bool,

    /// Attachment to another section; `None` places the root at the origin.
    #[serde(default)]
    pub connect_to: Option<ConnectTo>,

    /// Semispan measured in the spanwise-vertical plane.
    pub semispan: f64,

    #[serde(default = "unit_chord")]
    pub chord: Distribution,

    #[serde(default)]
    pub twist: Distribution,

    #[serde(default)]
    pub sweep: Distribution,

    #[serde(default)]
    pub dihedral: Distribution,

    #[serde(default)]
    pub airfoil: Airfoil,

    #[serde(default)]
    pub grid: Grid,
}

fn unit_chord() -> Distribution {
    Distribution::Constant(1.0)
}

/// Halves of the wing on which a section is mirrored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Both,
    Right,
    Left,
}

/// One half of a mirrored wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Half {
    Right,
    Left,
}

impl Side {
    /// Halves on which the section is present.
    #[must_use]
    pub fn halves(self) -> &'static [Half] {
        match self {
            Self::Both => &[Half::Right, Half::Left],
            Self::Right => &[Half::Right],
            Self::Left => &[Half::Left],
        }
    }
}

/// Attachment of a section to another section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectTo {
    /// Identifier of the parent section.
    #[serde(rename = "ID")]
    pub id: u32,

    /// End of the parent where this section's root is placed.
    #[serde(default)]
    pub location: Location,
}

/// End of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Root,
    #[default]
    Tip,
}

/// Linear section lift model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Airfoil {
    /// Lift slope per radian.
    #[serde(default = "thin_airfoil_slope")]
    pub cl_alpha: f64,

    /// Zero-lift angle of attack in degrees.
    #[serde(default)]
    pub alpha_l0: f64,
}

fn thin_airfoil_slope() -> f64 {
    std::f64::consts::TAU
}

impl Default for Airfoil {
    fn default() -> Self {
        Self {
            cl_alpha: thin_airfoil_slope(),
            alpha_l0: 0.0,
        }
    }
}

/// Spanwise discretization of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Number of spanwise elements per half.
    #[serde(rename = "N", default = "default_grid_count")]
    pub n: usize,

    #[serde(default)]
    pub clustering: Clustering,
}

fn default_grid_count() -> usize {
    40
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            n: default_grid_count(),
            clustering: Clustering::default(),
        }
    }
}

/// Node spacing along a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clustering {
    /// Nodes clustered toward both the root and the tip.
    #[default]
    Cosine,
    /// Evenly spaced nodes.
    Linear,
}

impl Grid {
    /// Returns the `n + 1` node span fractions, from 0 to 1 inclusive.
    #[must_use]
    pub fn nodes(&self) -> Vec<f64> {
        let n = self.n.max(1);
        #[allow(clippy::cast_precision_loss)]
        let nodes = (0..=n).map(|k| {
            let t = k as f64 / n as f64;
            match self.clustering {
                Clustering::Cosine => 0.5 * (1.0 - (std::f64::consts::PI * t).cos()),
                Clustering::Linear => t,
            }
        });
        let mut nodes: Vec<f64> = nodes.collect();
        nodes[0] = 0.0;
        nodes[n] = 1.0;
        nodes
    }

    /// Returns the `n` control point span fractions, one inside each element.
    ///
    /// Cosine grids place each control point at the midpoint angle of its
    /// element, not halfway between its nodes.
    #[must_use]
    pub fn control_points(&self) -> Vec<f64> {
        let n = self.n.max(1);
        #[allow(clippy::cast_precision_loss)]
        (0..n)
            .map(|k| {
                let t = (k as f64 + 0.5) / n as f64;
                match self.clustering {
                    Clustering::Cosine => 0.5 * (1.0 - (std::f64::consts::PI * t).cos()),
                    Clustering::Linear => t,
                }
            })
            .collect()
    }
}

/// Errors describing an unusable geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("the wing must have a section named 'design_section'")]
    MissingDesignSection,

    #[error("section '{section}' connects to unknown or cyclic section ID {id}")]
    UnknownConnection { section: String, id: u32 },

    #[error("section ID {id} is used more than once")]
    DuplicateId { id: u32 },

    #[error("the wing has no main section")]
    NoMainSection,

    #[error("section '{section}': {reason}")]
    InvalidSection {
        section: String,
        reason: &'static str,
    },

    #[error("section '{section}' {field} distribution is invalid")]
    InvalidDistribution {
        section: String,
        field: &'static str,
        #[source]
        source: DistributionError,
    },
}

impl WingGeometrySpec {
    /// Returns the section whose twist is optimized.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MissingDesignSection`] if no section is named
    /// [`DESIGN_SECTION`].
    pub fn design_section(&self) -> Result<&SectionSpec, GeometryError> {
        self.sections
            .get(DESIGN_SECTION)
            .ok_or(GeometryError::MissingDesignSection)
    }

    /// Returns a copy of this geometry with the design section twist replaced.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MissingDesignSection`] if no section is named
    /// [`DESIGN_SECTION`].
    pub fn with_design_twist(&self, twist: Distribution) -> Result<Self, GeometryError> {
        let mut geometry = self.clone();
        geometry
            .sections
            .get_mut(DESIGN_SECTION)
            .ok_or(GeometryError::MissingDesignSection)?
            .twist = twist;
        Ok(geometry)
    }

    /// Checks every invariant a solver relies on.
    ///
    /// The design section is not required here; see [`Self::design_section`].
    ///
    /// # Errors
    ///
    /// Returns the first [`GeometryError`] found.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (name, section) in &self.sections {
            section.validate(name)?;
        }

        if !self.sections.values().any(|section| section.is_main) {
            return Err(GeometryError::NoMainSection);
        }

        self.build_order().map(|_| ())
    }

    /// Orders sections so every parent precedes the sections attached to it.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate IDs or connections that cannot be
    /// resolved, including cycles.
    pub fn build_order(&self) -> Result<Vec<(&str, &SectionSpec)>, GeometryError> {
        let mut by_id = HashMap::with_capacity(self.sections.len());
        for section in self.sections.values() {
            if by_id.insert(section.id, section).is_some() {
                return Err(GeometryError::DuplicateId { id: section.id });
            }
        }

        let mut placed: Vec<u32> = Vec::with_capacity(self.sections.len());
        let mut order = Vec::with_capacity(self.sections.len());

        while order.len() < self.sections.len() {
            let before = order.len();
            for (name, section) in &self.sections {
                if placed.contains(&section.id) {
                    continue;
                }
                let ready = section
                    .connect_to
                    .is_none_or(|parent| placed.contains(&parent.id));
                if ready {
                    placed.push(section.id);
                    order.push((name.as_str(), section));
                }
            }

            if order.len() == before {
                // Nothing could be placed, so some connection never resolves.
                let (name, section) = self
                    .sections
                    .iter()
                    .find(|(_, section)| !placed.contains(&section.id))
                    .ok_or(GeometryError::NoMainSection)?;
                return Err(GeometryError::UnknownConnection {
                    section: name.clone(),
                    id: section.connect_to.map_or(section.id, |parent| parent.id),
                });
            }
        }

        Ok(order)
    }
}

impl SectionSpec {
    fn validate(&self, name: &str) -> Result<(), GeometryError> {
        let invalid = |reason| GeometryError::InvalidSection {
            section: name.to_owned(),
            reason,
        };

        if !(self.semispan.is_finite() && self.semispan > 0.0) {
            return Err(invalid("semispan must be positive"));
        }
        if self.grid.n == 0 {
            return Err(invalid("grid must have at least one element"));
        }
        if !self.airfoil.cl_alpha.is_finite() || !self.airfoil.alpha_l0.is_finite() {
            return Err(invalid("airfoil coefficients must be finite"));
        }

        for (field, distribution) in [
            ("chord", &self.chord),
            ("twist", &self.twist),
            ("sweep", &self.sweep),
            ("dihedral", &self.dihedral),
        ] {
            distribution
                .validate()
                .map_err(|source| GeometryError::InvalidDistribution {
                    section: name.to_owned(),
                    field,
                    source,
                })?;
        }

        if self.chord.min() <= 0.0 {
            return Err(invalid("chord must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn section(id: u32) -> SectionSpec {
        SectionSpec {
            id,
            side: Side::Both,
            is_main: id == 1,
            connect_to: None,
            semispan: 4.0,
            chord: Distribution::Constant(1.0),
            twist: Distribution::default(),
            sweep: Distribution::default(),
            dihedral: Distribution::default(),
            airfoil: Airfoil::default(),
            grid: Grid::default(),
        }
    }

    fn wing(sections: Vec<(&str, SectionSpec)>) -> WingGeometrySpec {
        WingGeometrySpec {
            units: UnitSystem::Si,
            sections: sections
                .into_iter()
                .map(|(name, s)| (name.to_owned(), s))
                .collect(),
        }
    }

    #[test]
    fn missing_design_section_is_reported() {
        let geometry = wing(vec![("main", section(1))]);
        assert_eq!(
            geometry.design_section().unwrap_err(),
            GeometryError::MissingDesignSection
        );
        assert!(geometry.validate().is_ok());
        assert!(geometry.with_design_twist(Distribution::default()).is_err());
    }

    #[test]
    fn twist_injection_leaves_original_untouched() {
        let geometry = wing(vec![(DESIGN_SECTION, section(1))]);
        let twisted = geometry
            .with_design_twist(Distribution::from_pairs(&[0.0, 1.0], &[2.0, -3.0]))
            .unwrap();

        assert_eq!(
            geometry.design_section().unwrap().twist,
            Distribution::Constant(0.0)
        );
        assert_relative_eq!(twisted.design_section().unwrap().twist.at(1.0), -3.0);
    }

    #[test]
    fn build_order_places_parents_first() {
        let mut winglet = section(2);
        winglet.connect_to = Some(ConnectTo {
            id: 1,
            location: Location::Tip,
        });
        // "a_winglet" sorts before "design_section" in the map.
        let geometry = wing(vec![(DESIGN_SECTION, section(1)), ("a_winglet", winglet)]);

        let order: Vec<&str> = geometry
            .build_order()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(order, vec![DESIGN_SECTION, "a_winglet"]);
    }

    #[test]
    fn unresolved_connection_is_reported() {
        let mut winglet = section(2);
        winglet.connect_to = Some(ConnectTo {
            id: 7,
            location: Location::Tip,
        });
        let geometry = wing(vec![(DESIGN_SECTION, section(1)), ("winglet", winglet)]);

        assert!(matches!(
            geometry.validate(),
            Err(GeometryError::UnknownConnection { id: 7, .. })
        ));
    }

    #[test]
    fn requires_a_main_section() {
        let mut design = section(1);
        design.is_main = false;
        let geometry = wing(vec![(DESIGN_SECTION, design)]);
        assert_eq!(geometry.validate(), Err(GeometryError::NoMainSection));
    }

    #[test]
    fn rejects_non_positive_chord() {
        let mut design = section(1);
        design.chord = Distribution::Table(vec![[0.0, 1.0], [1.0, 0.0]]);
        let geometry = wing(vec![(DESIGN_SECTION, design)]);
        assert!(matches!(
            geometry.validate(),
            Err(GeometryError::InvalidSection { .. })
        ));
    }

    #[test]
    fn cosine_nodes_span_the_section() {
        let nodes = Grid {
            n: 4,
            clustering: Clustering::Cosine,
        }
        .nodes();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0], 0.0);
        assert_eq!(nodes[4], 1.0);
        assert_relative_eq!(nodes[2], 0.5, epsilon = 1e-15);
        assert!(nodes[1] < 0.25);
    }

    #[test]
    fn control_points_fall_inside_their_elements() {
        for clustering in [Clustering::Cosine, Clustering::Linear] {
            let grid = Grid { n: 7, clustering };
            let nodes = grid.nodes();
            let controls = grid.control_points();
            assert_eq!(controls.len(), 7);
            for (k, s) in controls.iter().enumerate() {
                assert!(nodes[k] < *s && *s < nodes[k + 1], "{clustering:?} element {k}");
            }
        }

        // Cosine control points sit off the geometric midpoint near the ends.
        let grid = Grid {
            n: 4,
            clustering: Clustering::Cosine,
        };
        let nodes = grid.nodes();
        let first = grid.control_points()[0];
        assert!(first < 0.5 * (nodes[0] + nodes[1]));
    }

    #[test]
    fn english_lengths_convert() {
        assert_relative_eq!(
            UnitSystem::English.length(1.0).get::<meter>(),
            0.3048,
            epsilon = 1e-12
        );
    }
}
