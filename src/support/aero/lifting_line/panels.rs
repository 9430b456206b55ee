//! Spanwise discretization of a wing into bound vortex elements.

use std::collections::HashMap;

use nalgebra::Vector3;
use uom::si::length::meter;

use crate::support::aero::geometry::{
    GeometryError, Half, Location, SectionSpec, UnitSystem, WingGeometrySpec,
};

/// One bound vortex element and its control point.
///
/// Positions are in meters in body axes (x forward, y right, z down).
/// Angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Panel {
    /// Index into [`Panels::sections`].
    pub section: usize,
    pub half: Half,
    /// Span fraction of the control point within its section.
    pub span_frac: f64,

    /// Bound segment start and end; `b - a` always points toward +y.
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
    pub control: Vector3<f64>,

    /// Chordwise unit vector, leading edge toward trailing edge.
    pub chordwise: Vector3<f64>,
    /// Unit normal to the chord line, pointing up.
    pub normal: Vector3<f64>,

    pub chord: f64,
    pub area: f64,
    pub twist: f64,
    pub cl_alpha: f64,
    pub alpha_l0: f64,
}

impl Panel {
    pub(super) fn dl(&self) -> Vector3<f64> {
        self.b - self.a
    }
}

/// All elements of an aircraft plus its reference geometry.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Panels {
    pub sections: Vec<String>,
    pub panels: Vec<Panel>,
    /// Reference area in square meters.
    pub area: f64,
    /// Reference span in meters.
    pub span: f64,
}

impl Panels {
    /// Discretizes every section of a validated geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the section connections cannot be ordered.
    pub(super) fn discretize(geometry: &WingGeometrySpec) -> Result<Self, GeometryError> {
        let units = geometry.units;
        let order = geometry.build_order()?;

        // Right-half root and tip of every placed section, keyed by ID.
        let mut ends: HashMap<u32, (Vector3<f64>, Vector3<f64>)> =
            HashMap::with_capacity(order.len());

        let mut sections = Vec::with_capacity(order.len());
        let mut panels = Vec::new();
        let mut area = 0.0;
        let mut span = 0.0;

        for (name, section) in order {
            let root = match section.connect_to {
                None => Vector3::zeros(),
                Some(parent) => {
                    let (root, tip) = ends.get(&parent.id).copied().ok_or_else(|| {
                        GeometryError::UnknownConnection {
                            section: name.to_owned(),
                            id: parent.id,
                        }
                    })?;
                    match parent.location {
                        Location::Root => root,
                        Location::Tip => tip,
                    }
                }
            };

            let fracs = section.grid.nodes();
            let controls = section.grid.control_points();
            let nodes = quarter_chord_nodes(section, units, root, &fracs);
            let tip = nodes.last().copied().unwrap_or(root);
            ends.insert(section.id, (root, tip));

            let index = sections.len();
            sections.push(name.to_owned());

            for &half in section.side.halves() {
                for k in 0..fracs.len() - 1 {
                    let element = Element {
                        nodes: &nodes,
                        fracs: &fracs,
                        control: controls[k],
                        k,
                    };
                    let panel = build_panel(section, units, index, half, &element);
                    if section.is_main {
                        area += panel.area;
                    }
                    panels.push(panel);
                }
                if section.is_main {
                    span += units.length(section.semispan).get::<meter>();
                }
            }
        }

        Ok(Self {
            sections,
            panels,
            area,
            span,
        })
    }
}

/// Integrates the right-half quarter-chord line through the node fractions.
fn quarter_chord_nodes(
    section: &SectionSpec,
    units: UnitSystem,
    root: Vector3<f64>,
    fracs: &[f64],
) -> Vec<Vector3<f64>> {
    let semispan = units.length(section.semispan).get::<meter>();

    let mut nodes = Vec::with_capacity(fracs.len());
    nodes.push(root);
    let mut position = root;
    for pair in fracs.windows(2) {
        let mid = 0.5 * (pair[0] + pair[1]);
        let sweep = section.sweep.at(mid).to_radians();
        let dihedral = section.dihedral.at(mid).to_radians();
        let direction = Vector3::new(-sweep.tan(), dihedral.cos(), -dihedral.sin());
        position += direction * semispan * (pair[1] - pair[0]);
        nodes.push(position);
    }
    nodes
}

fn mirror(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, -v.y, v.z)
}

/// Element `k` of a right-half node line.
struct Element<'a> {
    nodes: &'a [Vector3<f64>],
    fracs: &'a [f64],
    /// Span fraction of the control point.
    control: f64,
    k: usize,
}

fn build_panel(
    section: &SectionSpec,
    units: UnitSystem,
    index: usize,
    half: Half,
    element: &Element<'_>,
) -> Panel {
    let Element {
        nodes,
        fracs,
        control: s_c,
        k,
    } = *element;
    let (s0, s1) = (fracs[k], fracs[k + 1]);
    let mid = 0.5 * (s0 + s1);

    // The control point lies on the bound segment at its own span fraction.
    let right = nodes[k] + (nodes[k + 1] - nodes[k]) * ((s_c - s0) / (s1 - s0));
    let (a, b, control, side) = match half {
        Half::Right => (nodes[k], nodes[k + 1], right, 1.0),
        Half::Left => (mirror(&nodes[k + 1]), mirror(&nodes[k]), mirror(&right), -1.0),
    };

    let dihedral = section.dihedral.at(mid).to_radians();
    let twist = section.twist.at(s_c).to_radians();

    let aft = Vector3::new(-1.0, 0.0, 0.0);
    let up = Vector3::new(0.0, -side * dihedral.sin(), -dihedral.cos());

    let semispan = units.length(section.semispan).get::<meter>();
    let chord = units.length(section.chord.at(s_c)).get::<meter>();

    Panel {
        section: index,
        half,
        span_frac: s_c,
        a,
        b,
        control,
        chordwise: aft * twist.cos() - up * twist.sin(),
        normal: up * twist.cos() + aft * twist.sin(),
        chord,
        area: chord * semispan * (s1 - s0),
        twist,
        cl_alpha: section.airfoil.cl_alpha,
        alpha_l0: section.airfoil.alpha_l0.to_radians(),
    }
}
