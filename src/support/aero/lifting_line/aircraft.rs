use nalgebra::Vector3;
use uom::si::{
    angle::radian,
    area::square_meter,
    f64::{Angle, Area, Force, Length},
    force::newton,
    length::meter,
    velocity::meter_per_second,
};

use crate::support::aero::{
    BodyAxes, Distributions, ForcesAndMoments, Moments, ReferenceGeometry, SceneError, Station,
    SurfaceDistribution, WindAxes, flight::AircraftState, geometry::WingGeometrySpec,
};

use super::{
    config::{LiftingLineConfig, SolverKind},
    panels::Panels,
    system::{Circulation, VortexSystem, freestream_direction, local_alpha},
};

/// An aircraft placed in a lifting-line scene.
pub(super) struct Aircraft {
    panels: Panels,
    pub state: AircraftState,
    /// Result at `state`, if the aircraft has been solved since it last changed.
    pub solution: Option<Solution>,
}

/// Forces on every element at one angle of attack.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Solution {
    /// Angle of attack in radians.
    pub alpha: f64,
    circulation: Circulation,
    /// Body-axis force on each element in newtons.
    forces: Vec<Vector3<f64>>,
    pub coefficients: ForcesAndMoments,
}

impl Aircraft {
    pub(super) fn new(geometry: &WingGeometrySpec, state: AircraftState) -> Result<Self, SceneError> {
        geometry.validate()?;
        let panels = Panels::discretize(geometry)?;
        Ok(Self {
            panels,
            state,
            solution: None,
        })
    }

    /// Solves the aircraft at its current airspeed and the given angle of attack.
    pub(super) fn solve(
        &self,
        alpha: f64,
        density: f64,
        config: &LiftingLineConfig,
    ) -> Result<Solution, SceneError> {
        let speed = self.state.velocity.get::<meter_per_second>();
        let panels = &self.panels.panels;

        let system = VortexSystem::assemble(panels, alpha)?;
        let circulation = match config.solver {
            SolverKind::Linear => system.solve_linear(panels, speed)?,
            SolverKind::Nonlinear => system.solve_nonlinear(panels, speed, &config.nonlinear)?,
        };

        let forces: Vec<Vector3<f64>> = panels
            .iter()
            .zip(&circulation.velocities)
            .zip(circulation.gamma.iter())
            .map(|((panel, v), gamma)| density * gamma * v.cross(&panel.dl()))
            .collect();

        let total: Vector3<f64> = forces.iter().sum();
        let moment: Vector3<f64> = panels
            .iter()
            .zip(&forces)
            .map(|(panel, force)| panel.control.cross(force))
            .sum();

        let (area, span) = (self.panels.area, self.panels.span);
        let chord = area / span;
        let q_s = 0.5 * density * speed * speed * area;
        if !q_s.is_finite() || q_s <= 0.0 {
            return Err(SceneError::NonFinite);
        }

        let drag_direction = freestream_direction(alpha);
        let lift_direction = Vector3::new(alpha.sin(), 0.0, -alpha.cos());

        let coefficients = ForcesAndMoments {
            wind: WindAxes {
                lift: total.dot(&lift_direction) / q_s,
                drag: total.dot(&drag_direction) / q_s,
                side: total.y / q_s,
            },
            body: BodyAxes {
                x: total.x / q_s,
                y: total.y / q_s,
                z: total.z / q_s,
            },
            moment: Moments {
                roll: moment.x / (q_s * span),
                pitch: moment.y / (q_s * chord),
                yaw: moment.z / (q_s * span),
            },
        };

        Ok(Solution {
            alpha,
            circulation,
            forces,
            coefficients,
        })
    }

    pub(super) fn reference(&self) -> ReferenceGeometry {
        let area = self.panels.area;
        let span = self.panels.span;
        ReferenceGeometry {
            area: Area::new::<square_meter>(area),
            chord: Length::new::<meter>(area / span),
            span: Length::new::<meter>(span),
        }
    }

    /// Groups element results by section half, root to tip.
    pub(super) fn distributions(&self, solution: &Solution) -> Distributions {
        let mut surfaces: Vec<SurfaceDistribution> = Vec::new();

        for (i, panel) in self.panels.panels.iter().enumerate() {
            let name = &self.panels.sections[panel.section];
            let v = solution.circulation.velocities[i];
            let gamma = solution.circulation.gamma[i];
            let force = solution.forces[i];

            let station = Station {
                span_frac: panel.span_frac,
                chord: Length::new::<meter>(panel.chord),
                area: Area::new::<square_meter>(panel.area),
                twist: Angle::new::<radian>(panel.twist),
                alpha: Angle::new::<radian>(local_alpha(panel, &v)),
                force_x: Force::new::<newton>(force.x),
                force_y: Force::new::<newton>(force.y),
                force_z: Force::new::<newton>(force.z),
                section_cl: 2.0 * v.cross(&panel.dl()).norm() * gamma
                    / (v.norm_squared() * panel.area),
            };

            match surfaces.last_mut() {
                Some(surface) if surface.section == *name && surface.half == panel.half => {
                    surface.stations.push(station);
                }
                _ => surfaces.push(SurfaceDistribution {
                    section: name.clone(),
                    half: panel.half,
                    stations: vec![station],
                }),
            }
        }

        Distributions { surfaces }
    }
}
