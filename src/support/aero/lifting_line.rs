//! Numerical lifting-line backend.
//!
//! Each wing section half is divided into bound vortex elements with
//! semi-infinite trailing legs that follow the freestream. Circulation is found from the balance between
//! vortex lift and section lift at each element's control point, either with
//! the small-angle linearization or with the full nonlinear balance.
//! Sections use a linear lift curve (`cl_alpha`, `alpha_l0`), so drag is
//! induced drag only.

mod aircraft;
mod config;
mod panels;
mod system;
mod trim;
mod vortex;

pub use config::{LiftingLineConfig, NonlinearConfig, SolverKind, TrimConfig};

use std::collections::BTreeMap;

use uom::si::{angle::radian, f64::Angle, mass_density::kilogram_per_cubic_meter};

use super::{
    AeroScene, AeroSolver, Distributions, ForcesAndMoments, ReferenceGeometry, SceneError,
    flight::{AircraftState, Atmosphere},
    geometry::WingGeometrySpec,
};

use aircraft::Aircraft;

/// Lifting-line [`AeroSolver`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiftingLine {
    config: LiftingLineConfig,
}

impl LiftingLine {
    #[must_use]
    pub fn new(config: LiftingLineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LiftingLineConfig {
        &self.config
    }
}

impl AeroSolver for LiftingLine {
    type Scene = LiftingLineScene;

    fn create_scene(&self, atmosphere: Atmosphere) -> Self::Scene {
        LiftingLineScene {
            density: atmosphere.density.get::<kilogram_per_cubic_meter>(),
            config: self.config,
            aircraft: BTreeMap::new(),
        }
    }
}

/// Scene created by [`LiftingLine`].
pub struct LiftingLineScene {
    density: f64,
    config: LiftingLineConfig,
    aircraft: BTreeMap<String, Aircraft>,
}

impl LiftingLineScene {
    fn get(&self, name: &str) -> Result<&Aircraft, SceneError> {
        self.aircraft
            .get(name)
            .ok_or_else(|| SceneError::UnknownAircraft(name.to_owned()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Aircraft, SceneError> {
        self.aircraft
            .get_mut(name)
            .ok_or_else(|| SceneError::UnknownAircraft(name.to_owned()))
    }
}

impl AeroScene for LiftingLineScene {
    fn add_aircraft(
        &mut self,
        name: &str,
        geometry: &WingGeometrySpec,
        state: AircraftState,
    ) -> Result<(), SceneError> {
        let aircraft = Aircraft::new(geometry, state)?;
        self.aircraft.insert(name.to_owned(), aircraft);
        Ok(())
    }

    fn target_cl(&mut self, name: &str, cl: f64) -> Result<Angle, SceneError> {
        let (density, config) = (self.density, self.config);
        let aircraft = self.get_mut(name)?;

        let solution = trim::trim(aircraft, density, &config, cl)?;
        let alpha = Angle::new::<radian>(solution.alpha);

        aircraft.state.alpha = alpha;
        aircraft.solution = Some(solution);
        Ok(alpha)
    }

    fn solve_forces(&mut self, name: &str) -> Result<ForcesAndMoments, SceneError> {
        let (density, config) = (self.density, self.config);
        let aircraft = self.get_mut(name)?;
        let alpha = aircraft.state.alpha.get::<radian>();

        if let Some(solution) = &aircraft.solution
            && solution.alpha.to_bits() == alpha.to_bits()
        {
            return Ok(solution.coefficients);
        }

        let solution = aircraft.solve(alpha, density, &config)?;
        let coefficients = solution.coefficients;
        aircraft.solution = Some(solution);
        Ok(coefficients)
    }

    fn reference_geometry(&self, name: &str) -> Result<ReferenceGeometry, SceneError> {
        Ok(self.get(name)?.reference())
    }

    fn distributions(&self, name: &str) -> Result<Distributions, SceneError> {
        let aircraft = self.get(name)?;
        let solution = aircraft
            .solution
            .as_ref()
            .ok_or_else(|| SceneError::NotSolved(name.to_owned()))?;
        Ok(aircraft.distributions(solution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use uom::si::{
        angle::degree,
        f64::{MassDensity, Velocity},
        velocity::meter_per_second,
    };

    use crate::support::aero::{
        flight::Freestream,
        geometry::{
            Airfoil, Clustering, DESIGN_SECTION, Distribution, Grid, Half, SectionSpec, Side,
            UnitSystem,
        },
    };

    fn freestream() -> Freestream {
        Freestream::new(
            Velocity::new::<meter_per_second>(30.0),
            MassDensity::new::<kilogram_per_cubic_meter>(1.225),
        )
        .unwrap()
    }

    fn wing(chord: Distribution) -> WingGeometrySpec {
        let section = SectionSpec {
            id: 1,
            side: Side::Both,
            is_main: true,
            connect_to: None,
            semispan: 4.0,
            chord,
            twist: Distribution::default(),
            sweep: Distribution::default(),
            dihedral: Distribution::default(),
            airfoil: Airfoil::default(),
            grid: Grid {
                n: 30,
                clustering: Clustering::Cosine,
            },
        };
        WingGeometrySpec {
            units: UnitSystem::Si,
            sections: [(DESIGN_SECTION.to_owned(), section)].into_iter().collect(),
        }
    }

    fn rectangular() -> WingGeometrySpec {
        wing(Distribution::Constant(1.0))
    }

    fn elliptic() -> WingGeometrySpec {
        let rows = (0..=200_u32)
            .map(|k| {
                let s = f64::from(k) / 200.0;
                [s, (1.0 - s * s).max(1e-8).sqrt()]
            })
            .collect();
        wing(Distribution::Table(rows))
    }

    fn scene_with(
        solver: LiftingLine,
        geometry: &WingGeometrySpec,
        alpha_deg: f64,
    ) -> LiftingLineScene {
        let freestream = freestream();
        let mut scene = solver.create_scene(freestream.atmosphere());
        scene
            .add_aircraft(
                "wing",
                geometry,
                freestream.state(Angle::new::<degree>(alpha_deg)),
            )
            .unwrap();
        scene
    }

    fn span_efficiency(scene: &mut LiftingLineScene) -> f64 {
        let forces = scene.solve_forces("wing").unwrap();
        let aspect_ratio = scene.reference_geometry("wing").unwrap().aspect_ratio();
        forces.wind.lift.powi(2) / (PI * aspect_ratio * forces.wind.drag)
    }

    #[test]
    fn elliptic_wing_is_nearly_ideal() {
        let mut scene = scene_with(LiftingLine::default(), &elliptic(), 4.0);
        let e = span_efficiency(&mut scene);
        assert!((e - 1.0).abs() < 0.05, "span efficiency {e}");
    }

    #[test]
    fn rectangular_wing_is_less_efficient_than_elliptic() {
        let mut rect = scene_with(LiftingLine::default(), &rectangular(), 4.0);
        let mut ellip = scene_with(LiftingLine::default(), &elliptic(), 4.0);

        let e_rect = span_efficiency(&mut rect);
        let e_ellip = span_efficiency(&mut ellip);
        assert!(e_rect < e_ellip, "rectangular {e_rect}, elliptic {e_ellip}");
        assert!(e_rect < 1.0);
    }

    #[test]
    fn uniform_twist_offset_leaves_trimmed_drag_unchanged() {
        let trimmed = |offset: f64| {
            let mut geometry = rectangular();
            if let Some(section) = geometry.sections.get_mut(DESIGN_SECTION) {
                section.twist = Distribution::Constant(offset);
            }
            let mut scene = scene_with(LiftingLine::default(), &geometry, 0.0);
            let alpha = scene.target_cl("wing", 0.5).unwrap();
            let drag = scene.solve_forces("wing").unwrap().wind.drag;
            (alpha.get::<degree>(), drag)
        };

        let (alpha_0, cd_0) = trimmed(0.0);
        for offset in [-5.0, -10.0] {
            let (alpha, cd) = trimmed(offset);

            // Rotating every section rotates the trim angle by the same amount.
            assert_relative_eq!(alpha + offset, alpha_0, epsilon = 1e-8);
            assert_relative_eq!(cd, cd_0, max_relative = 1e-6);
        }
    }

    #[test]
    fn lift_is_linear_in_alpha() {
        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 0.0);
        let cl_0 = scene.solve_forces("wing").unwrap().wind.lift;
        assert_relative_eq!(cl_0, 0.0, epsilon = 1e-12);

        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 2.0);
        let cl_2 = scene.solve_forces("wing").unwrap().wind.lift;
        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 4.0);
        let cl_4 = scene.solve_forces("wing").unwrap().wind.lift;

        assert!(cl_2 > 0.0);
        assert_relative_eq!(cl_4, 2.0 * cl_2, max_relative = 0.01);
    }

    #[test]
    fn symmetric_wing_has_no_side_force_or_roll() {
        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 5.0);
        let forces = scene.solve_forces("wing").unwrap();
        assert_relative_eq!(forces.wind.side, 0.0, epsilon = 1e-10);
        assert_relative_eq!(forces.moment.roll, 0.0, epsilon = 1e-10);
        assert_relative_eq!(forces.moment.yaw, 0.0, epsilon = 1e-10);
        assert!(forces.wind.drag > 0.0);
    }

    #[test]
    fn trims_to_target_lift() {
        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 0.0);
        let alpha = scene.target_cl("wing", 0.4).unwrap();
        assert!(alpha.get::<degree>() > 0.0);

        let forces = scene.solve_forces("wing").unwrap();
        assert_relative_eq!(forces.wind.lift, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn unreachable_target_fails_to_trim() {
        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 0.0);
        let error = scene.target_cl("wing", 5.0).unwrap_err();
        assert!(
            matches!(
                error,
                SceneError::TrimFailed(_) | SceneError::TrimDivergence { .. }
            ),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn nonlinear_agrees_with_linear_at_small_alpha() {
        let nonlinear = LiftingLine::new(LiftingLineConfig {
            solver: SolverKind::Nonlinear,
            ..LiftingLineConfig::default()
        });

        let mut linear = scene_with(LiftingLine::default(), &rectangular(), 3.0);
        let mut full = scene_with(nonlinear, &rectangular(), 3.0);

        let cl_linear = linear.solve_forces("wing").unwrap().wind.lift;
        let cl_full = full.solve_forces("wing").unwrap().wind.lift;
        assert_relative_eq!(cl_full, cl_linear, max_relative = 0.02);
    }

    #[test]
    fn section_lift_reconstructs_total_lift() {
        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 0.0);
        let cl = 0.5;
        scene.target_cl("wing", cl).unwrap();

        let reference = scene.reference_geometry("wing").unwrap();
        let distributions = scene.distributions("wing").unwrap();
        let stations = distributions.get(DESIGN_SECTION, Half::Right).unwrap();
        assert_eq!(stations.len(), 30);
        assert!(stations.windows(2).all(|w| w[0].span_frac < w[1].span_frac));

        // Both halves, weighted by element area.
        let weighted: f64 = stations
            .iter()
            .map(|s| 2.0 * s.section_cl * s.area.value)
            .sum();
        assert_relative_eq!(weighted / reference.area.value, cl, max_relative = 0.01);
    }

    #[test]
    fn reports_unknown_and_unsolved_aircraft() {
        let mut scene = scene_with(LiftingLine::default(), &rectangular(), 0.0);
        assert!(matches!(
            scene.solve_forces("other"),
            Err(SceneError::UnknownAircraft(_))
        ));
        assert!(matches!(
            scene.distributions("wing"),
            Err(SceneError::NotSolved(_))
        ));
    }

    #[test]
    fn rejects_geometry_without_main_section() {
        let mut geometry = rectangular();
        if let Some(section) = geometry.sections.get_mut(DESIGN_SECTION) {
            section.is_main = false;
        }

        let freestream = freestream();
        let mut scene = LiftingLine::default().create_scene(freestream.atmosphere());
        let state = freestream.state(Angle::new::<degree>(0.0));
        let result = scene.add_aircraft("wing", &geometry, state);
        assert!(matches!(result, Err(SceneError::InvalidGeometry(_))));
    }
}
