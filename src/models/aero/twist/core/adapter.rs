use twine_core::Model;
use uom::si::{angle::degree, f64::Angle};

use crate::support::aero::{
    AeroScene, AeroSolver, ForcesAndMoments, ReferenceGeometry, SceneError, Station,
    flight::{FlightCondition, Freestream},
    geometry::{DESIGN_SECTION, Half, WingGeometrySpec},
};

use super::{ConfigurationError, EvaluationError, schedule::TwistSchedule};

/// Name the wing is registered under in every scene.
const AIRCRAFT: &str = "wing";

/// Trimmed aerodynamic solution for one twist schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedAeroState {
    /// Angle of attack at which the target lift is reached.
    pub alpha: Angle,
    pub forces: ForcesAndMoments,
    pub reference: ReferenceGeometry,
    pub freestream: Freestream,
    /// Design section stations on one half, root to tip.
    pub stations: Vec<Station>,
}

impl SolvedAeroState {
    /// Wind-axis drag coefficient.
    #[must_use]
    pub fn drag_coefficient(&self) -> f64 {
        self.forces.wind.drag
    }
}

/// Evaluates twist schedules on a fixed wing and flight condition.
///
/// Every call builds a fresh scene from a copy of the geometry with the
/// schedule written into the design section twist, trims to the target lift
/// coefficient and solves forces. Nothing is cached between calls.
pub struct TwistModel<'a, S> {
    geometry: &'a WingGeometrySpec,
    condition: FlightCondition,
    solver: &'a S,
}

impl<'a, S: AeroSolver> TwistModel<'a, S> {
    /// Creates a model after checking the geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the geometry has no design section
    /// or is otherwise invalid.
    pub fn new(
        geometry: &'a WingGeometrySpec,
        condition: FlightCondition,
        solver: &'a S,
    ) -> Result<Self, ConfigurationError> {
        check_geometry(geometry)?;
        Ok(Self::new_unchecked(geometry, condition, solver))
    }

    /// Creates a model from a geometry that has already been checked.
    pub(crate) fn new_unchecked(
        geometry: &'a WingGeometrySpec,
        condition: FlightCondition,
        solver: &'a S,
    ) -> Self {
        Self {
            geometry,
            condition,
            solver,
        }
    }

    #[must_use]
    pub fn condition(&self) -> &FlightCondition {
        &self.condition
    }

    /// Evaluates one twist schedule.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::TrimDivergence`] if the target lift cannot be
    /// reached and [`EvaluationError::SolverFailure`] for any other failure.
    pub fn evaluate(&self, schedule: &TwistSchedule) -> Result<SolvedAeroState, EvaluationError> {
        let geometry = self
            .geometry
            .with_design_twist(schedule.to_distribution())
            .map_err(|e| EvaluationError::SolverFailure(SceneError::from(e)))?;

        let freestream = self.condition.freestream;
        let mut scene = self.solver.create_scene(freestream.atmosphere());
        scene
            .add_aircraft(
                AIRCRAFT,
                &geometry,
                freestream.state(Angle::new::<degree>(0.0)),
            )
            .map_err(EvaluationError::SolverFailure)?;

        let alpha = scene
            .target_cl(AIRCRAFT, self.condition.target_cl)
            .map_err(EvaluationError::from_trim)?;

        let forces = scene
            .solve_forces(AIRCRAFT)
            .map_err(EvaluationError::SolverFailure)?;
        let reference = scene
            .reference_geometry(AIRCRAFT)
            .map_err(EvaluationError::SolverFailure)?;
        let distributions = scene
            .distributions(AIRCRAFT)
            .map_err(EvaluationError::SolverFailure)?;

        let stations = distributions
            .get(DESIGN_SECTION, Half::Right)
            .or_else(|| distributions.get(DESIGN_SECTION, Half::Left))
            .ok_or_else(|| {
                EvaluationError::SolverFailure(SceneError::NotSolved(DESIGN_SECTION.to_owned()))
            })?
            .to_vec();

        log::debug!(
            "evaluated twist {:?}: alpha={:.4} deg, cd={:.6e}",
            schedule.twist(),
            alpha.get::<degree>(),
            forces.wind.drag
        );

        Ok(SolvedAeroState {
            alpha,
            forces,
            reference,
            freestream,
            stations,
        })
    }
}

impl<S: AeroSolver> Model for TwistModel<'_, S> {
    type Input = TwistSchedule;
    type Output = SolvedAeroState;
    type Error = EvaluationError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.evaluate(input)
    }
}

/// Checks the geometry invariants every evaluation relies on.
pub(crate) fn check_geometry(geometry: &WingGeometrySpec) -> Result<(), ConfigurationError> {
    geometry.design_section()?;
    geometry.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::aero::{geometry::GeometryError, lifting_line::LiftingLine};

    use super::super::test_support::{
        CountingSolver, TrimFailingSolver, condition, direct_baseline, rectangular_wing,
    };

    #[test]
    fn missing_design_section_is_a_configuration_error() {
        let mut geometry = rectangular_wing();
        let section = geometry.sections.remove(DESIGN_SECTION).unwrap();
        geometry.sections.insert("main".into(), section);

        let solver = CountingSolver::default();
        let result = TwistModel::new(&geometry, condition(0.5), &solver);
        assert!(matches!(
            result,
            Err(ConfigurationError::Geometry(
                GeometryError::MissingDesignSection
            ))
        ));
        assert_eq!(solver.scenes(), 0);
    }

    #[test]
    fn zero_twist_matches_untwisted_wing() {
        let geometry = rectangular_wing();
        let solver = LiftingLine::default();
        let model = TwistModel::new(&geometry, condition(0.5), &solver).unwrap();

        let state = model.evaluate(&TwistSchedule::zeros(5).unwrap()).unwrap();
        let (alpha, cd) = direct_baseline(&geometry, 0.5);

        assert_relative_eq!(state.drag_coefficient(), cd, max_relative = 1e-12);
        assert_relative_eq!(
            state.alpha.get::<degree>(),
            alpha.get::<degree>(),
            epsilon = 1e-12
        );
        assert_relative_eq!(state.forces.wind.lift, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn uniform_twist_offset_only_shifts_the_trim_angle() {
        let geometry = rectangular_wing();
        let solver = LiftingLine::default();
        let model = TwistModel::new(&geometry, condition(0.5), &solver).unwrap();
        let untwisted = model.evaluate(&TwistSchedule::zeros(3).unwrap()).unwrap();

        for offset in [-5.0, -10.0] {
            let schedule = TwistSchedule::zeros(3)
                .unwrap()
                .with_twist(vec![offset; 3])
                .unwrap();
            let state = model.evaluate(&schedule).unwrap();

            assert_relative_eq!(
                state.drag_coefficient(),
                untwisted.drag_coefficient(),
                max_relative = 1e-6
            );
            assert_relative_eq!(
                state.alpha.get::<degree>() + offset,
                untwisted.alpha.get::<degree>(),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    fn repeated_evaluations_are_identical() {
        let geometry = rectangular_wing();
        let solver = CountingSolver::default();
        let model = TwistModel::new(&geometry, condition(0.5), &solver).unwrap();

        let schedule = TwistSchedule::zeros(4)
            .unwrap()
            .with_twist(vec![1.0, 0.5, -0.5, -2.0])
            .unwrap();
        let first = model.call(&schedule).unwrap();
        let second = model.call(&schedule).unwrap();

        assert_eq!(first, second);
        assert_eq!(solver.scenes(), 2);
    }

    #[test]
    fn caller_geometry_is_not_modified() {
        let geometry = rectangular_wing();
        let before: WingGeometrySpec = geometry.clone();
        let solver = LiftingLine::default();
        let model = TwistModel::new(&geometry, condition(0.5), &solver).unwrap();

        let schedule = TwistSchedule::zeros(2)
            .unwrap()
            .with_twist(vec![3.0, -3.0])
            .unwrap();
        model.evaluate(&schedule).unwrap();
        assert_eq!(geometry, before);
    }

    #[test]
    fn trim_failures_are_classified() {
        let geometry = rectangular_wing();
        let solver = TrimFailingSolver::new(0.0);
        let model = TwistModel::new(&geometry, condition(0.5), &solver).unwrap();

        let schedule = TwistSchedule::zeros(2)
            .unwrap()
            .with_twist(vec![0.0, 1.0])
            .unwrap();
        assert!(matches!(
            model.evaluate(&schedule),
            Err(EvaluationError::TrimDivergence(_))
        ));
    }

    #[test]
    fn unreachable_lift_is_a_trim_divergence() {
        let geometry = rectangular_wing();
        let solver = LiftingLine::default();
        let model = TwistModel::new(&geometry, condition(4.0), &solver).unwrap();

        assert!(matches!(
            model.evaluate(&TwistSchedule::zeros(3).unwrap()),
            Err(EvaluationError::TrimDivergence(_))
        ));
    }
}
