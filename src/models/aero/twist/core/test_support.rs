//! Test-only helpers for twist optimization.

use std::cell::Cell;

use uom::si::{
    angle::degree,
    f64::{Angle, MassDensity, Velocity},
    mass_density::kilogram_per_cubic_meter,
    velocity::meter_per_second,
};

use crate::support::aero::{
    AeroScene, AeroSolver, Distributions, ForcesAndMoments, ReferenceGeometry, SceneError,
    flight::{AircraftState, Atmosphere, FlightCondition, Freestream},
    geometry::{
        Airfoil, Clustering, DESIGN_SECTION, Distribution, Grid, SectionSpec, Side, UnitSystem,
        WingGeometrySpec,
    },
    lifting_line::{LiftingLine, LiftingLineScene},
};

/// Semispan of [`rectangular_wing`] in meters.
pub(crate) const SEMISPAN: f64 = 4.0;

/// Untwisted rectangular wing of aspect ratio 8.
pub(crate) fn rectangular_wing() -> WingGeometrySpec {
    let section = SectionSpec {
        id: 1,
        side: Side::Both,
        is_main: true,
        connect_to: None,
        semispan: SEMISPAN,
        chord: Distribution::Constant(1.0),
        twist: Distribution::default(),
        sweep: Distribution::default(),
        dihedral: Distribution::default(),
        airfoil: Airfoil::default(),
        grid: Grid {
            n: 10,
            clustering: Clustering::Cosine,
        },
    };
    WingGeometrySpec {
        units: UnitSystem::Si,
        sections: [(DESIGN_SECTION.to_owned(), section)].into_iter().collect(),
    }
}

pub(crate) fn freestream() -> Freestream {
    Freestream::new(
        Velocity::new::<meter_per_second>(30.0),
        MassDensity::new::<kilogram_per_cubic_meter>(1.225),
    )
    .expect("freestream values are positive")
}

pub(crate) fn condition(target_cl: f64) -> FlightCondition {
    FlightCondition {
        freestream: freestream(),
        target_cl,
    }
}

/// Trims the geometry directly with the lifting-line solver.
///
/// Returns the trim angle and drag coefficient.
pub(crate) fn direct_baseline(geometry: &WingGeometrySpec, target_cl: f64) -> (Angle, f64) {
    let freestream = freestream();
    let mut scene = LiftingLine::default().create_scene(freestream.atmosphere());
    scene
        .add_aircraft("baseline", geometry, freestream.state(Angle::new::<degree>(0.0)))
        .expect("geometry is valid");
    let alpha = scene.target_cl("baseline", target_cl).expect("trim succeeds");
    let forces = scene.solve_forces("baseline").expect("solve succeeds");
    (alpha, forces.wind.drag)
}

/// Lifting-line solver that counts how many scenes it creates.
#[derive(Default)]
pub(crate) struct CountingSolver {
    inner: LiftingLine,
    scenes: Cell<usize>,
}

impl CountingSolver {
    pub(crate) fn scenes(&self) -> usize {
        self.scenes.get()
    }
}

impl AeroSolver for CountingSolver {
    type Scene = LiftingLineScene;

    fn create_scene(&self, atmosphere: Atmosphere) -> Self::Scene {
        self.scenes.set(self.scenes.get() + 1);
        self.inner.create_scene(atmosphere)
    }
}

/// Lifting-line solver whose trim fails when the design section tip twist
/// magnitude exceeds a limit.
pub(crate) struct TrimFailingSolver {
    inner: LiftingLine,
    tip_limit: f64,
    scenes: Cell<usize>,
}

impl TrimFailingSolver {
    pub(crate) fn new(tip_limit: f64) -> Self {
        Self {
            inner: LiftingLine::default(),
            tip_limit,
            scenes: Cell::new(0),
        }
    }

    pub(crate) fn scenes(&self) -> usize {
        self.scenes.get()
    }
}

impl AeroSolver for TrimFailingSolver {
    type Scene = TrimFailingScene;

    fn create_scene(&self, atmosphere: Atmosphere) -> Self::Scene {
        self.scenes.set(self.scenes.get() + 1);
        TrimFailingScene {
            inner: self.inner.create_scene(atmosphere),
            tip_limit: self.tip_limit,
            fail_trim: false,
        }
    }
}

pub(crate) struct TrimFailingScene {
    inner: LiftingLineScene,
    tip_limit: f64,
    fail_trim: bool,
}

impl AeroScene for TrimFailingScene {
    fn add_aircraft(
        &mut self,
        name: &str,
        geometry: &WingGeometrySpec,
        state: AircraftState,
    ) -> Result<(), SceneError> {
        let tip_twist = geometry.design_section()?.twist.at(1.0);
        self.fail_trim = tip_twist.abs() > self.tip_limit;
        self.inner.add_aircraft(name, geometry, state)
    }

    fn target_cl(&mut self, name: &str, cl: f64) -> Result<Angle, SceneError> {
        if self.fail_trim {
            return Err(SceneError::TrimDivergence {
                residual: 1.0,
                iters: 100,
            });
        }
        self.inner.target_cl(name, cl)
    }

    fn solve_forces(&mut self, name: &str) -> Result<ForcesAndMoments, SceneError> {
        self.inner.solve_forces(name)
    }

    fn reference_geometry(&self, name: &str) -> Result<ReferenceGeometry, SceneError> {
        self.inner.reference_geometry(name)
    }

    fn distributions(&self, name: &str) -> Result<Distributions, SceneError> {
        self.inner.distributions(name)
    }
}
