//! Circulation solve for a set of horseshoe vortices.
//!
//! Trailing legs follow the freestream downstream from each bound segment,
//! so the influence of each vortex on each control point depends on angle of
//! attack. A [`VortexSystem`] is assembled and factored for one angle and
//! rebuilt whenever the angle changes, including at every trim iteration.

use nalgebra::{DMatrix, DVector, Dyn, LU, Vector3};

use crate::support::aero::SceneError;

use super::{config::NonlinearConfig, panels::Panel, vortex};

/// Factored vortex system of one aircraft at one angle of attack.
pub(super) struct VortexSystem {
    /// Unit freestream direction the trailing legs are aligned with.
    direction: Vector3<f64>,
    /// Velocity at control point `i` induced by unit circulation on vortex `j`,
    /// one matrix per body-axis component.
    influence: [DMatrix<f64>; 3],
    lu: LU<f64, Dyn, Dyn>,
}

/// Circulation and local velocities at one angle of attack, in SI units.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Circulation {
    pub gamma: DVector<f64>,
    pub velocities: Vec<Vector3<f64>>,
}

/// Direction of travel of air past the aircraft at angle of attack `alpha`.
pub(super) fn freestream_direction(alpha: f64) -> Vector3<f64> {
    Vector3::new(-alpha.cos(), 0.0, -alpha.sin())
}

impl VortexSystem {
    /// Assembles and factors the linearized system at angle of attack `alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::SingularSystem`] if the system matrix is singular.
    pub(super) fn assemble(panels: &[Panel], alpha: f64) -> Result<Self, SceneError> {
        let n = panels.len();
        let direction = freestream_direction(alpha);

        let mut influence = [DMatrix::zeros(n, n), DMatrix::zeros(n, n), DMatrix::zeros(n, n)];
        for (i, target) in panels.iter().enumerate() {
            for (j, source) in panels.iter().enumerate() {
                let v = vortex::horseshoe(&target.control, &source.a, &source.b, &direction);
                for (axis, matrix) in influence.iter_mut().enumerate() {
                    matrix[(i, j)] = v[axis];
                }
            }
        }

        let mut matrix = DMatrix::zeros(n, n);
        for (i, panel) in panels.iter().enumerate() {
            for j in 0..n {
                let v = column(&influence, i, j);
                matrix[(i, j)] = -panel.cl_alpha * v.dot(&panel.normal);
            }
            matrix[(i, i)] += 2.0 * direction.cross(&panel.dl()).norm() / panel.area;
        }

        let lu = matrix.lu();
        if !lu.is_invertible() {
            return Err(SceneError::SingularSystem);
        }

        Ok(Self {
            direction,
            influence,
            lu,
        })
    }

    /// Solves the small-angle system at the given airspeed.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::SingularSystem`] if back-substitution fails or
    /// [`SceneError::NonFinite`] if the circulation is not finite.
    pub(super) fn solve_linear(
        &self,
        panels: &[Panel],
        speed: f64,
    ) -> Result<Circulation, SceneError> {
        let direction = self.direction;
        let rhs = DVector::from_iterator(
            panels.len(),
            panels
                .iter()
                .map(|p| p.cl_alpha * speed * (direction.dot(&p.normal) - p.alpha_l0)),
        );

        let gamma = self.lu.solve(&rhs).ok_or(SceneError::SingularSystem)?;
        if gamma.iter().any(|g| !g.is_finite()) {
            return Err(SceneError::NonFinite);
        }

        let velocities = self.velocities(&gamma, direction * speed);
        Ok(Circulation { gamma, velocities })
    }

    /// Solves the full vortex-lift balance by Newton iteration.
    ///
    /// Each element must satisfy `2|V × dl|Γ = |V|² dS cl(α)` where `V`
    /// includes the velocity induced by every vortex.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NonConvergence`] if the residual does not reach
    /// the tolerance within the iteration limit.
    pub(super) fn solve_nonlinear(
        &self,
        panels: &[Panel],
        speed: f64,
        config: &NonlinearConfig,
    ) -> Result<Circulation, SceneError> {
        let Circulation {
            mut gamma,
            mut velocities,
        } = self.solve_linear(panels, speed)?;
        let v_inf = self.direction * speed;

        let mut residual = DVector::zeros(panels.len());
        let mut iters = 0;

        loop {
            let mut worst = 0.0_f64;
            for (i, panel) in panels.iter().enumerate() {
                let v = velocities[i];
                let w = v.cross(&panel.dl());
                let r = 2.0 * w.norm() * gamma[i]
                    - v.norm_squared() * panel.area * section_cl(panel, &v);
                residual[i] = r;
                worst = worst.max((r / (speed * speed * panel.area)).abs());
            }

            if !worst.is_finite() {
                return Err(SceneError::NonFinite);
            }
            if worst <= config.tolerance {
                return Ok(Circulation { gamma, velocities });
            }
            if iters == config.max_iters {
                return Err(SceneError::NonConvergence {
                    iters,
                    residual: worst,
                });
            }

            let step = self
                .jacobian(panels, &gamma, &velocities)
                .lu()
                .solve(&(-&residual))
                .ok_or(SceneError::SingularSystem)?;
            gamma += step * config.relaxation;
            velocities = self.velocities(&gamma, v_inf);
            iters += 1;
        }
    }

    fn velocities(&self, gamma: &DVector<f64>, v_inf: Vector3<f64>) -> Vec<Vector3<f64>> {
        let [wx, wy, wz] = &self.influence;
        let (vx, vy, vz) = (wx * gamma, wy * gamma, wz * gamma);
        (0..gamma.len())
            .map(|i| v_inf + Vector3::new(vx[i], vy[i], vz[i]))
            .collect()
    }

    fn jacobian(
        &self,
        panels: &[Panel],
        gamma: &DVector<f64>,
        velocities: &[Vector3<f64>],
    ) -> DMatrix<f64> {
        let n = panels.len();
        let mut jacobian = DMatrix::zeros(n, n);

        for (i, panel) in panels.iter().enumerate() {
            let v = velocities[i];
            let dl = panel.dl();
            let w = v.cross(&dl);
            let w_mag = w.norm();
            let v_a = v.dot(&panel.chordwise);
            let v_n = v.dot(&panel.normal);
            let cl = section_cl(panel, &v);

            for j in 0..n {
                let v_ij = column(&self.influence, i, j);
                let d_alpha = (v_a * v_ij.dot(&panel.normal) - v_n * v_ij.dot(&panel.chordwise))
                    / (v_a * v_a + v_n * v_n);

                let mut d = 2.0 * w.dot(&v_ij.cross(&dl)) / w_mag * gamma[i]
                    - 2.0 * v.dot(&v_ij) * panel.area * cl
                    - v.norm_squared() * panel.area * panel.cl_alpha * d_alpha;
                if i == j {
                    d += 2.0 * w_mag;
                }
                jacobian[(i, j)] = d;
            }
        }

        jacobian
    }
}

/// Local angle of attack seen by a panel.
pub(super) fn local_alpha(panel: &Panel, velocity: &Vector3<f64>) -> f64 {
    velocity
        .dot(&panel.normal)
        .atan2(velocity.dot(&panel.chordwise))
}

/// Section lift coefficient from the linear airfoil model.
fn section_cl(panel: &Panel, velocity: &Vector3<f64>) -> f64 {
    panel.cl_alpha * (local_alpha(panel, velocity) - panel.alpha_l0)
}

fn column(influence: &[DMatrix<f64>; 3], i: usize, j: usize) -> Vector3<f64> {
    Vector3::new(influence[0][(i, j)], influence[1][(i, j)], influence[2][(i, j)])
}
