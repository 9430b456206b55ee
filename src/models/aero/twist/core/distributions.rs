//! Spanwise lift and load distributions of a solved wing.

use std::io::{self, Write};

use uom::si::angle::{degree, radian};

use super::adapter::SolvedAeroState;

/// Normalized distributions along the right half of the design section.
///
/// All arrays have one entry per control point, ordered root to tip.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanwiseLoading {
    /// Span fraction `2y/b` of each control point, in `[0, 1]`.
    pub span: Vec<f64>,

    /// Geometric twist in degrees.
    pub twist: Vec<f64>,

    /// Section lift coefficient over the wing lift coefficient.
    pub lift: Vec<f64>,

    /// Normal force per unit span, `Cn c / (CL c_ref)`.
    pub load: Vec<f64>,

    /// Section drag coefficient based on the element area.
    pub section_cd: Vec<f64>,
}

impl SpanwiseLoading {
    /// Derives the distributions from a trimmed state.
    ///
    /// Body-axis element forces are nondimensionalized by `q dS` and rotated
    /// by the trim angle for the section drag:
    ///
    /// ```text
    /// D  = -Fx cos(a) - Fz sin(a)
    /// Cn = sqrt(Fz² + Fy²) / (q dS)
    /// ```
    #[must_use]
    pub fn from_state(state: &SolvedAeroState, target_cl: f64) -> Self {
        let q = state.freestream.dynamic_pressure();
        let chord_ref = state.reference.chord;
        let (sin_a, cos_a) = state.alpha.get::<radian>().sin_cos();

        let n = state.stations.len();
        let mut loading = Self {
            span: Vec::with_capacity(n),
            twist: Vec::with_capacity(n),
            lift: Vec::with_capacity(n),
            load: Vec::with_capacity(n),
            section_cd: Vec::with_capacity(n),
        };

        for station in &state.stations {
            let non_dim = q * station.area;
            let drag = -station.force_x * cos_a - station.force_z * sin_a;
            let cn = station.force_z.value.hypot(station.force_y.value) / non_dim.value;
            let chord_ratio = (station.chord / chord_ref).value;

            loading.span.push(station.span_frac);
            loading.twist.push(station.twist.get::<degree>());
            loading.lift.push(station.section_cl / target_cl);
            loading.load.push(cn * chord_ratio / target_cl);
            loading.section_cd.push((drag / non_dim).value);
        }

        loading
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Writes the `2y/b,Twist,Lift,Load` table.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "2y/b,Twist,Lift,Load")?;
        for i in 0..self.len() {
            writeln!(
                writer,
                "{},{},{},{}",
                self.span[i], self.twist[i], self.lift[i], self.load[i]
            )?;
        }
        Ok(())
    }
}
