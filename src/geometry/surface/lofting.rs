use crate::error::{GeometryError, Result};
use crate::geometry::curve::{CurveAlgorithm, CurveData};
use crate::math::{Transform, Vector3};

use super::{place, SurfaceAlgorithm, SurfaceDomain, SurfaceKind};

/// A ruled blend through a sequence of section curves.
///
/// `u` in `[0, 1]` is the normalized parameter along every section; `v` in
/// `[0, n - 1]` walks the sections, blending linearly between section
/// `floor(v)` and the next.
#[derive(Debug)]
pub struct LoftingAlgorithm {
    transform: Transform,
    sections: Vec<Box<dyn CurveAlgorithm>>,
}

impl LoftingAlgorithm {
    /// Builds the section algorithms.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for fewer than two sections and
    /// [`GeometryError::UnboundedDomain`] if a section cannot be normalized.
    pub fn new(transform: Transform, sections: &[CurveData]) -> Result<Self> {
        if sections.len() < 2 {
            return Err(
                GeometryError::Degenerate("lofting needs at least two sections".into()).into(),
            );
        }
        let sections = sections
            .iter()
            .map(|data| {
                let alg = data.algorithm()?;
                if alg.is_bounded() {
                    Ok(alg)
                } else {
                    Err(GeometryError::UnboundedDomain.into())
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            transform,
            sections,
        })
    }

    /// Number of sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Index of the first section of the pair blended at `v`, and the blend
    /// factor within that pair.
    fn pair(&self, v: f64) -> (usize, f64) {
        let last_pair = self.sections.len() - 2;
        let floor = v.floor().max(0.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (floor as usize).min(last_pair);
        #[allow(clippy::cast_precision_loss)]
        let t = v - index as f64;
        (index, t)
    }

    fn section_derivative(&self, index: usize, u: f64, ru: usize) -> Result<Vector3> {
        let section = &self.sections[index];
        let domain = section.domain();
        let scale = domain.width().powi(i32::try_from(ru).unwrap_or(i32::MAX));
        Ok(section.d(domain.lerp(u), ru)? * scale)
    }
}

impl SurfaceAlgorithm for LoftingAlgorithm {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Lofting
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    #[allow(clippy::cast_precision_loss)]
    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, 1.0, 0.0, (self.sections.len() - 1) as f64)
    }

    fn d(&self, u: f64, v: f64, ru: usize, rv: usize) -> Result<Vector3> {
        let (index, t) = self.pair(v);
        let a = self.section_derivative(index, u, ru)?;
        let b = self.section_derivative(index + 1, u, ru)?;
        let local = match rv {
            0 => a * (1.0 - t) + b * t,
            1 => b - a,
            _ => Vector3::zeros(),
        };
        Ok(place(&self.transform, local, ru, rv))
    }
}
