use std::collections::HashMap;

use tracing::debug;

use crate::error::{GeometryError, Result};

use super::{
    ArcAlgorithm, CurveAlgorithm, CurveData, CurveKind, HyperbolaAlgorithm, LineAlgorithm,
    NurbsAlgorithm, ParabolaAlgorithm,
};

/// Builds the algorithm for a curve record.
pub type CurveFactory = fn(&CurveData) -> Result<Box<dyn CurveAlgorithm>>;

/// Returns the built-in factory for `kind`.
#[must_use]
pub fn default_factory(kind: CurveKind) -> CurveFactory {
    match kind {
        CurveKind::Line => line,
        CurveKind::Arc => arc,
        CurveKind::Hyperbola => hyperbola,
        CurveKind::Parabola => parabola,
        CurveKind::Nurbs => nurbs,
    }
}

fn line(data: &CurveData) -> Result<Box<dyn CurveAlgorithm>> {
    Ok(Box::new(LineAlgorithm::from_data(data)?))
}

fn arc(data: &CurveData) -> Result<Box<dyn CurveAlgorithm>> {
    Ok(Box::new(ArcAlgorithm::from_data(data)?))
}

fn hyperbola(data: &CurveData) -> Result<Box<dyn CurveAlgorithm>> {
    Ok(Box::new(HyperbolaAlgorithm::from_data(data)?))
}

fn parabola(data: &CurveData) -> Result<Box<dyn CurveAlgorithm>> {
    Ok(Box::new(ParabolaAlgorithm::from_data(data)?))
}

fn nurbs(data: &CurveData) -> Result<Box<dyn CurveAlgorithm>> {
    Ok(Box::new(NurbsAlgorithm::from_data(data)?))
}

/// Table of curve factories keyed by kind.
///
/// [`CurveData::algorithm`] always uses the built-in factories; a registry
/// lets callers swap one out or withhold a kind entirely.
#[derive(Debug, Clone)]
pub struct AlgorithmRegistry {
    factories: HashMap<CurveKind, CurveFactory>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AlgorithmRegistry {
    /// A registry with no kinds registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the built-in factory for every kind.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for kind in CurveKind::ALL {
            registry.register(kind, default_factory(kind));
        }
        registry
    }

    /// Registers `factory` for `kind`, returning the one it replaces.
    pub fn register(&mut self, kind: CurveKind, factory: CurveFactory) -> Option<CurveFactory> {
        debug!(?kind, "registering curve factory");
        self.factories.insert(kind, factory)
    }

    /// Whether `kind` has a factory.
    #[must_use]
    pub fn contains(&self, kind: CurveKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Builds the algorithm for `data`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedCurveType`] if the kind is not
    /// registered, or any error from the factory.
    pub fn dispatch(&self, data: &CurveData) -> Result<Box<dyn CurveAlgorithm>> {
        let kind = data.kind();
        let factory = self
            .factories
            .get(&kind)
            .ok_or(GeometryError::UnsupportedCurveType(kind))?;
        factory(data)
    }
}
