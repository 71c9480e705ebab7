//! Découpage exact polygone/polygone

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use geo::{BooleanOps, MultiPolygon, Polygon};

use crate::CoverageError;

/// Primitive de découpage: intersection exacte de deux polygones
pub trait Clipper: Sync {
    fn clip(&self, a: &Polygon, b: &Polygon) -> Result<MultiPolygon, CoverageError>;
}

/// Découpage via `geo::BooleanOps`.
///
/// L'algorithme de balayage de `geo` peut paniquer sur des entrées
/// numériquement dégénérées (arêtes confondues); la panique est convertie
/// en `ClippingFailure` pour ne pas interrompre l'agrégation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanClipper;

impl Clipper for BooleanClipper {
    fn clip(&self, a: &Polygon, b: &Polygon) -> Result<MultiPolygon, CoverageError> {
        panic::catch_unwind(AssertUnwindSafe(|| a.intersection(b)))
            .map_err(|payload| CoverageError::clipping_failure(panic_message(payload.as_ref())))
    }
}

impl<T: Clipper + ?Sized> Clipper for &T {
    fn clip(&self, a: &Polygon, b: &Polygon) -> Result<MultiPolygon, CoverageError> {
        (**self).clip(a, b)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "boolean operation panicked".to_string()
    }
}
