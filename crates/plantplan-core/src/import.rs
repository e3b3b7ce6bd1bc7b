//! Drawing import trait and an in-memory implementation.
//!
//! A drawing import turns some external file (a CAD drawing, a YAML plan, a
//! test fixture) into closed polygon boundaries. The [`BoundarySource`]
//! trait abstracts that step so the session never depends on a file format.

use plantplan_types::Point;

use crate::error::PlanError;

/// One closed polygon: ordered vertices, last connected back to first.
pub type Boundary = Vec<Point>;

/// A source of zone boundaries.
pub trait BoundarySource {
    /// Produce every boundary of the drawing, in drawing order.
    ///
    /// The order returned becomes the zone import order, which is also the
    /// hit-test order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ImportFailure`] if the drawing cannot be read.
    fn import_boundaries(&self) -> Result<Vec<Boundary>, PlanError>;
}

/// Boundaries held in memory, returned as-is on every import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticBoundaries {
    /// Boundaries in drawing order.
    boundaries: Vec<Boundary>,
}

impl StaticBoundaries {
    /// Wrap a list of boundaries.
    pub const fn new(boundaries: Vec<Boundary>) -> Self {
        Self { boundaries }
    }

    /// Number of boundaries.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether there are no boundaries.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

impl FromIterator<Boundary> for StaticBoundaries {
    fn from_iter<I: IntoIterator<Item = Boundary>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl BoundarySource for StaticBoundaries {
    fn import_boundaries(&self) -> Result<Vec<Boundary>, PlanError> {
        Ok(self.boundaries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_boundaries_round_trip_order() {
        let source: StaticBoundaries = [
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0), Point::new(5.0, 6.0)],
        ]
        .into_iter()
        .collect();
        assert_eq!(source.len(), 2);
        let imported = source.import_boundaries().unwrap_or_default();
        assert_eq!(
            imported.get(1).and_then(|b| b.first()).copied(),
            Some(Point::new(5.0, 5.0))
        );
    }

    #[test]
    fn empty_source_imports_nothing() {
        let source = StaticBoundaries::default();
        assert!(source.is_empty());
        assert!(source.import_boundaries().is_ok_and(|b| b.is_empty()));
    }
}
