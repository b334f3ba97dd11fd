//! Spatial-Index (KD-Tree) für schnelle Punkt-Abfragen.

use std::collections::HashMap;

use kiddo::{KdTree, SquaredEuclidean};

use crate::core::{Coordinates, Point, PointId};

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// ID des gefundenen Punktes
    pub point_id: PointId,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f64,
}

/// Read-only Spatial-Index über allen Punkten einer World.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    point_ids: Vec<PointId>,
}

impl SpatialIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            point_ids: Vec::new(),
        }
    }

    /// Baut einen neuen Index aus den übergebenen Punkten.
    pub fn from_points(points: &HashMap<PointId, Point>) -> Self {
        let mut point_ids: Vec<PointId> = points.keys().copied().collect();
        point_ids.sort_unstable();

        let entries: Vec<[f64; 2]> = point_ids
            .iter()
            .filter_map(|id| {
                points
                    .get(id)
                    .map(|p| [p.coordinates.x, p.coordinates.y])
            })
            .collect();

        let tree: KdTree<f64, 2> = (&entries).into();

        Self { tree, point_ids }
    }

    pub fn len(&self) -> usize {
        self.point_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_ids.is_empty()
    }

    /// Findet alle Punkte innerhalb eines Radius, sortiert nach Distanz.
    ///
    /// Bei gleicher Distanz entscheidet die kleinere ID.
    pub fn within_radius(&self, query: Coordinates, radius: f64) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
            .into_iter()
            .filter_map(|entry| {
                let point_id = *self.point_ids.get(entry.item as usize)?;
                Some(SpatialMatch {
                    point_id,
                    distance: entry.distance.sqrt(),
                })
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.point_id.cmp(&b.point_id))
        });
        results
    }
}
