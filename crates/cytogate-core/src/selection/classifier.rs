use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_LASSO_VERTICES, PARALLEL_EVENT_THRESHOLD};
use crate::geom::{point_in_polygon, Point};
use crate::view::AxisMapper;

use super::lasso::LassoPath;

/// Event indices inside a polygon, ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub indices: Vec<usize>,
    pub count: usize,
}

impl Classification {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        let count = indices.len();
        Self { indices, count }
    }
}

/// Polygon and point set converted into the axis space the lasso was drawn in.
///
/// `points[i]` is event `i`; events that cannot be placed on the current axes
/// carry NaN coordinates and never classify inside.
#[derive(Clone, Debug)]
pub struct ClassificationRequest {
    pub polygon: Vec<Point>,
    pub points: Vec<Point>,
}

/// Convert a completed lasso and the active points into axis space.
///
/// Returns `None` when fewer than three vertices survive conversion; the
/// caller treats that as an empty selection without calling the classifier.
pub fn build_request(
    path: &LassoPath,
    mapper: &AxisMapper,
    points: &[Point],
) -> Option<ClassificationRequest> {
    let polygon: Vec<Point> = path
        .vertices()
        .iter()
        .map(|&v| mapper.screen_to_axis(v))
        .filter(Point::is_finite)
        .collect();
    if polygon.len() < MIN_LASSO_VERTICES {
        return None;
    }

    let convert = |p: &Point| mapper.data_to_axis(*p).unwrap_or(Point::UNMAPPED);
    let points = if points.len() >= PARALLEL_EVENT_THRESHOLD {
        points.par_iter().map(convert).collect()
    } else {
        points.iter().map(convert).collect()
    };
    Some(ClassificationRequest { polygon, points })
}

/// Ray-casting point-in-polygon classifier, parallel over events.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayCastClassifier;

impl RayCastClassifier {
    pub fn classify(&self, polygon: &[Point], points: &[Point]) -> Classification {
        if polygon.len() < MIN_LASSO_VERTICES {
            return Classification::default();
        }
        let indices: Vec<usize> = if points.len() >= PARALLEL_EVENT_THRESHOLD {
            points
                .par_iter()
                .enumerate()
                .filter(|(_, p)| point_in_polygon(**p, polygon))
                .map(|(i, _)| i)
                .collect()
        } else {
            points
                .iter()
                .enumerate()
                .filter(|(_, p)| point_in_polygon(**p, polygon))
                .map(|(i, _)| i)
                .collect()
        };
        Classification::from_indices(indices)
    }
}
