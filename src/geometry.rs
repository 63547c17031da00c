use crate::error::LSystemError;
use crate::grammar::GrammarConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One drawn unit of forward motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Pen position before the move.
    pub start: Vec3,

    /// Pen position after the move.
    pub end: Vec3,

    /// Line thickness at the time the segment was drawn.
    pub width: f32,
}

impl Segment {
    /// Unit vector from `start` to `end` (zero for degenerate segments).
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// A single vertex as uploaded to a line/cylinder renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineVertex {
    pub position: Vec3,
    pub width: f32,
}

/// The complete, engine-agnostic output of a parse.
///
/// Segments are stored in interpretation order, which is reproducible for a fixed
/// configuration and seed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub segments: Vec<Segment>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Axis-aligned `(min, max)` over every segment endpoint.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.segments.iter().flat_map(|s| [s.start, s.end]);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Flattens segments into `start, end` vertex pairs, scaling every width by
    /// `width_scale`.
    pub fn line_vertices(&self, width_scale: f32) -> Vec<LineVertex> {
        let mut vertices = Vec::with_capacity(self.segments.len() * 2);
        for segment in &self.segments {
            let width = segment.width * width_scale;
            vertices.push(LineVertex {
                position: segment.start,
                width,
            });
            vertices.push(LineVertex {
                position: segment.end,
                width,
            });
        }
        vertices
    }
}

impl<'a> IntoIterator for &'a Geometry {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Holds the most recent successfully parsed [`Geometry`].
///
/// A failed [`reparse`](Self::reparse) reports the error and leaves the previous
/// geometry in place, so an editor can keep showing the last good plant.
#[derive(Clone, Debug, Default)]
pub struct PlantModel {
    geometry: Geometry,
}

impl PlantModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn reparse(&mut self, config: &GrammarConfig) -> Result<&Geometry, LSystemError> {
        self.geometry = crate::interpreter::parse(config)?;
        Ok(&self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: Vec3, end: Vec3, width: f32) -> Segment {
        Segment { start, end, width }
    }

    #[test]
    fn bounds_cover_all_endpoints() {
        assert_eq!(Geometry::new().bounds(), None);

        let geometry = Geometry {
            segments: vec![
                segment(Vec3::ZERO, Vec3::Y, 0.1),
                segment(Vec3::Y, Vec3::new(-1.0, 1.0, 2.0), 0.1),
            ],
        };
        assert_eq!(
            geometry.bounds(),
            Some((Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 2.0)))
        );
    }

    #[test]
    fn line_vertices_are_paired_and_scaled() {
        let geometry = Geometry {
            segments: vec![segment(Vec3::ZERO, Vec3::Y, 0.5)],
        };
        let vertices = geometry.line_vertices(2.0);
        assert_eq!(
            vertices,
            vec![
                LineVertex {
                    position: Vec3::ZERO,
                    width: 1.0
                },
                LineVertex {
                    position: Vec3::Y,
                    width: 1.0
                },
            ]
        );
    }

    #[test]
    fn segment_direction_and_length() {
        let s = segment(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0), 0.1);
        assert_eq!(s.length(), 5.0);
        assert!(s.direction().abs_diff_eq(Vec3::new(0.0, 0.6, 0.8), 1e-6));
        assert_eq!(segment(Vec3::X, Vec3::X, 0.1).direction(), Vec3::ZERO);
    }
}
