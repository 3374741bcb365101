use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with half-open containment: `min <= p < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// The camera frame the game is played on, in detector pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub width: u32,
    pub height: u32,
}

impl Field {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(self.width as f32, self.height as f32))
    }

    /// True if `point` lies within `buffer` of any edge (inclusive).
    pub fn near_edge(&self, point: Vec2, buffer: f32) -> bool {
        self.near_vertical_edge(point, buffer) || self.near_horizontal_edge(point, buffer)
    }

    /// Within `buffer` of the left or right edge.
    pub fn near_vertical_edge(&self, point: Vec2, buffer: f32) -> bool {
        point.x <= buffer || point.x >= self.width as f32 - buffer
    }

    /// Within `buffer` of the top or bottom edge.
    pub fn near_horizontal_edge(&self, point: Vec2, buffer: f32) -> bool {
        point.y <= buffer || point.y >= self.height as f32 - buffer
    }

    /// Square region of half-extent `half` around `center`, clamped to the field.
    pub fn roi_around(&self, center: Vec2, half: f32) -> Roi {
        let half = half.max(0.0) as u32;
        let x = (center.x.floor().max(0.0) as u32).saturating_sub(half).min(self.width);
        let y = (center.y.floor().max(0.0) as u32).saturating_sub(half).min(self.height);
        Roi {
            x,
            y,
            width: (half * 2).min(self.width - x),
            height: (half * 2).min(self.height - y),
        }
    }
}

/// How wide a detection window to search around the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiMode {
    /// Box of side 2 x radius.
    Tracking,
    /// Box of side 4 x radius, used to re-acquire a lost organism.
    Wide,
}

/// Region of interest in detector pixels handed to the blob detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Translate an ROI-local point into field coordinates.
    pub fn to_field(&self, local: Vec2) -> Vec2 {
        local + self.origin()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        Aabb::from_origin_size(self.origin(), Vec2::new(self.width as f32, self.height as f32))
            .contains(point)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
