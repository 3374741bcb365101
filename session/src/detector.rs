use glam::Vec2;
use soccer_core::Roi;

/// Finds organism centroids inside a region of the current camera frame.
///
/// Returned points are relative to the ROI's top-left corner, the way a
/// detector working on a cropped sub-image reports them.
pub trait BlobDetector {
    fn detect(&mut self, roi: &Roi) -> Vec<Vec2>;
}

impl<F> BlobDetector for F
where
    F: FnMut(&Roi) -> Vec<Vec2>,
{
    fn detect(&mut self, roi: &Roi) -> Vec<Vec2> {
        self(roi)
    }
}

/// Detector fed from recorded field-coordinate points, one frame at a time.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    frame: Vec<Vec2>,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the points visible in the current frame.
    pub fn set_frame(&mut self, points: impl IntoIterator<Item = Vec2>) {
        self.frame = points.into_iter().collect();
    }
}

impl BlobDetector for ScriptedDetector {
    fn detect(&mut self, roi: &Roi) -> Vec<Vec2> {
        let origin = roi.origin();
        self.frame
            .iter()
            .filter(|p| roi.contains(**p))
            .map(|p| *p - origin)
            .collect()
    }
}
