use nalgebra::Point3;

/// Positions of every particle at one sampled step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub step: u64,
    /// Simulated time in ps.
    pub time: f64,
    pub positions: Vec<Point3<f64>>,
}

impl Frame {
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Mean position of all particles, or `None` for an empty frame.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.positions.is_empty() {
            return None;
        }
        let sum = self
            .positions
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / self.positions.len() as f64))
    }
}

/// Frames in the order they were sampled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    frames: Vec<Frame>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The path of a single particle across all frames.
    pub fn particle_path(&self, index: usize) -> Vec<Point3<f64>> {
        self.frames
            .iter()
            .filter_map(|f| f.positions.get(index).copied())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
