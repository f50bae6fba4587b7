use super::LineString;

/// A polygon as a list of closed rings.
///
/// `rings[0]` is the exterior; any further rings are holes. Every ring
/// stores its closing vertex explicitly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<LineString>,
}

impl Polygon {
    #[must_use]
    pub fn new(rings: Vec<LineString>) -> Self {
        Self { rings }
    }

    #[must_use]
    pub fn exterior(&self) -> Option<&LineString> {
        self.rings.first()
    }

    /// Interior rings (holes).
    pub fn interiors(&self) -> impl Iterator<Item = &LineString> {
        self.rings.iter().skip(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(LineString::is_empty)
    }
}
