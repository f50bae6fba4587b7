/// Shape of a vertex index run over a possibly cyclic sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunShape {
    /// Consecutive indices without wraparound.
    Linear,
    /// The run covers a whole closed ring or line: first index == last.
    Closed,
    /// The run crosses the storage origin. `gap` is the position in the
    /// index list after which the indices jump.
    Wrapped { gap: usize },
}

/// A run of vertex indices identifying the shared segment in one feature.
///
/// Used by the resolver to tell the digitizing direction and by the
/// rewriter to pick the wraparound handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexRun<'a> {
    indices: &'a [usize],
}

impl<'a> VertexRun<'a> {
    #[must_use]
    pub fn new(indices: &'a [usize]) -> Self {
        Self { indices }
    }

    #[must_use]
    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    #[must_use]
    pub fn shape(&self) -> RunShape {
        match (self.indices.first(), self.indices.last()) {
            (Some(first), Some(last)) if self.indices.len() > 1 && first == last => {
                return RunShape::Closed;
            }
            _ => {}
        }
        self.indices
            .windows(2)
            .position(|w| w[0].abs_diff(w[1]) > 1)
            .map_or(RunShape::Linear, |gap| RunShape::Wrapped { gap })
    }

    /// Returns `true` if the run goes against increasing vertex order.
    ///
    /// Decided from the first two indices: adjacent decreasing indices, or
    /// non-adjacent increasing ones (a jump across the origin), mean reversed.
    /// Runs shorter than two indices are never reversed.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        match *self.indices {
            [first, second, ..] => {
                let adjacent = first.abs_diff(second) == 1;
                (adjacent && first > second) || (!adjacent && first < second)
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn min(&self) -> Option<usize> {
        self.indices.iter().min().copied()
    }

    #[must_use]
    pub fn max(&self) -> Option<usize> {
        self.indices.iter().max().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes() {
        assert_eq!(VertexRun::new(&[1, 2, 3]).shape(), RunShape::Linear);
        assert_eq!(VertexRun::new(&[3, 2, 1]).shape(), RunShape::Linear);
        assert_eq!(VertexRun::new(&[4, 1, 2, 3, 4]).shape(), RunShape::Closed);
        assert_eq!(VertexRun::new(&[3, 4, 1, 2]).shape(), RunShape::Wrapped { gap: 1 });
        assert_eq!(VertexRun::new(&[5]).shape(), RunShape::Linear);
    }

    #[test]
    fn forward_runs() {
        assert!(!VertexRun::new(&[1, 2, 3]).is_reversed());
        assert!(!VertexRun::new(&[4, 1, 2]).is_reversed());
    }

    #[test]
    fn reversed_runs() {
        assert!(VertexRun::new(&[3, 2, 1]).is_reversed());
        assert!(VertexRun::new(&[1, 4, 3]).is_reversed());
    }

    #[test]
    fn short_runs_are_not_reversed() {
        assert!(!VertexRun::new(&[7]).is_reversed());
        assert!(!VertexRun::new(&[]).is_reversed());
    }

    #[test]
    fn bounds() {
        let run = VertexRun::new(&[3, 4, 0, 1]);
        assert_eq!(run.min(), Some(0));
        assert_eq!(run.max(), Some(4));
        assert_eq!(VertexRun::new(&[]).min(), None);
    }
}
