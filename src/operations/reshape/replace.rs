use super::vertex_run::{RunShape, VertexRun};
use super::Replacement;
use crate::error::TransformationError;
use crate::geometry::{Component, Geometry, GeometryType, Point};

/// Returns a copy of `original` with vertex `index` moved to `p`.
///
/// Moving either end of a closed line moves the other end too.
///
/// # Errors
///
/// Returns `TransformationError::MoveVertex` if the vertex does not exist.
pub fn move_vertex(
    original: &Geometry,
    index: usize,
    p: Point,
) -> Result<Geometry, TransformationError> {
    let mut new = original.clone();
    move_in_place(&mut new, index, p)?;
    if let Some((start, end)) = closed_line_bounds(original, index) {
        if index == start {
            move_in_place(&mut new, end, p)?;
        } else if index == end {
            move_in_place(&mut new, start, p)?;
        }
    }
    Ok(new)
}

/// Returns a copy of `original` with the vertex run `indices` replaced.
///
/// A point replacement moves the first vertex of the run and deletes the
/// rest. A line replacement is inserted in order before the smallest index
/// of the run, after which the old run is deleted. Runs covering a whole
/// polygon ring or closed line, and runs crossing the origin of a closed
/// line, are rewritten first so the result stays closed. A closed line
/// whose run only touches one end gets the other end moved along. The
/// replacement is used as given; reversing it for parts digitized the other
/// way is up to the caller.
///
/// # Errors
///
/// Returns a `TransformationError` if the run is empty, wraps around
/// vertex 0 of a closed line, or any single vertex edit is rejected.
pub fn reshape_geometry(
    original: &Geometry,
    indices: &[usize],
    replacement: &Replacement,
) -> Result<Geometry, TransformationError> {
    let Some(&first) = indices.first() else {
        return Err(TransformationError::EmptyVertexRun);
    };
    let mut new = splice(original, indices, replacement)?;
    if let Some((start, end)) = closed_line_bounds(original, first) {
        if new.components().len() == original.components().len() {
            reclose(&mut new, start, indices.contains(&end))?;
        }
    }
    Ok(new)
}

fn splice(
    original: &Geometry,
    indices: &[usize],
    replacement: &Replacement,
) -> Result<Geometry, TransformationError> {
    let Some(&first) = indices.first() else {
        return Err(TransformationError::EmptyVertexRun);
    };
    let mut new = original.clone();

    let line = match replacement {
        Replacement::Point(p) => {
            move_in_place(&mut new, first, *p)?;
            delete_descending(&mut new, &indices[1..], 0)?;
            return Ok(new);
        }
        Replacement::Line(line) => line,
    };

    let run = VertexRun::new(indices);
    let mut indices = indices.to_vec();
    let mut line = line.clone();
    match (original.geometry_type(), run.shape()) {
        (GeometryType::Polygon, RunShape::Closed) => {
            // The closing index follows the ring origin on its own.
            indices.pop();
            if line.is_closed() {
                line.points.pop();
            }
        }
        (GeometryType::Line, RunShape::Closed) => {
            let (min, max) = run_bounds(&run)?;
            let before = wraparound_start(min, &indices)?;
            if indices[0] == max {
                indices[0] = before;
            } else {
                // Origin scrolls to the start of the replacement.
                indices = (before..=max).collect();
            }
            line = line.closed();
        }
        (GeometryType::Line, RunShape::Wrapped { .. }) => {
            let (min, max) = run_bounds(&run)?;
            let before = wraparound_start(min, &indices)?;
            for index in &mut indices {
                if *index == max {
                    *index = before;
                }
            }
            let start = line
                .start_point()
                .copied()
                .ok_or(TransformationError::EmptyReplacement)?;
            move_in_place(&mut new, max, start)?;
        }
        _ => {}
    }

    let min = indices
        .iter()
        .min()
        .copied()
        .ok_or(TransformationError::EmptyVertexRun)?;
    for (offset, p) in line.points.iter().enumerate() {
        let index = min + offset;
        new.insert_vertex(index, *p)
            .map_err(|source| TransformationError::InsertVertex {
                index,
                x: p.x,
                y: p.y,
                source,
            })?;
    }
    delete_descending(&mut new, &indices, line.len())?;
    Ok(new)
}

/// First and last vertex numbers of the closed line holding vertex `nr`.
fn closed_line_bounds(geometry: &Geometry, nr: usize) -> Option<(usize, usize)> {
    if geometry.geometry_type() != GeometryType::Line {
        return None;
    }
    match geometry.component_of_vertex(nr)? {
        (offset, Component::Line(line)) if line.is_closed() => {
            Some((offset, offset + line.len() - 1))
        }
        _ => None,
    }
}

/// Closes the line starting at vertex `start` again if a splice opened it.
///
/// With `from_end` the last vertex holds the new position and the first one
/// follows it, otherwise the other way around.
fn reclose(
    geometry: &mut Geometry,
    start: usize,
    from_end: bool,
) -> Result<(), TransformationError> {
    let Some((_, Component::Line(line))) = geometry.component_of_vertex(start) else {
        return Ok(());
    };
    if line.len() < 2 || line.is_closed() {
        return Ok(());
    }
    let end = start + line.len() - 1;
    let (from, to) = if from_end { (end, start) } else { (start, end) };
    let p = line.points[from - start];
    move_in_place(geometry, to, p)
}

fn run_bounds(run: &VertexRun<'_>) -> Result<(usize, usize), TransformationError> {
    run.min()
        .zip(run.max())
        .ok_or(TransformationError::EmptyVertexRun)
}

fn wraparound_start(min: usize, indices: &[usize]) -> Result<usize, TransformationError> {
    min.checked_sub(1)
        .ok_or_else(|| TransformationError::WraparoundStart {
            indices: indices.to_vec(),
        })
}

fn move_in_place(
    geometry: &mut Geometry,
    index: usize,
    p: Point,
) -> Result<(), TransformationError> {
    geometry
        .move_vertex(index, p)
        .map_err(|source| TransformationError::MoveVertex {
            index,
            x: p.x,
            y: p.y,
            source,
        })
}

/// Deletes `indices`, each shifted by `shift`, highest first so earlier
/// deletions do not renumber later ones.
fn delete_descending(
    geometry: &mut Geometry,
    indices: &[usize],
    shift: usize,
) -> Result<(), TransformationError> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    for original in sorted {
        let index = original + shift;
        geometry
            .delete_vertex(index)
            .map_err(|source| TransformationError::DeleteVertex { index, source })?;
    }
    Ok(())
}
