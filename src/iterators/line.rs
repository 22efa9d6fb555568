use glam::{IVec2, UVec2};

/// Integer Bresenham rasterisation of the segment `start -> end`, both inclusive.
///
/// Works the same in all eight octants. The iterator is lazy and `Clone`, so a
/// line can be restarted without recomputing its parameters.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    cell: IVec2,
    end: IVec2,
    /// Absolute delta along x, negated absolute delta along y.
    delta: IVec2,
    step: IVec2,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: IVec2, end: IVec2) -> Self {
        let delta = IVec2::new((end.x - start.x).abs(), -(end.y - start.y).abs());
        let step = IVec2::new(
            if start.x < end.x { 1 } else { -1 },
            if start.y < end.y { 1 } else { -1 },
        );
        Self {
            cell: start,
            end,
            delta,
            step,
            err: delta.x + delta.y,
            done: false,
        }
    }

    /// Line between two grid cells.
    pub fn between(start: UVec2, end: UVec2) -> Self {
        Self::new(start.as_ivec2(), end.as_ivec2())
    }

    /// Number of cells the line visits, endpoints included.
    pub fn cell_count(start: IVec2, end: IVec2) -> usize {
        let d = (end - start).abs();
        d.x.max(d.y) as usize + 1
    }
}

impl Iterator for BresenhamLine {
    type Item = IVec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.cell;
        if current == self.end {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 >= self.delta.y {
            self.err += self.delta.y;
            self.cell.x += self.step.x;
        }
        if e2 <= self.delta.x {
            self.err += self.delta.x;
            self.cell.y += self.step.y;
        }

        Some(current)
    }
}

impl std::iter::FusedIterator for BresenhamLine {}
