use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

/// A cell position on a grid. `x` is the column, `y` is the row, both counted from the top left.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;

impl Coordinate {
    #[inline]
    pub fn new(x: usize, y: usize) -> Coordinate {
        Coordinate { x, y }
    }

    /// Number of single orthogonal steps between two coordinates, ignoring walls.
    #[inline]
    pub fn manhattan_distance(self, other: Coordinate) -> usize {
        let dx = if self.x > other.x { self.x - other.x } else { other.x - self.x };
        let dy = if self.y > other.y { self.y - other.y } else { other.y - self.y };
        dx + dy
    }

    /// The coordinate `stride` cells away in `direction`.
    /// None if that would step past the zero row or column. The far bounds are the grid's business.
    #[inline]
    pub fn offset(self, direction: CompassPrimary, stride: usize) -> Option<Coordinate> {
        let (x, y) = (self.x, self.y);
        match direction {
            CompassPrimary::North => y.checked_sub(stride).map(|y| Coordinate::new(x, y)),
            CompassPrimary::East => x.checked_add(stride).map(|x| Coordinate::new(x, y)),
            CompassPrimary::South => y.checked_add(stride).map(|y| Coordinate::new(x, y)),
            CompassPrimary::West => x.checked_sub(stride).map(|x| Coordinate::new(x, y)),
        }
    }

    /// The cell halfway between two coordinates on the same row or column.
    /// Used to find the wall separating two logical maze cells two strides apart.
    #[inline]
    pub fn midpoint(self, other: Coordinate) -> Coordinate {
        Coordinate::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from(x_y_pair: (usize, usize)) -> Coordinate {
        Coordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// Every direction in the canonical neighbour order. Searches that depend on iteration order
    /// (depth first reversal, heap tie breaks) rely on this order never changing.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];
}

/// What occupies a grid cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellKind {
    Wall,
    Path,
    Start,
    End,
}

impl CellKind {
    #[inline]
    pub fn is_walkable(self) -> bool {
        self != CellKind::Wall
    }

    /// Single glyph used by the text renderings and the `Grid::from_rows` fixtures.
    pub fn glyph(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Path => ' ',
            CellKind::Start => 'S',
            CellKind::End => 'E',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<CellKind> {
        match glyph {
            '#' => Some(CellKind::Wall),
            ' ' | '.' => Some(CellKind::Path),
            'S' => Some(CellKind::Start),
            'E' => Some(CellKind::End),
            _ => None,
        }
    }
}

impl Default for CellKind {
    fn default() -> Self {
        CellKind::Wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_stop_at_zero() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.offset(CompassPrimary::North, 1), None);
        assert_eq!(origin.offset(CompassPrimary::West, 2), None);
        assert_eq!(origin.offset(CompassPrimary::East, 2), Some(Coordinate::new(2, 0)));
        assert_eq!(origin.offset(CompassPrimary::South, 1), Some(Coordinate::new(0, 1)));

        let c = Coordinate::new(3, 3);
        assert_eq!(c.offset(CompassPrimary::North, 2), Some(Coordinate::new(3, 1)));
        assert_eq!(c.offset(CompassPrimary::West, 1), Some(Coordinate::new(2, 3)));
    }

    #[test]
    fn manhattan() {
        let a = Coordinate::new(1, 1);
        let b = Coordinate::new(5, 3);
        assert_eq!(a.manhattan_distance(b), 6);
        assert_eq!(b.manhattan_distance(a), 6);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn midpoint_is_the_separating_wall() {
        let a = Coordinate::new(1, 3);
        let b = Coordinate::new(3, 3);
        assert_eq!(a.midpoint(b), Coordinate::new(2, 3));
        assert_eq!(b.midpoint(a), Coordinate::new(2, 3));
    }

    #[test]
    fn glyphs_round_trip_except_dot() {
        for kind in &[CellKind::Wall, CellKind::Path, CellKind::Start, CellKind::End] {
            assert_eq!(CellKind::from_glyph(kind.glyph()), Some(*kind));
        }
        assert_eq!(CellKind::from_glyph('.'), Some(CellKind::Path));
        assert_eq!(CellKind::from_glyph('x'), None);
    }

    #[test]
    fn canonical_direction_order() {
        assert_eq!(CompassPrimary::ALL,
                   [CompassPrimary::North, CompassPrimary::East, CompassPrimary::South, CompassPrimary::West]);
    }
}
