use crate::cells::Coordinate;
use crate::utils::FnvHashSet;

pub trait GridDisplay {
    /// Render the body of a walkable grid cell as a single glyph.
    /// None leaves the cell's own glyph in place.
    fn render_cell_body(&self, _: Coordinate) -> Option<char> {
        None
    }
}

/// No decoration, just walls and passages.
#[derive(Debug, Copy, Clone)]
pub struct PlainDisplay;
impl GridDisplay for PlainDisplay {}

/// Marks every cell on a solved path with `.`.
#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Coordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Coordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> Option<char> {
        if self.on_path_coordinates.contains(&coord) {
            Some('.')
        } else {
            None
        }
    }
}

/// Marks the path with `.` and every other visited cell with `o`, showing how much of the maze a search explored.
#[derive(Debug)]
pub struct VisitedDisplay {
    path: PathDisplay,
    visited_coordinates: FnvHashSet<Coordinate>,
}
impl VisitedDisplay {
    pub fn new(path: &[Coordinate], visited: &[Coordinate]) -> Self {
        VisitedDisplay {
            path: PathDisplay::new(path),
            visited_coordinates: visited.iter().cloned().collect(),
        }
    }
}
impl GridDisplay for VisitedDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> Option<char> {
        self.path.render_cell_body(coord).or_else(|| {
            if self.visited_coordinates.contains(&coord) {
                Some('o')
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn corridor() -> Grid {
        Grid::from_rows(&["#####",
                          "#S..#",
                          "###.#",
                          "#..E#",
                          "#####"])
            .unwrap()
    }

    #[test]
    fn path_overlay_keeps_markers() {
        let g = corridor();
        let path = [(1, 1), (2, 1), (3, 1), (3, 2), (3, 3)]
            .iter()
            .map(|pair| Coordinate::from(*pair))
            .collect::<Vec<_>>();
        let rendered = g.render_with(&PathDisplay::new(&path));
        assert_eq!(rendered, "#####\n#S..#\n###.#\n#  E#\n#####\n");
    }

    #[test]
    fn visited_overlay_under_path() {
        let g = corridor();
        let path = [Coordinate::new(1, 1), Coordinate::new(2, 1)];
        let visited = [Coordinate::new(1, 1), Coordinate::new(2, 1), Coordinate::new(3, 1), Coordinate::new(2, 3)];
        let rendered = g.render_with(&VisitedDisplay::new(&path, &visited));
        assert_eq!(rendered, "#####\n#S.o#\n### #\n# oE#\n#####\n");
    }

    #[test]
    fn walls_are_never_decorated() {
        let g = corridor();
        let rendered = g.render_with(&PathDisplay::new(&[Coordinate::new(0, 0)]));
        assert!(rendered.starts_with("#####"));
    }
}
