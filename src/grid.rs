use error_chain::bail;
use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use std::fmt;

use crate::cells::{CellKind, CompassPrimary, Coordinate, CoordinateSmallVec};
use crate::errors::*;
use crate::grid_displays::GridDisplay;
use crate::utils;

/// Smallest side length that leaves room for distinct interior start and end cells.
pub const MIN_GRID_SIZE: usize = 5;

/// Round a requested side length up to the next odd number and reject anything too small to hold a maze.
pub fn normalised_size(requested: usize) -> Result<usize> {
    let size = if requested % 2 == 0 { requested + 1 } else { requested };
    if size < MIN_GRID_SIZE {
        bail!(ErrorKind::InvalidConfiguration(size));
    }
    Ok(size)
}

/// A square array of cells. Logical maze cells sit on odd coordinates, the even rows and columns hold
/// the walls (or carved passages) between them, and the outer ring is always wall.
///
/// The start is fixed at `(1, 1)` and the end at `(size - 2, size - 2)` for generated grids.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    dimension: usize,
    cells: Vec<CellKind>,
    start: Coordinate,
    end: Coordinate,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: size: {}, start: {}, end: {}, walkable: {}",
               self.dimension, self.start, self.end, self.walkable_count())
    }
}

impl Grid {
    /// A grid of solid wall, ready for carving, after rounding `size` up to odd.
    pub(crate) fn walled(size: usize) -> Result<Grid> {
        let size = normalised_size(size)?;
        Ok(Grid {
            dimension: size,
            cells: vec![CellKind::Wall; size * size],
            start: Coordinate::new(1, 1),
            end: Coordinate::new(size - 2, size - 2),
        })
    }

    /// Build a grid from text rows: `#` is wall, `.` or a space is path, `S` and `E` mark the single
    /// start and end. The rows must form an odd sized square no smaller than `MIN_GRID_SIZE`.
    ///
    /// Nothing is repaired here, so an end that is walled off stays walled off.
    pub fn from_rows(rows: &[&str]) -> Result<Grid> {
        let dimension = rows.len();
        if dimension < MIN_GRID_SIZE || dimension % 2 == 0 {
            bail!(ErrorKind::InvalidGridLayout(format!("{} rows is not an odd size of at least {}",
                                                       dimension, MIN_GRID_SIZE)));
        }

        let mut cells = Vec::with_capacity(dimension * dimension);
        let mut starts = CoordinateSmallVec::new();
        let mut ends = CoordinateSmallVec::new();

        for (y, row) in rows.iter().enumerate() {
            let glyphs = row.chars().collect::<Vec<char>>();
            if glyphs.len() != dimension {
                bail!(ErrorKind::InvalidGridLayout(format!("row {} has {} cells, expected {}",
                                                           y, glyphs.len(), dimension)));
            }
            for (x, glyph) in glyphs.into_iter().enumerate() {
                let kind = CellKind::from_glyph(glyph).ok_or_else(|| {
                    ErrorKind::InvalidGridLayout(format!("unknown glyph '{}' at ({}, {})", glyph, x, y))
                })?;
                match kind {
                    CellKind::Start => starts.push(Coordinate::new(x, y)),
                    CellKind::End => ends.push(Coordinate::new(x, y)),
                    _ => {}
                }
                cells.push(kind);
            }
        }

        if starts.len() != 1 || ends.len() != 1 {
            bail!(ErrorKind::InvalidGridLayout(format!("expected one start and one end, found {} and {}",
                                                       starts.len(), ends.len())));
        }

        let grid = Grid {
            dimension,
            cells,
            start: starts[0],
            end: ends[0],
        };
        debug!("Loaded {:?}", grid);
        Ok(grid)
    }

    /// Side length of the square grid.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimension
    }

    /// Total number of cells, walls included.
    #[inline]
    pub fn size(&self) -> usize {
        self.dimension * self.dimension
    }

    #[inline]
    pub fn start(&self) -> Coordinate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Coordinate {
        self.end
    }

    /// Is the grid coordinate within the grid's dimensions.
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        coord.x < self.dimension && coord.y < self.dimension
    }

    /// Inside the outer wall ring, so it may be carved.
    #[inline]
    pub fn is_interior(&self, coord: Coordinate) -> bool {
        coord.x >= 1 && coord.y >= 1 && coord.x < self.dimension - 1 && coord.y < self.dimension - 1
    }

    /// The kind of cell at a coordinate. Anything off the grid reads as wall.
    #[inline]
    pub fn kind_at(&self, coord: Coordinate) -> CellKind {
        self.index(coord)
            .and_then(|index| self.cells.get(index).cloned())
            .unwrap_or(CellKind::Wall)
    }

    #[inline]
    pub fn is_walkable(&self, coord: Coordinate) -> bool {
        self.kind_at(coord).is_walkable()
    }

    /// The walkable cells directly North, East, South and West of a coordinate, in that order.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| coord.offset(*dir, 1))
            .filter(|adjacent| self.is_walkable(*adjacent))
            .collect()
    }

    /// Every coordinate of the grid in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> {
        let dimension = self.dimension;
        (0..dimension * dimension).map(move |index| Coordinate::new(index % dimension, index / dimension))
    }

    /// Number of cells that are not wall.
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|kind| kind.is_walkable()).count()
    }

    /// Walkable cells as graph nodes, joined wherever two of them are orthogonally adjacent.
    /// A perfect maze gives a tree here.
    pub fn passage_graph(&self) -> UnGraph<Coordinate, ()> {
        let walkable = self.iter().filter(|coord| self.is_walkable(*coord)).collect::<Vec<_>>();
        let mut graph = UnGraph::<Coordinate, ()>::with_capacity(walkable.len(), walkable.len());
        let mut node_indices: utils::FnvHashMap<Coordinate, NodeIndex> = utils::fnv_hashmap(walkable.len());

        for coord in &walkable {
            let _ = node_indices.insert(*coord, graph.add_node(*coord));
        }
        for coord in &walkable {
            for dir in &[CompassPrimary::East, CompassPrimary::South] {
                let adjacent_index = coord.offset(*dir, 1).and_then(|adjacent| node_indices.get(&adjacent));
                if let Some(adjacent_index) = adjacent_index {
                    let _ = graph.add_edge(node_indices[coord], *adjacent_index, ());
                }
            }
        }
        graph
    }

    /// Render one glyph per cell, letting the display decorate walkable cells. Start and end markers always win.
    pub fn render_with(&self, display: &dyn GridDisplay) -> String {
        let mut output = String::with_capacity(self.size() + self.dimension);
        for coord in self.iter() {
            let kind = self.kind_at(coord);
            let glyph = match kind {
                CellKind::Wall | CellKind::Start | CellKind::End => kind.glyph(),
                _ => display.render_cell_body(coord).unwrap_or_else(|| kind.glyph()),
            };
            output.push(glyph);
            if coord.x == self.dimension - 1 {
                output.push('\n');
            }
        }
        output
    }

    /// Overwrite a cell. Off-grid coordinates are ignored.
    pub(crate) fn set_kind(&mut self, coord: Coordinate, kind: CellKind) {
        if let Some(cell) = self.index(coord).and_then(|index| self.cells.get_mut(index)) {
            *cell = kind;
        }
    }

    #[inline]
    pub(crate) fn carve(&mut self, coord: Coordinate) {
        self.set_kind(coord, CellKind::Path)
    }

    #[inline]
    fn index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y * self.dimension + coord.x)
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render_with(&crate::grid_displays::PlainDisplay))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use petgraph::algo::{connected_components, is_cyclic_undirected};

    use super::*;

    fn gc(x: usize, y: usize) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn open_5x5() -> Grid {
        Grid::from_rows(&["#####",
                          "#S..#",
                          "#...#",
                          "#..E#",
                          "#####"])
            .expect("valid layout")
    }

    #[test]
    fn even_sizes_round_up() {
        assert_eq!(normalised_size(4).unwrap(), 5);
        assert_eq!(normalised_size(5).unwrap(), 5);
        assert_eq!(normalised_size(20).unwrap(), 21);
    }

    #[test]
    fn tiny_sizes_are_rejected() {
        for size in 0..4 {
            match normalised_size(size) {
                Err(Error(ErrorKind::InvalidConfiguration(_), _)) => {}
                other => panic!("size {} gave {:?}", size, other),
            }
        }
    }

    #[test]
    fn walled_grid_has_fixed_start_and_end() {
        let g = Grid::walled(9).unwrap();
        assert_eq!(g.dimensions(), 9);
        assert_eq!(g.size(), 81);
        assert_eq!(g.start(), gc(1, 1));
        assert_eq!(g.end(), gc(7, 7));
        assert_eq!(g.walkable_count(), 0);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let g = open_5x5();
        assert_eq!(g.kind_at(gc(5, 1)), CellKind::Wall);
        assert_eq!(g.kind_at(gc(1, 5)), CellKind::Wall);
        assert_eq!(g.kind_at(gc(usize::MAX, usize::MAX)), CellKind::Wall);
        assert!(!g.is_walkable(gc(100, 0)));
    }

    #[test]
    fn kinds_from_rows() {
        let g = open_5x5();
        assert_eq!(g.kind_at(gc(1, 1)), CellKind::Start);
        assert_eq!(g.kind_at(gc(3, 3)), CellKind::End);
        assert_eq!(g.kind_at(gc(2, 2)), CellKind::Path);
        assert_eq!(g.kind_at(gc(0, 2)), CellKind::Wall);
        assert_eq!(g.start(), gc(1, 1));
        assert_eq!(g.end(), gc(3, 3));
        assert_eq!(g.walkable_count(), 9);
    }

    #[test]
    fn neighbours_come_in_compass_order() {
        let g = open_5x5();
        assert_eq!(&*g.neighbours(gc(2, 2)), &[gc(2, 1), gc(3, 2), gc(2, 3), gc(1, 2)]);
        assert_eq!(&*g.neighbours(gc(1, 1)), &[gc(2, 1), gc(1, 2)]);
        assert_eq!(&*g.neighbours(gc(3, 3)), &[gc(3, 2), gc(2, 3)]);
        assert!(g.neighbours(gc(0, 0)).is_empty());
    }

    #[test]
    fn neighbours_skip_walls() {
        let g = Grid::from_rows(&["#####",
                                  "#S#.#",
                                  "#.#.#",
                                  "#..E#",
                                  "#####"])
            .unwrap();
        let sorted = g.neighbours(gc(1, 1)).iter().cloned().sorted().collect::<Vec<_>>();
        assert_eq!(sorted, vec![gc(1, 2)]);
        assert_eq!(&*g.neighbours(gc(3, 2)), &[gc(3, 1), gc(3, 3)]);
    }

    #[test]
    fn bad_layouts_are_rejected() {
        let not_square = Grid::from_rows(&["#####", "#S.E#", "#####", "#####", "####"]);
        let even = Grid::from_rows(&["####", "#SE#", "#..#", "####"]);
        let two_starts = Grid::from_rows(&["#####", "#S.S#", "#...#", "#..E#", "#####"]);
        let no_end = Grid::from_rows(&["#####", "#S..#", "#...#", "#...#", "#####"]);
        let bad_glyph = Grid::from_rows(&["#####", "#S.x#", "#...#", "#..E#", "#####"]);
        for result in vec![not_square, even, two_starts, no_end, bad_glyph] {
            match result {
                Err(Error(ErrorKind::InvalidGridLayout(_), _)) => {}
                other => panic!("expected a layout error, got {:?}", other),
            }
        }
    }

    #[test]
    fn row_major_iteration() {
        let g = open_5x5();
        let coords = g.iter().take(6).collect::<Vec<_>>();
        assert_eq!(coords, vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(3, 0), gc(4, 0), gc(0, 1)]);
        assert_eq!(g.iter().count(), 25);
    }

    #[test]
    fn carving_and_bounds() {
        let mut g = Grid::walled(5).unwrap();
        g.carve(gc(2, 2));
        assert_eq!(g.kind_at(gc(2, 2)), CellKind::Path);
        assert_eq!(g.walkable_count(), 1);

        let before = g.clone();
        g.carve(gc(5, 5));
        g.set_kind(gc(usize::MAX, 0), CellKind::End);
        assert_eq!(g, before);
    }

    #[test]
    fn passage_graph_of_open_room_has_cycles() {
        let g = open_5x5();
        let graph = g.passage_graph();
        assert_eq!(graph.node_count(), 9);
        assert_eq!(graph.edge_count(), 12);
        assert_eq!(connected_components(&graph), 1);
        assert!(is_cyclic_undirected(&graph));
    }

    #[test]
    fn display_uses_glyphs() {
        let g = Grid::from_rows(&["#####",
                                  "#S..#",
                                  "###.#",
                                  "#..E#",
                                  "#####"])
            .unwrap();
        assert_eq!(format!("{}", g), "#####\n#S  #\n### #\n#  E#\n#####\n");
    }
}
