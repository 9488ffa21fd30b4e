//! Maze carving algorithms.
//!
//! Every algorithm starts from a solid grid and carves logical cells, which sit on odd coordinates,
//! plus the wall cells between them. The even rows and columns left standing are what make it a maze.
//! After carving, `generate` guarantees the end cell has an opening and stamps the start and end markers.

use log::{debug, trace, warn};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::cells::{CellKind, CompassPrimary, Coordinate, CoordinateSmallVec};
use crate::errors::*;
use crate::grid::Grid;
use crate::union_find::UnionFind;
use crate::utils::CellSet;

/// Chance that Eller's algorithm joins two horizontally adjacent cells from different sets.
const ELLERS_MERGE_PROBABILITY: f64 = 0.5;

/// Chance that sidewinder closes out its current run before reaching the eastern boundary.
const SIDEWINDER_CLOSE_OUT_PROBABILITY: f64 = 0.5;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum MazeAlgorithm {
    RecursiveBacktracker,
    Prims,
    Kruskals,
    Ellers,
    BinaryTree,
    Sidewinder,
    HuntAndKill,
}

impl MazeAlgorithm {
    pub const ALL: [MazeAlgorithm; 7] = [MazeAlgorithm::RecursiveBacktracker,
                                         MazeAlgorithm::Prims,
                                         MazeAlgorithm::Kruskals,
                                         MazeAlgorithm::Ellers,
                                         MazeAlgorithm::BinaryTree,
                                         MazeAlgorithm::Sidewinder,
                                         MazeAlgorithm::HuntAndKill];

    pub fn name(self) -> &'static str {
        match self {
            MazeAlgorithm::RecursiveBacktracker => "backtracking",
            MazeAlgorithm::Prims => "prims",
            MazeAlgorithm::Kruskals => "kruskals",
            MazeAlgorithm::Ellers => "ellers",
            MazeAlgorithm::BinaryTree => "binary",
            MazeAlgorithm::Sidewinder => "sidewinder",
            MazeAlgorithm::HuntAndKill => "huntandkill",
        }
    }

    /// Parse an algorithm name, falling back to recursive backtracking with a warning when nothing matches.
    pub fn from_name_or_default(name: &str) -> MazeAlgorithm {
        name.parse().unwrap_or_else(|e: Error| {
            warn!("{}, generating with {} instead", e, MazeAlgorithm::default());
            MazeAlgorithm::default()
        })
    }
}

impl Default for MazeAlgorithm {
    fn default() -> Self {
        MazeAlgorithm::RecursiveBacktracker
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MazeAlgorithm {
    type Err = Error;

    /// Case is ignored, as are `-` and `_`, so `Hunt-and-Kill` parses.
    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalised.as_str() {
            "backtracking" | "recursivebacktracker" | "backtracker" => Ok(MazeAlgorithm::RecursiveBacktracker),
            "prims" | "prim" => Ok(MazeAlgorithm::Prims),
            "kruskals" | "kruskal" => Ok(MazeAlgorithm::Kruskals),
            "ellers" | "eller" => Ok(MazeAlgorithm::Ellers),
            "binary" | "binarytree" => Ok(MazeAlgorithm::BinaryTree),
            "sidewinder" => Ok(MazeAlgorithm::Sidewinder),
            "huntandkill" | "huntkill" => Ok(MazeAlgorithm::HuntAndKill),
            _ => Err(ErrorKind::UnknownAlgorithm(s.to_string()).into()),
        }
    }
}

/// Owns the random source so a seed fully determines every maze it produces.
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    rng: XorShiftRng,
}

impl MazeGenerator {
    /// A generator seeded from operating system entropy.
    pub fn new() -> MazeGenerator {
        MazeGenerator { rng: XorShiftRng::from_entropy() }
    }

    /// A reproducible generator: the same seed, size and algorithm always give the same grid.
    pub fn with_seed(seed: u64) -> MazeGenerator {
        MazeGenerator { rng: XorShiftRng::seed_from_u64(seed) }
    }

    pub fn generate(&mut self, size: usize, algorithm: MazeAlgorithm) -> Result<Grid> {
        generate(size, algorithm, &mut self.rng)
    }

    /// As `generate`, resolving the algorithm leniently from its name.
    pub fn generate_named(&mut self, size: usize, algorithm_name: &str) -> Result<Grid> {
        self.generate(size, MazeAlgorithm::from_name_or_default(algorithm_name))
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        MazeGenerator::new()
    }
}

/// Carve a fresh `size` by `size` maze. Even sizes are rounded up to the next odd number.
///
/// Fails with `InvalidConfiguration` if the rounded size is too small to hold distinct start and end cells.
pub fn generate<R: Rng + ?Sized>(size: usize, algorithm: MazeAlgorithm, rng: &mut R) -> Result<Grid> {
    let mut grid = Grid::walled(size)?;

    match algorithm {
        MazeAlgorithm::RecursiveBacktracker => recursive_backtracker(&mut grid, rng),
        MazeAlgorithm::Prims => prims(&mut grid, rng),
        MazeAlgorithm::Kruskals => kruskals(&mut grid, rng),
        MazeAlgorithm::Ellers => ellers(&mut grid, rng),
        MazeAlgorithm::BinaryTree => binary_tree(&mut grid, rng),
        MazeAlgorithm::Sidewinder => sidewinder(&mut grid, rng),
        MazeAlgorithm::HuntAndKill => hunt_and_kill(&mut grid, rng),
    }

    let start = grid.start();
    grid.set_kind(start, CellKind::Start);
    ensure_end_reachable(&mut grid);

    debug!("Generated {} maze: {:?}", algorithm, grid);
    Ok(grid)
}

/// Force the end cell open and make sure at least one of its neighbours is too.
/// The end marker is stamped last so no carving can overwrite it.
pub(crate) fn ensure_end_reachable(grid: &mut Grid) {
    let end = grid.end();
    grid.carve(end);

    let adjacent = CompassPrimary::ALL
        .iter()
        .filter_map(|dir| end.offset(*dir, 1))
        .collect::<CoordinateSmallVec>();

    if !adjacent.iter().any(|coord| grid.is_walkable(*coord)) {
        if let Some(opening) = adjacent.iter().cloned().find(|coord| grid.is_interior(*coord)) {
            trace!("End {} was sealed in, opening {}", end, opening);
            grid.carve(opening);
        }
    }

    grid.set_kind(end, CellKind::End);
}

/// Apply the recursive backtracker maze generation algorithm to a grid.
///
/// A depth first carve from the start cell. Each cell visits its neighbours two strides away in a
/// freshly shuffled order, diving into each uncarved one before trying the next. Long twisty corridors
/// with few, long dead ends.
///
/// The call stack is held explicitly so large grids cannot overflow the thread's stack. Each frame
/// shuffles its directions on entry, the same point a recursive carve would.
pub fn recursive_backtracker<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    struct Frame {
        cell: Coordinate,
        directions: [CompassPrimary; 4],
        next: usize,
    }

    fn enter<R: Rng + ?Sized>(cell: Coordinate, rng: &mut R) -> Frame {
        let mut directions = CompassPrimary::ALL;
        directions.shuffle(rng);
        Frame { cell, directions, next: 0 }
    }

    let start = grid.start();
    grid.carve(start);
    let mut stack = vec![enter(start, rng)];

    loop {
        let (cell, direction) = match stack.last_mut() {
            Some(frame) => {
                let direction = frame.directions.get(frame.next).cloned();
                frame.next += 1;
                (frame.cell, direction)
            }
            None => break,
        };

        match direction {
            Some(dir) => {
                if let Some(next) = logical_neighbour(grid, cell, dir) {
                    if !grid.is_walkable(next) {
                        link(grid, cell, next);
                        stack.push(enter(next, rng));
                    }
                }
            }
            None => {
                let _ = stack.pop();
            }
        }
    }
}

/// Apply (randomised) Prim's maze generation algorithm to a grid.
///
/// Grows a single carved region. The frontier holds the uncarved logical cells bordering it; each step
/// takes a uniformly random frontier cell, joins it to a uniformly random carved neighbour and adds its
/// own uncarved neighbours to the frontier. Lots of short dead ends radiating from the start.
pub fn prims<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let start = grid.start();
    grid.carve(start);

    let mut frontier: Vec<Coordinate> = Vec::new();
    let mut in_frontier = CellSet::new(grid.dimensions());

    let mut extend_frontier = |grid: &Grid, cell: Coordinate, frontier: &mut Vec<Coordinate>| {
        for neighbour in logical_neighbours(grid, cell).iter() {
            if !grid.is_walkable(*neighbour) && in_frontier.insert(*neighbour) {
                frontier.push(*neighbour);
            }
        }
    };
    extend_frontier(grid, start, &mut frontier);

    while !frontier.is_empty() {
        let cell = frontier.swap_remove(rng.gen_range(0..frontier.len()));

        let carved = logical_neighbours(grid, cell)
            .into_iter()
            .filter(|neighbour| grid.is_walkable(*neighbour))
            .collect::<CoordinateSmallVec>();
        if let Some(&from) = carved.choose(rng) {
            link(grid, from, cell);
        }

        extend_frontier(grid, cell, &mut frontier);
    }
}

/// Apply (randomised) Kruskal's maze generation algorithm to a grid.
///
/// Every pair of logical cells two strides apart is a candidate edge. The edges are shuffled once and
/// accepted in that order whenever they join two different components, so no loop is ever closed.
/// The result is a uniformly shuffled spanning tree with a fairly even, spiky texture.
pub fn kruskals<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let cells = logical_cells(grid.dimensions()).collect::<Vec<_>>();
    let mut components = UnionFind::with_capacity(cells.len());
    let mut edges = Vec::with_capacity(cells.len() * 2);

    for cell in &cells {
        grid.carve(*cell);
        components.make_set(*cell);
        for dir in &[CompassPrimary::East, CompassPrimary::South] {
            if let Some(neighbour) = logical_neighbour(grid, *cell, *dir) {
                edges.push((*cell, neighbour));
            }
        }
    }

    edges.shuffle(rng);

    for (a, b) in edges {
        if components.union(a, b) {
            grid.carve(a.midpoint(b));
        }
    }
}

/// Apply Eller's maze generation algorithm to a grid.
///
/// Works one row at a time, holding only the set membership of the current row. Adjacent cells in
/// different sets are joined by a coin flip, then every set drops at least one passage into the row
/// below, which carries the set on. The final row joins every remaining distinct neighbour so the
/// whole maze ends up as one set.
pub fn ellers<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let logical = logical_dimension(grid);
    let mut row_sets: Vec<Option<usize>> = vec![None; logical];
    let mut next_set_id = 0;

    for row in 0..logical {
        let is_last_row = row + 1 == logical;

        for (column, set) in row_sets.iter_mut().enumerate() {
            if set.is_none() {
                *set = Some(next_set_id);
                next_set_id += 1;
            }
            grid.carve(logical_cell(column, row));
        }

        for column in 0..logical - 1 {
            let (left, right) = (row_sets[column], row_sets[column + 1]);
            if left != right && (is_last_row || rng.gen_bool(ELLERS_MERGE_PROBABILITY)) {
                for set in row_sets.iter_mut().filter(|set| **set == right) {
                    *set = left;
                }
                grid.carve(logical_cell(column, row).midpoint(logical_cell(column + 1, row)));
            }
        }

        if is_last_row {
            break;
        }

        // Ordered by set id so the random draws happen in a reproducible order.
        let mut set_members: BTreeMap<usize, SmallVec<[usize; 8]>> = BTreeMap::new();
        for (column, set) in row_sets.iter().enumerate() {
            if let Some(set_id) = set {
                set_members.entry(*set_id).or_insert_with(SmallVec::new).push(column);
            }
        }

        let mut next_row_sets = vec![None; logical];
        for (set_id, mut columns) in set_members {
            columns.shuffle(rng);
            let drops = rng.gen_range(1..=columns.len());
            for column in columns.iter().take(drops) {
                next_row_sets[*column] = Some(set_id);
                grid.carve(logical_cell(*column, row).midpoint(logical_cell(*column, row + 1)));
            }
        }
        row_sets = next_row_sets;
    }
}

/// Apply the binary tree maze generation algorithm to a grid.
///
/// Visits each logical cell in raster order and carves a passage either north or west with a coin
/// flip, or whichever of the two exists on the boundary. Every cell therefore has a route that only
/// ever heads north or west, so the top row and left column are unbroken corridors and the maze has a
/// strong diagonal bias toward the start corner. That bias is the nature of the algorithm.
pub fn binary_tree<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for cell in logical_cells(grid.dimensions()) {
        grid.carve(cell);

        let candidates = [CompassPrimary::North, CompassPrimary::West]
            .iter()
            .filter_map(|dir| logical_neighbour(grid, cell, *dir))
            .collect::<SmallVec<[Coordinate; 2]>>();

        if let Some(&link_coord) = candidates.choose(rng) {
            grid.carve(cell.midpoint(link_coord));
        }
    }
}

/// Apply the sidewinder maze generation algorithm to a grid.
///
/// Visits each row west to east, accumulating a run of cells joined eastward. At each cell a coin flip
/// decides whether to keep extending the run or close it out; the eastern boundary always closes it.
/// Closing a run carves one passage north from a uniformly chosen member of the run. The first row has
/// no north, so it can only ever be one long corridor.
pub fn sidewinder<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let logical = logical_dimension(grid);

    for row in 0..logical {
        let at_northern_boundary = row == 0;
        let mut run: SmallVec<[Coordinate; 16]> = SmallVec::new();

        for column in 0..logical {
            let cell = logical_cell(column, row);
            grid.carve(cell);
            run.push(cell);

            let at_eastern_boundary = column + 1 == logical;
            let should_close_out = at_eastern_boundary ||
                                   (!at_northern_boundary && rng.gen_bool(SIDEWINDER_CLOSE_OUT_PROBABILITY));

            if should_close_out {
                if !at_northern_boundary {
                    let north_wall = run.choose(rng).and_then(|member| member.offset(CompassPrimary::North, 1));
                    if let Some(wall) = north_wall {
                        grid.carve(wall);
                    }
                }
                run.clear();
            } else if let Some(wall) = cell.offset(CompassPrimary::East, 1) {
                grid.carve(wall);
            }
        }
    }
}

/// Apply the hunt and kill maze generation algorithm to a grid.
///
/// Random walks from the start, carving into uniformly chosen unvisited neighbours. When the walk
/// dead-ends, hunts the grid in raster order for the first unvisited cell bordering the carved region,
/// joins it to a random carved neighbour and walks on from there. Finishes when a hunt comes up empty.
pub fn hunt_and_kill<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let start = grid.start();
    grid.carve(start);
    let mut current = Some(start);

    while let Some(cell) = current {
        let unvisited = logical_neighbours(grid, cell)
            .into_iter()
            .filter(|neighbour| !grid.is_walkable(*neighbour))
            .collect::<CoordinateSmallVec>();

        current = match unvisited.choose(rng) {
            Some(&next) => {
                link(grid, cell, next);
                Some(next)
            }
            None => hunt(grid, rng),
        };
    }
}

fn hunt<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Coordinate> {
    for cell in logical_cells(grid.dimensions()) {
        if grid.is_walkable(cell) {
            continue;
        }

        let visited = logical_neighbours(grid, cell)
            .into_iter()
            .filter(|neighbour| grid.is_walkable(*neighbour))
            .collect::<CoordinateSmallVec>();

        if let Some(&from) = visited.choose(rng) {
            link(grid, from, cell);
            return Some(cell);
        }
    }
    None
}

/// Logical cells along one side of the grid.
#[inline]
fn logical_dimension(grid: &Grid) -> usize {
    (grid.dimensions() - 1) / 2
}

/// Grid coordinate of the logical cell at the given logical column and row.
#[inline]
fn logical_cell(column: usize, row: usize) -> Coordinate {
    Coordinate::new(column * 2 + 1, row * 2 + 1)
}

/// All logical cells of a grid with the given side length, in raster order.
fn logical_cells(dimension: usize) -> impl Iterator<Item = Coordinate> {
    let logical = (dimension - 1) / 2;
    (0..logical * logical).map(move |index| logical_cell(index % logical, index / logical))
}

/// The logical cell two strides away in `direction`, if it lies inside the outer wall.
#[inline]
fn logical_neighbour(grid: &Grid, cell: Coordinate, direction: CompassPrimary) -> Option<Coordinate> {
    cell.offset(direction, 2).filter(|neighbour| grid.is_interior(*neighbour))
}

/// Logical neighbours in North, East, South, West order.
fn logical_neighbours(grid: &Grid, cell: Coordinate) -> CoordinateSmallVec {
    CompassPrimary::ALL
        .iter()
        .filter_map(|dir| logical_neighbour(grid, cell, *dir))
        .collect()
}

/// Carve both logical cells and the wall between them.
#[inline]
fn link(grid: &mut Grid, a: Coordinate, b: Coordinate) {
    grid.carve(a);
    grid.carve(a.midpoint(b));
    grid.carve(b);
}
