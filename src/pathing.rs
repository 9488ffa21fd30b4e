//! Path finding over a carved grid.
//!
//! Each search records the order in which it settled cells alongside the path it found, so a caller
//! can replay the exploration step by step. Nothing here is random: heap ties break on insertion order,
//! so the same grid, start and end always give the same trace.

use log::{debug, warn};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::cells::Coordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap, FnvHashSet};

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum SearchAlgorithm {
    BreadthFirst,
    DepthFirst,
    AStar,
    Dijkstra,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 4] = [SearchAlgorithm::BreadthFirst,
                                           SearchAlgorithm::DepthFirst,
                                           SearchAlgorithm::AStar,
                                           SearchAlgorithm::Dijkstra];

    pub fn name(self) -> &'static str {
        match self {
            SearchAlgorithm::BreadthFirst => "bfs",
            SearchAlgorithm::DepthFirst => "dfs",
            SearchAlgorithm::AStar => "astar",
            SearchAlgorithm::Dijkstra => "dijkstra",
        }
    }

    /// Parse a search name, falling back to breadth first with a warning when nothing matches.
    pub fn from_name_or_default(name: &str) -> SearchAlgorithm {
        name.parse().unwrap_or_else(|e: Error| {
            warn!("{}, searching with {} instead", e, SearchAlgorithm::default());
            SearchAlgorithm::default()
        })
    }
}

impl Default for SearchAlgorithm {
    fn default() -> Self {
        SearchAlgorithm::BreadthFirst
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SearchAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.chars()
            .filter(|c| *c != '-' && *c != '_' && *c != '*')
            .collect::<String>()
            .to_lowercase();
        match normalised.as_str() {
            "bfs" | "breadthfirst" => Ok(SearchAlgorithm::BreadthFirst),
            "dfs" | "depthfirst" => Ok(SearchAlgorithm::DepthFirst),
            "astar" | "a" => Ok(SearchAlgorithm::AStar),
            "dijkstra" => Ok(SearchAlgorithm::Dijkstra),
            _ => Err(ErrorKind::UnknownAlgorithm(s.to_string()).into()),
        }
    }
}

/// What a search found and how it got there.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolveResult {
    /// Start to end inclusive, or empty if the end could not be reached.
    pub path: Vec<Coordinate>,
    /// Every cell the search settled, in the order it settled them. Always holds at least the start.
    pub visited: Vec<Coordinate>,
}

impl SolveResult {
    #[inline]
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    #[inline]
    pub fn path_len(&self) -> usize {
        self.path.len()
    }
}

/// Runs searches over one grid. The grid is only ever read.
#[derive(Debug, Copy, Clone)]
pub struct PathfindingEngine<'a> {
    grid: &'a Grid,
}

impl<'a> PathfindingEngine<'a> {
    pub fn new(grid: &'a Grid) -> PathfindingEngine<'a> {
        PathfindingEngine { grid }
    }

    pub fn solve(&self, algorithm: SearchAlgorithm, start: Coordinate, end: Coordinate) -> SolveResult {
        let result = match algorithm {
            SearchAlgorithm::BreadthFirst => breadth_first(self.grid, start, end),
            SearchAlgorithm::DepthFirst => depth_first(self.grid, start, end),
            SearchAlgorithm::AStar => best_first(self.grid, start, end, Coordinate::manhattan_distance),
            SearchAlgorithm::Dijkstra => best_first(self.grid, start, end, |_, _| 0),
        };
        debug!("{} from {} to {}: visited {} cells, path of {} cells",
               algorithm, start, end, result.visited.len(), result.path_len());
        result
    }

    /// As `solve`, resolving the algorithm leniently from its name.
    pub fn solve_named(&self, algorithm_name: &str, start: Coordinate, end: Coordinate) -> SolveResult {
        self.solve(SearchAlgorithm::from_name_or_default(algorithm_name), start, end)
    }

    /// Solve between the grid's own start and end cells.
    pub fn solve_grid(&self, algorithm: SearchAlgorithm) -> SolveResult {
        self.solve(algorithm, self.grid.start(), self.grid.end())
    }
}

/// Per-call bookkeeping shared by every search, thrown away when the search returns.
struct SearchRecord {
    visited_order: Vec<Coordinate>,
    parents: FnvHashMap<Coordinate, Option<Coordinate>>,
}

impl SearchRecord {
    fn new(grid: &Grid, start: Coordinate) -> SearchRecord {
        let mut parents = utils::fnv_hashmap(grid.walkable_count());
        let _ = parents.insert(start, None);
        SearchRecord {
            visited_order: Vec::new(),
            parents,
        }
    }

    /// Follow parents back from `end` to the cell with no parent, then flip.
    fn found(self, end: Coordinate) -> SolveResult {
        let mut path = vec![end];
        let mut current = end;
        while let Some(&Some(parent)) = self.parents.get(&current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();

        SolveResult {
            path,
            visited: self.visited_order,
        }
    }

    fn exhausted(self) -> SolveResult {
        SolveResult {
            path: Vec::new(),
            visited: self.visited_order,
        }
    }
}

/// FIFO frontier. A cell is marked at discovery so it is queued at most once, and recorded as
/// visited when it comes off the queue.
fn breadth_first(grid: &Grid, start: Coordinate, end: Coordinate) -> SolveResult {
    let mut record = SearchRecord::new(grid, start);
    let mut discovered: FnvHashSet<Coordinate> = utils::fnv_hashset(grid.walkable_count());
    let mut frontier = VecDeque::new();

    let _ = discovered.insert(start);
    frontier.push_back(start);

    while let Some(cell) = frontier.pop_front() {
        record.visited_order.push(cell);
        if cell == end {
            return record.found(end);
        }

        for neighbour in grid.neighbours(cell).iter() {
            if discovered.insert(*neighbour) {
                let _ = record.parents.insert(*neighbour, Some(cell));
                frontier.push_back(*neighbour);
            }
        }
    }

    record.exhausted()
}

/// LIFO frontier. A cell can be pushed several times but is settled only on its first pop, taking the
/// parent it was pushed with. Neighbours go on reversed so the first in compass order is popped first.
fn depth_first(grid: &Grid, start: Coordinate, end: Coordinate) -> SolveResult {
    let mut record = SearchRecord::new(grid, start);
    let mut settled: FnvHashSet<Coordinate> = utils::fnv_hashset(grid.walkable_count());
    let mut frontier: Vec<(Coordinate, Option<Coordinate>)> = vec![(start, None)];

    while let Some((cell, parent)) = frontier.pop() {
        if !settled.insert(cell) {
            continue;
        }
        let _ = record.parents.insert(cell, parent);
        record.visited_order.push(cell);
        if cell == end {
            return record.found(end);
        }

        for neighbour in grid.neighbours(cell).iter().rev() {
            if !settled.contains(neighbour) {
                frontier.push((*neighbour, Some(cell)));
            }
        }
    }

    record.exhausted()
}

/// Priority frontier ordered by path cost so far plus `heuristic`, with stale entries skipped on pop.
/// A Manhattan heuristic gives A*, a zero heuristic gives Dijkstra. Every step costs one.
fn best_first<H>(grid: &Grid, start: Coordinate, end: Coordinate, heuristic: H) -> SolveResult
    where H: Fn(Coordinate, Coordinate) -> usize
{
    let mut record = SearchRecord::new(grid, start);
    let mut settled: FnvHashSet<Coordinate> = utils::fnv_hashset(grid.walkable_count());
    let mut costs: FnvHashMap<Coordinate, usize> = utils::fnv_hashmap(grid.walkable_count());
    // (estimated total cost, insertion sequence, cell); the sequence keeps equal estimates first in first out.
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0usize;

    let _ = costs.insert(start, 0);
    frontier.push(Reverse((heuristic(start, end), sequence, start)));

    while let Some(Reverse((_, _, cell))) = frontier.pop() {
        if !settled.insert(cell) {
            continue;
        }
        record.visited_order.push(cell);
        if cell == end {
            return record.found(end);
        }

        let cost_to_neighbour = costs.get(&cell).cloned().unwrap_or(0) + 1;
        for neighbour in grid.neighbours(cell).iter() {
            if settled.contains(neighbour) {
                continue;
            }
            let is_improvement = costs.get(neighbour).map_or(true, |known| cost_to_neighbour < *known);
            if is_improvement {
                let _ = costs.insert(*neighbour, cost_to_neighbour);
                let _ = record.parents.insert(*neighbour, Some(cell));
                sequence += 1;
                frontier.push(Reverse((cost_to_neighbour + heuristic(*neighbour, end), sequence, *neighbour)));
            }
        }
    }

    record.exhausted()
}
