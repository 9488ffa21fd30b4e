//! **mazes** is a maze generation, visualisation and route finding library.
//!
//! Mazes live on an odd sized square grid of wall and passage cells. The logical maze cells sit on the
//! odd coordinates with the cells between them acting as walls that a generator knocks through.
//! Seven generators carve perfect mazes and four searches solve them, each reporting the order it
//! explored the grid in.
//!
//! ```
//! use mazes::{MazeAlgorithm, MazeGenerator, PathfindingEngine, SearchAlgorithm};
//!
//! let mut generator = MazeGenerator::with_seed(7);
//! let grid = generator.generate(21, MazeAlgorithm::Prims).unwrap();
//! let result = PathfindingEngine::new(&grid).solve_grid(SearchAlgorithm::AStar);
//! assert_eq!(result.path.first(), Some(&grid.start()));
//! assert_eq!(result.path.last(), Some(&grid.end()));
//! ```

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod union_find;
mod utils;

pub use crate::cells::{CellKind, Coordinate};
pub use crate::generators::{MazeAlgorithm, MazeGenerator};
pub use crate::grid::Grid;
pub use crate::pathing::{PathfindingEngine, SearchAlgorithm, SolveResult};
