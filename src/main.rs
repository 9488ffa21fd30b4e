use docopt::Docopt;
use env_logger::Env;
use log::info;
use mazes::{
    grid::Grid,
    grid_displays::{GridDisplay, PathDisplay, VisitedDisplay},
    MazeAlgorithm,
    MazeGenerator,
    PathfindingEngine,
    SearchAlgorithm,
    SolveResult,
};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--size=<n>] [--seed=<s>] [--generator=<name>] [--solver=<name>] [--show-visited] [--text-out=<path>]

Options:
    -h --help              Show this screen.
    --size=<n>             The grid is n * n cells, rounded up to an odd size [default: 21].
    --seed=<s>             Seed for the maze generator. A random maze is made if not given.
    --generator=<name>     One of backtracking, prims, kruskals, ellers, binary, sidewinder, huntandkill [default: backtracking].
    --solver=<name>        One of bfs, dfs, astar, dijkstra [default: bfs].
    --show-visited         Mark every cell the solver explored with 'o' as well as the path with '.'.
    --text-out=<path>      Output file path for the textual rendering instead of standard output.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_size: usize,
    flag_seed: Option<u64>,
    flag_generator: String,
    flag_solver: String,
    flag_show_visited: bool,
    flag_text_out: String,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or("RUST_LOG", "info")).init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let algorithm = MazeAlgorithm::from_name_or_default(&args.flag_generator);
    let solver = SearchAlgorithm::from_name_or_default(&args.flag_solver);

    let mut generator = match args.flag_seed {
        Some(seed) => MazeGenerator::with_seed(seed),
        None => MazeGenerator::new(),
    };
    let maze_grid = generator.generate(args.flag_size, algorithm)?;

    let result = PathfindingEngine::new(&maze_grid).solve_grid(solver);
    info!("{} maze of size {} solved by {}: path {} cells, explored {} cells",
          algorithm,
          maze_grid.dimensions(),
          solver,
          result.path_len(),
          result.visited.len());

    let rendered = render_solution(&maze_grid, &result, args.flag_show_visited);
    if args.flag_text_out.is_empty() {
        print!("{}", rendered);
    } else {
        write_text_to_file(&rendered, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        info!("Wrote maze to {}", args.flag_text_out);
    }

    Ok(())
}

fn render_solution(maze_grid: &Grid, result: &SolveResult, show_visited: bool) -> String {
    let display: Box<dyn GridDisplay> = if show_visited {
        Box::new(VisitedDisplay::new(&result.path, &result.visited))
    } else {
        Box::new(PathDisplay::new(&result.path))
    };
    maze_grid.render_with(display.as_ref())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
