//! Errors raised by maze generation and grid construction.
//!
//! `error_chain!` creates the `Error`, `ErrorKind`, `ResultExt` and `Result` types.
//! Other modules in this crate `use crate::errors::*;` to get at them.

use error_chain::error_chain;

use crate::grid::MIN_GRID_SIZE;

error_chain! {
    errors {
        // The requested maze size has no sane fallback, even after rounding up to odd.
        InvalidConfiguration(size: usize) {
            description("invalid maze configuration")
            display("maze size {} is below the minimum of {}", size, MIN_GRID_SIZE)
        }

        // An algorithm name that matches none of the known generators or searches.
        // Only strict parsing reports this, the lenient paths log it and fall back.
        UnknownAlgorithm(name: String) {
            description("unknown algorithm")
            display("unknown algorithm '{}'", name)
        }

        // A textual grid that cannot be turned into a `Grid`.
        InvalidGridLayout(reason: String) {
            description("invalid grid layout")
            display("invalid grid layout: {}", reason)
        }
    }
}
