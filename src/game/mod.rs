//! Games the search engine is exercised with.

mod boxes;
pub use boxes::*;
mod tictactoe;
pub use tictactoe::*;
