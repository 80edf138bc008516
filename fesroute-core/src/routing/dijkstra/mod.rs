mod shortest_path;
mod state;

pub use shortest_path::{SolvedPath, edge_cost, shortest_path};
