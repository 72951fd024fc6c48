pub mod loader;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use loader::FileLoader;
pub use seeds::resolve_seed_inputs;
pub use tester::*;
