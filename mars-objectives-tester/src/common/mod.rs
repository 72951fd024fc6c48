pub mod scenario;
pub mod util;

pub use util::{board_digest, split_csv};
