mod reader;
mod types;

pub use reader::PostReader;
pub use types::*;
