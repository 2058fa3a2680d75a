mod measurement;
mod options;
mod reader;
mod replay;

pub use measurement::*;
pub use options::*;
pub use reader::*;
pub use replay::*;
