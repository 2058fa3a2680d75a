mod history;
mod metric;
mod publisher;
mod reading;

pub use history::*;
pub use metric::*;
pub use publisher::*;
pub use reading::*;
