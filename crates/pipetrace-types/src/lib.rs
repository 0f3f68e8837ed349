pub mod dump;
pub mod project;
pub mod report;

pub use dump::*;
pub use project::*;
pub use report::*;
