pub mod probe;

pub use probe::{Privilege, SystemTools, ToolExit, ToolProbe};
