pub mod editing;
pub mod io;

// Re-export key types for easier usage
pub use editing::{
    bookmark::*, bus::*, convert::*, document::*, fragment::*, interval::*, spans::*,
};
pub use io::*;
