pub mod commander;
pub mod error;
pub mod types;

pub use commander::{CommanderProgrammer, ImageProgrammer};
pub use types::{ImageSet, ImageSpec};
