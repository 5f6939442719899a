mod filesystem;
mod traits;

pub use filesystem::*;
pub use traits::*;
