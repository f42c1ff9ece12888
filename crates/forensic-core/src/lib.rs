pub mod canonical;
pub mod diagnostics;
pub mod error;
pub mod score;
pub mod stats;
pub mod traits;
pub mod types;

pub use canonical::*;
pub use diagnostics::*;
pub use error::*;
pub use score::*;
pub use traits::*;
pub use types::*;
