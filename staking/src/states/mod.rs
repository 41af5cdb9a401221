pub mod pool_info;
pub use pool_info::*;

pub mod user_info;
pub use user_info::*;

pub mod outcome;
pub use outcome::*;

pub mod position;
pub use position::*;
