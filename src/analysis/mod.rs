pub mod aggregate;
pub mod cache;
pub mod error;
pub mod outliers;
pub mod recommend;
pub mod session;

pub use aggregate::*;
pub use cache::*;
pub use error::*;
pub use outliers::*;
pub use recommend::*;
pub use session::*;
