pub mod common;
pub mod resolved;
pub mod tenant;
pub mod work_context;

pub use common::*;
pub use resolved::*;
pub use tenant::*;
pub use work_context::*;
