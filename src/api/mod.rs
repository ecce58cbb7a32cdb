pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod tenant_extractor;

pub use handlers::*;
pub use middleware::*;
pub use routes::*;
