pub mod models;
pub mod rpc;
pub mod traits;

pub use models::*;
pub use rpc::*;
pub use traits::*;
