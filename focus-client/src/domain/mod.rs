mod ids;
mod session;
mod task;

pub use ids::*;
pub use session::*;
pub use task::*;
