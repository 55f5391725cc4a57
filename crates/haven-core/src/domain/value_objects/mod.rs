mod email;
mod listing;
mod role;
mod status;

pub use email::*;
pub use listing::*;
pub use role::*;
pub use status::*;
