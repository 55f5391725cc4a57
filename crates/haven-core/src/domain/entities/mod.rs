mod favorite;
mod property;
mod user;

pub use favorite::*;
pub use property::*;
pub use user::*;
