//! MySQL implementations of the repository traits.

mod favorite_repository;
mod property_repository;
mod user_repository;

pub use favorite_repository::MySqlFavoriteRepository;
pub use property_repository::MySqlPropertyRepository;
pub use user_repository::MySqlUserRepository;
