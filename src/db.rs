pub mod repository;
pub use repository::Repository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod prestador_repo;
pub use prestador_repo::PrestadorRepository;
