pub mod media_repository;

pub use media_repository::MediaRepository;
#[cfg(test)]
pub use media_repository::MockMediaRepository;
