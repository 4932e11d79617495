pub mod in_memory_repository;
pub mod mapper;
pub mod media_repository_impl;

pub use in_memory_repository::InMemoryMediaRepository;
pub use media_repository_impl::MediaRepositoryImpl;
