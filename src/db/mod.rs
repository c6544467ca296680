pub mod mongo;
pub mod repository;
