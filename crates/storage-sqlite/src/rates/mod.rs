mod model;
mod repository;

#[cfg(test)]
mod repository_tests;

pub use model::RateDB;
pub use repository::RateRepository;
