mod repository;

pub use repository::InMemoryFundRepository;
