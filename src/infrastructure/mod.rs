pub mod core;
pub mod factory;
pub mod market_data;
pub mod mock;
pub mod news;
pub mod persistence;
pub mod repositories;

pub use factory::ServiceFactory;
pub use persistence::CsvStore;
pub use repositories::InMemoryStore;
