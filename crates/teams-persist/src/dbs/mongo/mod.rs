pub mod client;
pub mod models;
pub mod repositories;

pub use client::MongoStorage;
pub use models::MongoStateDocument;
pub use repositories::MongoStateRepository;
