pub mod state;

pub use state::MongoStateRepository;
