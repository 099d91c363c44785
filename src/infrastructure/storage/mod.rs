mod local_store;
mod memory_store;
mod store_factory;

pub use local_store::LocalDocumentStore;
pub use memory_store::InMemoryDocumentStore;
pub use store_factory::DocumentStoreFactory;
