pub mod in_memory_store;
pub mod yaml_store;
