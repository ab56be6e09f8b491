//! Application services layer: persistence contracts and the list-store
//! components composed by the facade.

pub mod cache;
pub mod codec;
pub mod records;
pub mod repos;
pub mod store;
pub mod versions;
