// Shared types
pub mod types;

// Engine building blocks, leaf-first
pub mod extract;
pub mod containers;
pub mod assemble;
pub mod store;
pub mod paginate;
pub mod export;
