pub mod combine;
pub mod completion;
pub mod config;
pub mod pack;
pub mod plan;
pub mod tree;
