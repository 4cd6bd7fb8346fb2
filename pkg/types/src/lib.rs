pub mod cluster;
pub mod config;
pub mod node;
pub mod pod;
pub mod quota;
pub mod validate;
