pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod table;
pub mod transforms;
