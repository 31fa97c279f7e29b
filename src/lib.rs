pub mod analyzers;
pub mod config;
pub mod fetch;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod store;
