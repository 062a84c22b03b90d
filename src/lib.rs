pub mod cli;
pub mod error;
pub mod extractor;
pub mod fs;
pub mod graph;
pub mod resolver;
pub mod rewriter;
