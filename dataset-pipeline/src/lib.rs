#![allow(clippy::missing_docs_in_private_items)]

pub mod assembler;
pub mod export;

pub use assembler::{assemble_dataset, AssemblyScope};
pub use export::export_dataset;
