//! Resume data, its section headings and the plain export

pub mod export;
pub mod model;
pub mod sections;

pub use export::{export, render, ExportFormat, ExportReport};
pub use model::Resume;
pub use sections::{blocks, Block, Headings, Section};
