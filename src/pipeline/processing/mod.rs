// Pipeline processing: category expansion and cleaning

pub mod categories;
pub mod cleaner;
