pub mod compare;
pub mod merge;
pub mod writer;
