//! Tags

pub mod collection;
pub mod string;
