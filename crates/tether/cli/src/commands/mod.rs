pub mod resolve;
pub mod slots;
pub mod tree;
