pub mod boolean;
pub mod intersect;
