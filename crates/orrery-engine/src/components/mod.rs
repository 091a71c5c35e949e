pub mod body;
pub mod mesh;
pub mod trace;
