pub mod entities;
pub mod maintenance;
pub mod misc;
pub mod schemas;
