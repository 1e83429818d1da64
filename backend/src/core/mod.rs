pub mod app;
pub mod input;
pub mod models;
pub mod navigation;
pub mod render;
pub mod source;
pub mod state;
pub mod storage;
pub mod sync;
