//! Interactive terminal search

pub mod app;
pub mod render;
pub mod text_utils;
