pub mod app;
pub mod chart;
pub mod export;
pub mod theme;
