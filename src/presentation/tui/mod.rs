pub mod app;
pub mod event;
pub mod logs;
pub mod widgets;
