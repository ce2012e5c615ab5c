pub mod app;
pub mod events;
pub mod shell;
pub mod theme;
pub mod widgets;
