pub mod header;
pub mod notice;
pub mod prayers;
pub mod statusbar;
pub mod sun;
