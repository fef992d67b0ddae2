pub mod config;
pub mod studio;
pub mod widget;
