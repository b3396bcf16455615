pub mod app;
pub mod event;
pub mod layout;
pub mod tabs;
pub mod view;
pub mod widgets;
