#![warn(clippy::all, rust_2018_idioms)]
//! eframe front end of userdesk: navigation shell, pages and widgets on top
//! of `userdesk_business`.

pub mod app;
pub mod pages;
pub mod state;
pub mod utils;
pub mod widgets;

pub use app::UserDeskApp;
