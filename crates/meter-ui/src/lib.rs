//! Console front end: plain-text table and summary rendering, and the
//! interactive report menu.

pub mod menu;
pub mod table_view;
