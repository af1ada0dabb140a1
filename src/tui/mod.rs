pub mod app;
pub mod event;
pub mod ui;

pub use app::{Action, App, Screen};
pub use event::{Event, EventHandler};
