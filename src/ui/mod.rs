pub mod app;
pub mod events;
pub mod layout;
pub mod renderer;
pub mod widgets;

pub use app::App;
pub use events::{Action, AppEvent};
