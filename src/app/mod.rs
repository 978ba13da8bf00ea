pub mod app_core;
pub mod app_events;
pub mod handlers;
pub mod state;
pub mod status;

pub use app_core::GestureApp;
pub use state::DataChannels;
