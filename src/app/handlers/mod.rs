pub mod export;
pub mod frame;
pub mod session;

pub use export::ExportHandler;
pub use frame::FrameHandler;
pub use session::SessionHandler;
