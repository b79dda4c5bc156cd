pub mod probe;
pub mod ticker;

pub use probe::spawn_probe;
pub use ticker::Ticker;
