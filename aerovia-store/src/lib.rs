pub mod app_config;
pub mod events;
pub mod memory;
pub mod snapshot;

pub use app_config::{BusinessRules, Config};
pub use events::EventBus;
pub use memory::{MemoryStore, State};
