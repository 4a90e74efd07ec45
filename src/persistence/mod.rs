pub mod files;
pub mod settings;
pub mod store;

pub use files::{config_file, ensure_pomora_dir, init_local_dir, log_file, store_file};
pub use settings::{load_settings, PlayerCommand, Settings};
pub use store::{keys, KvStore};
