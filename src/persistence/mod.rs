pub mod files;
pub mod gateway;
pub mod settings;
pub mod store;

pub use files::{
    atomic_write, backup_file, backup_name, ensure_dir, get_data_dir, init_local_data_dir,
    read_bytes, read_file, DATA_DIR_NAME,
};
pub use gateway::{parse_state, Gateway, STORAGE_KEY};
pub use settings::{load_settings, save_settings, Settings, SETTINGS_FILE};
pub use store::{FileStore, KeyValueStore, MemoryStore};
