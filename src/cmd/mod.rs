//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module   | Commands handled                          |
//! |----------|-------------------------------------------|
//! | `init`   | `Init`                                    |
//! | `board`  | `Board`, `Stages`, `List`, `Summary`      |
//! | `jobs`   | `Add`, `Edit`, `Move`, `Delete`           |
//! | `serve`  | `Serve`                                   |
//! | `config` | `Config`                                  |

pub mod board;
pub mod config;
pub mod init;
pub mod jobs;
pub mod serve;

pub use board::{cmd_board, cmd_list, cmd_stages, cmd_summary};
pub use config::cmd_config;
pub use init::cmd_init;
pub use jobs::{cmd_add, cmd_delete, cmd_edit, cmd_move};
pub use serve::cmd_serve;

use anyhow::{Context, Result};
use jobboard::config::BoardConfig;
use jobboard::storage::JsonFileStore;

/// Open the configured job file.
pub(crate) fn open_store(config: &BoardConfig) -> Result<JsonFileStore> {
    let path = config.data_file();
    JsonFileStore::open(&path)
        .with_context(|| format!("Failed to load job applications from {}", path.display()))
}
