//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod lookup;
pub mod roots;
pub mod sequencing;
pub mod show;
pub mod summary;
pub mod version;
