pub mod commands;
pub mod ui;
pub mod util;

pub use util::{CommandContext, build_selection, split_ids};
