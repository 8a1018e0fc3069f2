mod output;
mod table;

pub use output::Output;
pub use table::{render_comparison, render_insights};
