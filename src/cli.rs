//! CLI domain: parse, route, and output only.
//! No hashing logic lives here; the route table dispatches to the pipeline and snapshot modules.

mod output;
mod parse;
mod route;

pub use output::{
    format_comparison_json, format_comparison_text, format_tree_json, format_tree_text, map_error,
};
pub use parse::{Cli, Commands, OutputFormat};
pub use route::{BuildOverrides, RunContext};
