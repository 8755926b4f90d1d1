/// npm command line adapters
mod npm_cli_lister;

pub use npm_cli_lister::{is_npm_installed, NpmCliLister};
