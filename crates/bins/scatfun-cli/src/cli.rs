use crate::{args::SubCommand, config::Config, error::CliError};

/// ANSI color codes.
pub mod ansi {
    pub const BRIGHT_YELLOW: &str = "\u{001b}[33m";
    pub const RESET: &str = "\u{001b}[0m";

    pub const RED_EXCLAMATION: &str = "\u{001b}[31m!\u{001b}[0m";
    pub const CYAN_CHECK: &str = "\u{001b}[36m✓\u{001b}[0m";

    pub const CYAN_MINUS: &str = "\u{001b}[36m-\u{001b}[0m";
}

mod cmd_check;
mod cmd_convert;
mod cmd_info;

pub use cmd_check::CheckOptions;
pub use cmd_convert::ConvertOptions;
pub use cmd_info::InfoOptions;

/// Entry point of scatfun CLI.
pub fn run(cmd: SubCommand, config: Config) -> Result<(), CliError> {
    match cmd {
        SubCommand::Info(opts) => cmd_info::print_info(opts, config),
        SubCommand::Check(opts) => cmd_check::check(opts, config),
        SubCommand::Convert(opts) => cmd_convert::convert(opts, config),
    }
}
