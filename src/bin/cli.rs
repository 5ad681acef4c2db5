use clap::Parser;
use ftp_bridge::ui::cli::cli_commands;
use ftp_bridge::utils::logging::init_logging;
use ftp_bridge::FtpBridge;

fn main() {
    init_logging();
    let args = cli_commands::Args::parse();
    let mut bridge = FtpBridge::new();
    if let Err(status) = cli_commands::run_cli(args, &mut bridge) {
        eprintln!("{}", status);
        drop(bridge);
        std::process::exit(1);
    }
}
