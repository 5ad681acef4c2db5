use clap::{Args as ClapArgs, Parser, Subcommand};
use log::debug;

use crate::api::status::is_success;
use crate::api::FtpBridge;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "ftp-bridge", version, subcommand_required = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage saved connection profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Upload a local file
    Upload {
        #[command(flatten)]
        target: Target,
        /// Local file to send
        local: String,
        /// Destination path on the server
        remote: String,
    },
    /// Download a remote file
    Download {
        #[command(flatten)]
        target: Target,
        /// File on the server
        remote: String,
        /// Where to write it locally
        local: String,
    },
    /// List the names in a remote directory
    Ls {
        #[command(flatten)]
        target: Target,
        /// Remote directory
        #[arg(default_value = "/")]
        remote: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Create or overwrite a profile
    Save {
        name: String,
        #[arg(long)]
        host: String,
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        password: String,
        /// Use explicit FTPS
        #[arg(long)]
        ssl: bool,
    },
    /// Remove a profile from the user configuration
    Delete { name: String },
    /// Print every known profile name
    List,
}

/// Where a transfer goes: a saved profile or explicit connection options.
#[derive(ClapArgs, Debug)]
pub struct Target {
    /// Saved profile to use
    #[arg(long, conflicts_with_all = ["host", "username", "password", "ssl"])]
    pub profile: Option<String>,
    /// FTP server, optionally with `:port`
    #[arg(long, required_unless_present = "profile")]
    pub host: Option<String>,
    /// Login name (default `anonymous`)
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Use explicit FTPS
    #[arg(long)]
    pub ssl: bool,
}

impl Command {
    // Passwords are part of the arguments, so only the name is logged.
    fn name(&self) -> &'static str {
        match self {
            Command::Profile { .. } => "profile",
            Command::Upload { .. } => "upload",
            Command::Download { .. } => "download",
            Command::Ls { .. } => "ls",
        }
    }
}

impl Target {
    fn host(&self) -> &str {
        self.host.as_deref().unwrap_or_default()
    }

    fn username(&self) -> &str {
        self.username.as_deref().unwrap_or("anonymous")
    }

    fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}

/// Run one command. The error carries the `ERROR: ...` status line.
pub fn run_cli(args: Args, bridge: &mut FtpBridge) -> Result<(), String> {
    debug!("Running {} command", args.command.name());
    let mut names = Vec::new();

    let status = match &args.command {
        Command::Profile { action } => match action {
            ProfileAction::Save {
                name,
                host,
                username,
                password,
                ssl,
            } => bridge.save_profile(name, host, username, password, *ssl),
            ProfileAction::Delete { name } => bridge.delete_profile(name),
            ProfileAction::List => bridge.list_profiles(&mut names),
        },
        Command::Upload {
            target,
            local,
            remote,
        } => match &target.profile {
            Some(profile) => bridge.upload_file_with_profile(local, remote, profile),
            None => bridge.upload_file_to(
                local,
                remote,
                target.host(),
                target.username(),
                target.password(),
                target.ssl,
            ),
        },
        Command::Download {
            target,
            remote,
            local,
        } => match &target.profile {
            Some(profile) => bridge.download_file_with_profile(remote, local, profile),
            None => bridge.download_file_from(
                remote,
                local,
                target.host(),
                target.username(),
                target.password(),
                target.ssl,
            ),
        },
        Command::Ls { target, remote } => match &target.profile {
            Some(profile) => bridge.list_directory_with_profile(remote, &mut names, profile),
            None => bridge.list_directory_on(
                remote,
                &mut names,
                target.host(),
                target.username(),
                target.password(),
                target.ssl,
            ),
        },
    };

    if !is_success(&status) {
        return Err(status);
    }
    for name in &names {
        println!("{}", name);
    }
    println!("{}", status);
    Ok(())
}
