pub mod cli_commands;
