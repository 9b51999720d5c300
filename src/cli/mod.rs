use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "MIDI monitor and prober", long_about = None)]
pub struct Args {
    /// List available MIDI devices
    #[arg(long)]
    pub device_list: bool,

    /// Input port to monitor (substring of the port name)
    #[arg(long)]
    pub input: Option<String>,

    /// Output port for sent messages (substring of the port name)
    #[arg(long)]
    pub output: Option<String>,

    /// Settings file (default: ~/.config/midiprobe/settings.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show System Exclusive events instead of ignoring them
    #[arg(long)]
    pub show_sysex: bool,

    /// Show clock and MTC events instead of ignoring them
    #[arg(long)]
    pub show_time: bool,

    /// Show Active Sensing events instead of ignoring them
    #[arg(long)]
    pub show_active_sensing: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log received messages and send typed ones (default)
    Monitor,
    /// Send one message to the output port
    Send {
        /// Hex bytes, e.g. `90 3c 40`
        #[arg(required = true)]
        bytes: Vec<String>,
    },
    /// Describe a message without opening any device
    Classify {
        /// Hex bytes, e.g. `f0 01 02 f7`
        bytes: Vec<String>,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Monitor)
    }
}

pub fn handle_device_list() -> Vec<String> {
    // Re-export from the crate root
    crate::handle_device_list()
}

pub fn validate_device(device_name: &str, devices: &[String]) -> Result<(), String> {
    if !devices.iter().any(|d| d.contains(device_name)) {
        let mut error_msg = format!(
            "Error: Device '{}' not found in available devices:\n",
            device_name
        );
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        return Err(error_msg);
    }
    Ok(())
}
