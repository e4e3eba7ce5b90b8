use std::path::PathBuf;

use clap::Parser;
use colored::*;

use crate::shell::start_shell;

mod disk;
mod driver;
mod shell;
mod utils;

/// Interactive shell over a linear-address JBOD array.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Disk image backing the array; created on first use.
    #[arg(long, default_value = "jbod.img")]
    image: PathBuf,

    /// Keep the array in memory instead of an image file.
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Skip the screen clearing and pauses while booting.
    #[arg(long, default_value_t = false)]
    no_boot_animation: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = start_shell(&args) {
        eprintln!("{} {}", "❌ Fatal:".red().bold(), e);
        std::process::exit(1);
    }
}
