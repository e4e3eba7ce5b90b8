use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;

use crate::{
    disk::{
        init::Driver, JbodDevice, BLOCKS_PER_DISK, BLOCK_COUNT, BLOCK_SIZE, CAPACITY, DISK_SIZE,
        NUM_DISKS,
    },
    driver::{addr::Location, config::MAX_IO_SIZE, MdadmError},
    utils::hexdump,
};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Mount,
    Unmount,
    Status,
    Read(u32, u32),
    Write(u32, String),
    Fill(u32, u32, u8),
    Locate(u32),
    Sign(u32),
    Info,
    Format,
    Exit,
}

pub fn execute_command(cmd: &Command, driver: &mut Driver) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => print_help(),
        Command::Mount => {
            driver.mount()?;
            println!("{}", "✅ Array mounted".green());
        }
        Command::Unmount => {
            driver.unmount()?;
            println!("{}", "✅ Array unmounted".green());
        }
        Command::Status => {
            let jbod = driver.device();
            let (disk, block) = jbod.position();
            println!(
                "{}: {}\n{}: disk {} / block {}\n{}: {} (errno {})",
                "Driver".blue(),
                if driver.is_mounted() {
                    "mounted".green()
                } else {
                    "unmounted".red()
                },
                "Cursor".blue(),
                disk,
                block,
                "Last device error".blue(),
                jbod.last_error(),
                jbod.last_error().errno()
            );
        }
        Command::Read(addr, len) => {
            let mut buf = vec![0u8; (*len as usize).min(MAX_IO_SIZE)];
            let n = if buf.len() == *len as usize {
                driver.read_at(*addr, &mut buf)?
            } else {
                // 超长请求交给驱动报 LengthExceeded
                driver.read(*addr, *len, Some(&mut buf[..]))?
            };
            println!("📖 Read {} bytes from {:#x}", n, addr);
            print!("{}", hexdump(*addr, &buf[..n]).bright_black());
        }
        Command::Write(addr, text) => {
            let n = driver.write_at(*addr, text.as_bytes())?;
            println!("✏️  Wrote {} bytes at {:#x}", n, addr);
        }
        Command::Fill(addr, len, byte) => {
            match addr.checked_add(*len) {
                Some(end) if end as usize <= CAPACITY => {}
                _ => return Err(MdadmError::OutOfBounds { addr: *addr, len: *len }.into()),
            }

            // 超过单次上限的长度拆成多次写
            let data = vec![*byte; *len as usize];
            let mut done = 0;
            for chunk in data.chunks(MAX_IO_SIZE) {
                done += driver.write_at(*addr + done as u32, chunk)?;
            }
            println!("✏️  Filled {} bytes at {:#x} with {:#04x}", done, addr, byte);
        }
        Command::Locate(addr) => {
            if *addr as usize >= CAPACITY {
                return Err(format!("address {:#x} is outside the array", addr).into());
            }
            let loc = Location::from_addr(*addr as usize);
            let base = Location { offset: 0, ..loc }.to_addr();
            println!(
                "📍 {:#x} -> {} (block starts at {:#x})",
                addr,
                loc.to_string().cyan(),
                base
            );
        }
        Command::Sign(addr) => {
            let sig = driver.sign(*addr)?;
            println!(
                "🔏 Block at {} signs as {}",
                Location::from_addr(*addr as usize),
                format!("{:08x}", sig).bright_yellow()
            );
        }
        Command::Info => print_info(driver),
        Command::Format => {
            if driver.is_mounted() {
                return Err("unmount the array before formatting".into());
            }
            let confirmed = Confirm::new()
                .with_prompt("Erase every block of the array?")
                .default(false)
                .interact()?;
            if !confirmed {
                println!("{}", "Format cancelled".yellow());
                return Ok(());
            }

            println!("💾 Formatting JBOD array...");
            let pb = ProgressBar::new(BLOCK_COUNT as u64);
            pb.set_style(
                ProgressStyle::with_template("[{bar:40.green/black}] {pos:>5}/{len} blocks {msg}")?
                    .progress_chars("#>-"),
            );
            format_array(driver, |n| pb.set_position(n as u64))?;
            pb.finish_with_message("✅ Array formatted successfully!");
        }
        Command::Exit => println!("{}", "👋 Exiting MiniJBOD shell...".yellow().bold()),
    }

    Ok(())
}

/// 直接清零后端的所有块
///
/// 格式化绕过驱动与设备游标，只允许在阵列卸载时进行。
pub fn format_array(driver: &Driver, on_progress: impl FnMut(usize)) -> Result<(), Box<dyn Error>> {
    if driver.is_mounted() {
        return Err("unmount the array before formatting".into());
    }
    driver.device().disk().format(on_progress)?;
    Ok(())
}

fn print_info(driver: &Driver) {
    println!("{}", "📊 Array Info".bright_yellow().bold());
    println!(
        "{}: {} disks x {} blocks x {} bytes",
        "Geometry".blue(),
        NUM_DISKS,
        BLOCKS_PER_DISK,
        BLOCK_SIZE
    );
    println!(
        "{}: {} bytes ({} bytes per disk)",
        "Capacity".blue(),
        CAPACITY,
        DISK_SIZE
    );
    println!("{}: {} bytes", "Max transfer".blue(), MAX_IO_SIZE);

    match driver.device().disk().header() {
        Some(header) => {
            println!("{}: image file", "Backend".blue());
            println!("{}: {}", "Image id".blue(), header.id);
            println!(
                "{}: {}",
                "Created".blue(),
                header.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => println!("{}: memory (not persisted)", "Backend".blue()),
    }
}

fn print_help() {
    println!("{}", "📘 MiniJBOD Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  mount                  Mount the array
  unmount                Unmount the array
  status                 Show mount state and device cursor
  read <addr> <len>      Hex dump <len> bytes starting at <addr>
  write <addr> <text>    Write text at <addr>
  fill <addr> <len> <b>  Fill <len> bytes at <addr> with byte <b>
  locate <addr>          Show disk/block/offset of <addr>
  sign <addr>            Signature of the block holding <addr>
  info                   Show array geometry and image info
  format                 Zero every block of the array
  help                   Show this help message
  exit                   Quit the shell

  Numbers may be decimal or 0x-prefixed hex.
"
        .bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::{init::Backend, Jbod, MemDisk};
    use crate::driver::Mdadm;

    #[test]
    fn format_requires_unmounted_array() {
        let mut driver: Driver = Mdadm::new(Jbod::new(Backend::Memory(MemDisk::new())));
        driver.mount().unwrap();
        driver.write_at(0, &[0x5A; 16]).unwrap();

        let mut blocks = 0;
        assert!(format_array(&driver, |n| blocks = n).is_err());
        assert_eq!(blocks, 0);

        driver.unmount().unwrap();
        format_array(&driver, |n| blocks = n).unwrap();
        assert_eq!(blocks, BLOCK_COUNT);

        driver.mount().unwrap();
        let mut out = [0xFFu8; 16];
        driver.read_at(0, &mut out).unwrap();
        assert_eq!(out, [0; 16]);
    }

    #[test]
    fn read_command_rejects_oversized_length() {
        let mut driver: Driver = Mdadm::new(Jbod::new(Backend::Memory(MemDisk::new())));
        driver.mount().unwrap();

        let err = execute_command(&Command::Read(0, 4096), &mut driver).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MdadmError>(),
            Some(&MdadmError::LengthExceeded { len: 4096, max: MAX_IO_SIZE })
        );
        assert!(execute_command(&Command::Read(0, 16), &mut driver).is_ok());
    }
}
