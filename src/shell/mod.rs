pub mod command;
pub mod parse;

use crate::{
    disk::init::{perform_disk_initialization, Driver},
    driver::MdadmError,
    shell::{command::execute_command, parse::parse_command},
    Args,
};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::{
    error::Error,
    io::stdout,
    path::PathBuf,
    sync::mpsc,
    thread,
    time::Duration,
};

/// 启动线程向 shell 汇报的进度
pub enum BootProgress {
    Step(&'static str),
    Progress(u64),
    Finished(Result<Driver, Box<dyn Error + Send + Sync>>),
}

pub const COMMANDS: [&str; 12] = [
    "help", "mount", "unmount", "status", "read", "write", "fill", "locate", "sign", "info",
    "format", "exit",
];

pub fn start_shell(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut driver = boot(args)?;

    let username = whoami::username();
    let hostname = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string());

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    // 初始化 reedline
    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".minijbod_history");

    let mut line_editor = Reedline::create().with_history(Box::new(
        reedline::FileBackedHistory::with_file(100, history_path)?,
    ));

    // 命令补全
    let completer = reedline::DefaultCompleter::new_with_wordlen(
        COMMANDS.iter().map(|s| s.to_string()).collect(),
        2,
    );
    line_editor = line_editor.with_completer(Box::new(completer));

    let right = DefaultPromptSegment::Basic("MiniJBOD".bright_blue().bold().to_string());

    loop {
        let state = if driver.is_mounted() {
            "mounted".green()
        } else {
            "unmounted".red()
        };
        let left = format!(
            "{}:{}",
            format!("{}@{}", username, hostname).green().bold(),
            state
        );
        let prompt = DefaultPrompt::new(DefaultPromptSegment::Basic(left), right.clone());

        let input = line_editor.read_line(&prompt);

        match input {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        if let Err(e) = execute_command(&cmd, &mut driver) {
                            match e.downcast_ref::<MdadmError>() {
                                Some(me) => println!(
                                    "{} {} {}",
                                    "❌ Error:".red().bold(),
                                    me,
                                    format!("(code {})", me.code()).bright_black()
                                ),
                                None => println!("{} {}", "❌ Error:".red().bold(), e),
                            }
                        }
                        if matches!(cmd, command::Command::Exit) {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown command or bad arguments. Type 'help' for command list."
                            .yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting MiniJBOD...".yellow());
                break;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    // 退出前卸载，镜像文件的写入已经直接落盘
    if driver.is_mounted() {
        driver.unmount()?;
    }
    println!("{}", "GoodBye!".bright_yellow());
    Ok(())
}

/// 在后台线程里打开并挂载阵列，前台显示进度
fn boot(args: &Args) -> Result<Driver, Box<dyn Error>> {
    let mut stdout = stdout();
    let animate = !args.no_boot_animation;

    if animate {
        execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    }
    println!("{}", "[MiniJBOD Booting...]".bright_yellow().bold());

    let image = (!args.memory).then(|| args.image.clone());
    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || perform_disk_initialization(image, tx));

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("=> "),
    );

    let mut result = None;
    for msg in rx {
        match msg {
            BootProgress::Step(step) => pb.println(step),
            BootProgress::Progress(i) => pb.set_position(i),
            BootProgress::Finished(r) => {
                result = Some(r);
                break;
            }
        }
    }
    let _ = worker.join();

    let driver = match result {
        Some(Ok(driver)) => driver,
        Some(Err(e)) => {
            pb.abandon_with_message("❌ Boot failed");
            let e: Box<dyn Error> = e;
            return Err(e);
        }
        None => {
            pb.abandon_with_message("❌ Boot failed");
            return Err("boot thread exited without reporting".into());
        }
    };
    pb.finish_with_message("✅ Ready!");

    if animate {
        thread::sleep(Duration::from_millis(400));
        execute!(
            stdout,
            Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Cyan),
            Print(format!("Welcome to MiniJBOD v{}\n", env!("CARGO_PKG_VERSION"))),
            ResetColor
        )?;
    }

    Ok(driver)
}
