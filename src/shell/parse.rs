use crate::{shell::command::Command, utils::parse_number};

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];
    let number = |i: usize| args.get(i).and_then(|s| parse_number(s));

    match cmd {
        "help" => Some(Command::Help),
        "mount" => Some(Command::Mount),
        "unmount" => Some(Command::Unmount),
        "status" => Some(Command::Status),
        "read" => Some(Command::Read(number(0)?, number(1)?)),
        "write" => {
            if args.len() >= 2 {
                Some(Command::Write(number(0)?, args[1..].join(" ")))
            } else {
                None
            }
        }
        "fill" => {
            let byte = u8::try_from(number(2)?).ok()?;
            Some(Command::Fill(number(0)?, number(1)?, byte))
        }
        "locate" => Some(Command::Locate(number(0)?)),
        "sign" => Some(Command::Sign(number(0)?)),
        "info" => Some(Command::Info),
        "format" => Some(Command::Format),
        "exit" => Some(Command::Exit),
        _ => None,
    }
}
