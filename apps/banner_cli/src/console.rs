//! Line-oriented operator console.

use std::path::PathBuf;

use banner_core::Command;
use shared::domain::LeadForm;

pub const HELP: &str = "\
commands:
  next | prev | goto N        move between slides
  hover on|off                pause or resume autoplay
  cta                         open the lead form for the current course
  close                       close the lead form
  lead NAME|EMAIL|PHONE       submit the lead form
  copy COURSE                 generate a campaign for COURSE
  image N | prompt N          generate an image or photo brief for slide N
  export [PATH]               write campaigns to a JSON file
  import PATH                 load campaigns from a JSON file
  show                        print the current state
  quit";

#[derive(Debug)]
pub enum ConsoleInput {
    Engine(Command),
    /// Slide-addressed generation; resolved against the current campaign list.
    ImageAt(usize),
    PromptAt(usize),
    Show,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<ConsoleInput>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let input = match verb.to_ascii_lowercase().as_str() {
        "next" => ConsoleInput::Engine(Command::Next),
        "prev" | "previous" => ConsoleInput::Engine(Command::Previous),
        "goto" => ConsoleInput::Engine(Command::GoTo {
            index: parse_index(rest)?,
        }),
        "hover" => match rest {
            "on" => ConsoleInput::Engine(Command::SetHover { hovering: true }),
            "off" => ConsoleInput::Engine(Command::SetHover { hovering: false }),
            _ => return Err("usage: hover on|off".into()),
        },
        "cta" => ConsoleInput::Engine(Command::OpenLeadModal),
        "close" => ConsoleInput::Engine(Command::CloseLeadModal),
        "lead" => ConsoleInput::Engine(Command::SubmitLead {
            form: parse_lead(rest)?,
        }),
        // Blank course names reach the engine, which ignores them.
        "copy" => ConsoleInput::Engine(Command::GenerateCopy {
            course: rest.to_string(),
        }),
        "image" => ConsoleInput::ImageAt(parse_index(rest)?),
        "prompt" => ConsoleInput::PromptAt(parse_index(rest)?),
        "export" => ConsoleInput::Engine(Command::Export {
            path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        }),
        "import" if !rest.is_empty() => ConsoleInput::Engine(Command::ImportFile {
            path: PathBuf::from(rest),
        }),
        "import" => return Err("usage: import PATH".into()),
        "show" => ConsoleInput::Show,
        "help" | "?" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(input))
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .map_err(|_| format!("expected a slide number, got '{raw}'"))
}

fn parse_lead(raw: &str) -> Result<LeadForm, String> {
    let mut fields = raw.split('|').map(str::trim);
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(email), Some(phone), None) => Ok(LeadForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }),
        _ => Err("usage: lead NAME|EMAIL|PHONE".into()),
    }
}
