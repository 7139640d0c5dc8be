//! Console command line parsing. Each line becomes at most one [`Msg`].

use surplus_core::{AppViewModel, Msg};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Send(Msg),
    Help,
    Redraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum CommandError {
    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error("no entry #{0} in the list")]
    NoSuchEntry(usize),
}

pub(crate) const HELP: &str = "\
Commands:
  keywords [WORDS...]      any word found in the vendor name matches (empty clears)
  vendor [NAME | #N]       only offers from this vendor (empty clears)
  price MIN [MAX]          price range, blank MAX means the default ceiling
  radius KM                search radius
  location LAT LNG | clear search centre
  interval SECS            refresh interval
  apply                    apply the edited settings
  save                     apply and write them to the config file
  refresh                  poll right now
  show N                   details of offer #N
  quit";

/// Parses one input line. `view` resolves list positions to ids.
pub(crate) fn parse_command(line: &str, view: &AppViewModel) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let msg = match word.to_lowercase().as_str() {
        "" => return Ok(Command::Redraw),
        "help" | "?" => return Ok(Command::Help),
        "keywords" | "k" => Msg::KeywordsEdited(rest.to_string()),
        "vendor" | "v" => Msg::VendorSelected(parse_vendor(rest, view)?),
        "price" | "p" => match args.as_slice() {
            [min] => Msg::PriceBoundsEdited {
                min: min.to_string(),
                max: String::new(),
            },
            [min, max] => Msg::PriceBoundsEdited {
                min: min.to_string(),
                max: max.to_string(),
            },
            _ => return Err(CommandError::Usage("price MIN [MAX]")),
        },
        "radius" => match args.as_slice() {
            [km] => Msg::RadiusEdited(km.to_string()),
            _ => return Err(CommandError::Usage("radius KM")),
        },
        "interval" => match args.as_slice() {
            [secs] => Msg::RefreshIntervalEdited(secs.to_string()),
            _ => return Err(CommandError::Usage("interval SECS")),
        },
        "location" | "loc" => match args.as_slice() {
            ["clear"] => Msg::LocationCleared,
            [lat, lng] => Msg::LocationSet {
                lat: parse_number(lat)?,
                lng: parse_number(lng)?,
            },
            _ => return Err(CommandError::Usage("location LAT LNG | clear")),
        },
        "apply" => Msg::ApplyClicked,
        "save" => Msg::SaveClicked,
        "refresh" | "r" => Msg::RefreshClicked,
        "show" | "s" => match args.as_slice() {
            [n] => {
                let index = parse_position(n)?;
                let row = view
                    .rows
                    .get(index - 1)
                    .ok_or(CommandError::NoSuchEntry(index))?;
                Msg::OfferSelected(row.id.clone())
            }
            _ => return Err(CommandError::Usage("show N")),
        },
        "quit" | "exit" | "q" => Msg::QuitRequested,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Send(msg))
}

/// `#N` picks from the vendor choices of the last cycle; anything else is
/// taken as the name itself.
fn parse_vendor(rest: &str, view: &AppViewModel) -> Result<Option<String>, CommandError> {
    if rest.is_empty() {
        return Ok(None);
    }
    match rest.strip_prefix('#') {
        Some(n) => {
            let index = parse_position(n)?;
            view.vendor_choices
                .get(index - 1)
                .cloned()
                .map(Some)
                .ok_or(CommandError::NoSuchEntry(index))
        }
        None => Ok(Some(rest.to_string())),
    }
}

fn parse_number(text: &str) -> Result<f64, CommandError> {
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::NotANumber(text.to_string()))
}

/// 1-based list position.
fn parse_position(text: &str) -> Result<usize, CommandError> {
    match text.parse::<usize>() {
        Ok(0) => Err(CommandError::NoSuchEntry(0)),
        Ok(n) => Ok(n),
        Err(_) => Err(CommandError::NotANumber(text.to_string())),
    }
}
