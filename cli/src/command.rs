use std::str::FromStr;

use memorito_core::TileIndex;

pub const HELP: &str = "\
commands:
  <n>, flip <n>   reveal tile n
  new             start a new game
  show            redraw the board
  help            this text
  quit            leave";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Flip(TileIndex),
    New,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = match (words.next(), words.next()) {
            (Some("flip" | "f"), Some(index)) => Self::Flip(parse_index(index)?),
            (Some("new" | "n"), None) => Self::New,
            (Some("show" | "s") | None, None) => Self::Show,
            (Some("help" | "h" | "?"), None) => Self::Help,
            (Some("quit" | "q" | "exit"), None) => Self::Quit,
            (Some(word), None) if word.starts_with(|c: char| c.is_ascii_digit()) => Self::Flip(parse_index(word)?),
            _ => return Err(format!("unknown command {:?}, try \"help\"", line.trim())),
        };
        match words.next() {
            Some(extra) => Err(format!("unexpected {extra:?} after command")),
            None => Ok(command),
        }
    }
}

fn parse_index(word: &str) -> Result<TileIndex, String> {
    word.parse().map_err(|_| format!("{word:?} is not a tile number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_flip_tiles() {
        assert_eq!("3".parse::<Command>(), Ok(Command::Flip(3)));
        assert_eq!("  flip 17 ".parse::<Command>(), Ok(Command::Flip(17)));
        assert_eq!("f 0".parse::<Command>(), Ok(Command::Flip(0)));
    }

    #[test]
    fn keywords_and_empty_line() {
        assert_eq!("new".parse::<Command>(), Ok(Command::New));
        assert_eq!("".parse::<Command>(), Ok(Command::Show));
        assert_eq!("?".parse::<Command>(), Ok(Command::Help));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("flip".parse::<Command>().is_err());
        assert!("flip x".parse::<Command>().is_err());
        assert!("3x".parse::<Command>().is_err());
        assert!("new game".parse::<Command>().is_err());
        assert!("flip 1 2".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }
}
