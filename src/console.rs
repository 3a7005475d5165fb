/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{info, warn};
use std::io::BufRead;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{BuildingId, Floor};
use crate::storage::{CallIntake, Repository};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Call {
        building: BuildingId,
        floor: Floor,
    },
    Destination {
        building: BuildingId,
        pickup: Floor,
        destination: Floor,
    },
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}', expected call, dest or quit")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a valid number")]
    Number(String),
}

const CALL_USAGE: &str = "call <building> <floor>";
const DEST_USAGE: &str = "dest <building> <pickup> <destination>";

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match keyword {
        "call" => match args {
            [building, floor] => Command::Call {
                building: number(building)?,
                floor: number(floor)?,
            },
            _ => return Err(ParseError::Usage(CALL_USAGE)),
        },
        "dest" => match args {
            [building, pickup, destination] => Command::Destination {
                building: number(building)?,
                pickup: number(pickup)?,
                destination: number(destination)?,
            },
            _ => return Err(ParseError::Usage(DEST_USAGE)),
        },
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Feeds commands from `input` into `intake` until `quit` or end of input.
pub fn run_console<R: Repository, B: BufRead>(intake: &CallIntake<R>, input: B) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Call { building, floor })) => {
                if let Err(e) = intake.create_call(building, floor) {
                    warn!("Call rejected: {}", e);
                }
            }
            Ok(Some(Command::Destination {
                building,
                pickup,
                destination,
            })) => {
                if let Err(e) = intake.update_destination(building, pickup, destination) {
                    warn!("Destination rejected: {}", e);
                }
            }
            Err(e) => warn!("{}", e),
        }
    }
    info!("Console closed");
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, ParseError> {
    word.parse()
        .map_err(|_| ParseError::Number(word.to_string()))
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod console_tests {
    use super::*;
    use crate::shared::Building;
    use crate::storage::InMemoryRepository;
    use std::io::Cursor;
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("call 1 5"),
            Ok(Some(Command::Call {
                building: 1,
                floor: 5
            }))
        );
        assert_eq!(
            parse_command("  dest 2 0 3 "),
            Ok(Some(Command::Destination {
                building: 2,
                pickup: 0,
                destination: 3
            }))
        );
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_command("call 1"), Err(ParseError::Usage(CALL_USAGE)));
        assert_eq!(
            parse_command("call 1 -2"),
            Err(ParseError::Number("-2".into()))
        );
        assert_eq!(
            parse_command("open doors"),
            Err(ParseError::Unknown("open".into()))
        );
    }

    #[test]
    fn test_console_feeds_intake_until_quit() {
        // Purpose: Valid lines become calls, bad lines are skipped, nothing after quit is read

        // Arrange
        let repository = Arc::new(InMemoryRepository::new());
        repository
            .insert_building(Building {
                id: 1,
                name: "Main".into(),
                owner: "admin".into(),
                floors: 6,
                elevators: Vec::new(),
            })
            .unwrap();
        let intake = CallIntake::new(repository.clone());
        let input = Cursor::new("call 1 4\ncall 1 9\nbogus\ndest 1 4 0\nquit\ncall 1 2\n");

        // Act
        run_console(&intake, input);

        // Assert
        let calls = repository.calls().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].requested_floor, 4);
        assert_eq!(calls[0].destination_floor, Some(0));
    }
}
