use std::fmt;

use crate::error::FrameError;

/// Direction of a register operation, as encoded in byte 1 of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    Read = 0,
    Write = 1,
}

impl Command {
    /// Wire tag for this command.
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = FrameError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Command::Read),
            1 => Ok(Command::Write),
            other => Err(FrameError::UnknownCommand(other)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Read => f.write_str("READ"),
            Command::Write => f.write_str("WRITE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags() {
        assert_eq!(Command::Read.tag(), 0);
        assert_eq!(Command::Write.tag(), 1);
        assert_eq!(Command::try_from(0).unwrap(), Command::Read);
        assert_eq!(Command::try_from(1).unwrap(), Command::Write);
    }

    #[test]
    fn unknown_tag_rejected() {
        assert!(matches!(
            Command::try_from(7),
            Err(FrameError::UnknownCommand(7))
        ));
    }
}
