use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    /// The CAN interface could not be opened.
    Connect(io::Error),
    /// Stability outside the unit interval.
    InvalidStability(f64),
    /// Identifier outside the 11-bit range.
    InvalidId(u16),
    /// Frame length outside 1..=8.
    InvalidLength(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connect(e) => write!(f, "failed to open CAN interface: {}", e),
            Error::InvalidStability(value) => {
                write!(f, "stability {} outside unit interval", value)
            }
            Error::InvalidId(id) => write!(f, "identifier 0x{:X} outside 11-bit range", id),
            Error::InvalidLength(length) => write!(f, "frame length {} outside 1..=8", length),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connect(e) => Some(e),
            _ => None,
        }
    }
}
