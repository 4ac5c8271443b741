//! Command definitions
//!
//! The closed set of calls a client can make.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    HelloWorld = 0x01,
    Add = 0x02,
    Select = 0x03,
    Remove = 0x04,
    SelectRange = 0x05,
    RemoveRange = 0x06,
}

impl CommandType {
    /// Map a wire byte back to a command type
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandType::HelloWorld),
            0x02 => Some(CommandType::Add),
            0x03 => Some(CommandType::Select),
            0x04 => Some(CommandType::Remove),
            0x05 => Some(CommandType::SelectRange),
            0x06 => Some(CommandType::RemoveRange),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connectivity check, answered with a greeting
    HelloWorld { name: String },

    /// Insert or overwrite a key-value pair
    Add { key: Vec<u8>, value: Vec<u8> },

    /// Look up a value by key
    Select { key: Vec<u8> },

    /// Delete a key
    Remove { key: Vec<u8> },

    /// Read all pairs in `[start, end]`
    SelectRange { start: Vec<u8>, end: Vec<u8> },

    /// Delete all pairs in `[start, end]` and return them
    RemoveRange { start: Vec<u8>, end: Vec<u8> },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::HelloWorld { .. } => CommandType::HelloWorld,
            Command::Add { .. } => CommandType::Add,
            Command::Select { .. } => CommandType::Select,
            Command::Remove { .. } => CommandType::Remove,
            Command::SelectRange { .. } => CommandType::SelectRange,
            Command::RemoveRange { .. } => CommandType::RemoveRange,
        }
    }

    /// True for commands that change the store
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Add { .. } | Command::Remove { .. } | Command::RemoveRange { .. }
        )
    }
}
