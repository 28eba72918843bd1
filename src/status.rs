use std::fmt;

const fn code(group: u32, value: u32) -> u32 {
    (value << 16) | (group << 24)
}

const COMMON: u32 = 0x0;
const FILES: u32 = 0x3;
const BUFFER: u32 = 0xA;
const MEMORY: u32 = 0xE;

/// Numeric status codes the driver API reports for buffer operations.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StatusCode {
    Success = code(COMMON, 0x0),
    FileCantOpen = code(FILES, 0x1),
    FileCantCreate = code(FILES, 0x2),
    FileCantWrite = code(FILES, 0x5),
    FileCantRead = code(FILES, 0x6),
    BufferNotInitialized = code(BUFFER, 0x1),
    BufferZeroSize = code(BUFFER, 0x2),
    BufferWrongDataType = code(BUFFER, 0x4),
    BufferSizeIsExceeded = code(BUFFER, 0x6),
    BufferIsEmpty = code(BUFFER, 0x7),
    BufferAllocationZeroSize = code(BUFFER, 0xA),
    BufferInsufficientSize = code(BUFFER, 0xB),
    BufferWrongSize = code(BUFFER, 0xC),
    MemoryAllocationError = code(MEMORY, 0x2),
    Unknown = u32::MAX,
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|status| *status as u32 == value)
            .unwrap_or(Self::Unknown)
    }
}

impl StatusCode {
    /// Every known code; `Unknown` is the fallback, not a member.
    pub const ALL: &'static [StatusCode] = &[
        Self::Success,
        Self::FileCantOpen,
        Self::FileCantCreate,
        Self::FileCantWrite,
        Self::FileCantRead,
        Self::BufferNotInitialized,
        Self::BufferZeroSize,
        Self::BufferWrongDataType,
        Self::BufferSizeIsExceeded,
        Self::BufferIsEmpty,
        Self::BufferAllocationZeroSize,
        Self::BufferInsufficientSize,
        Self::BufferWrongSize,
        Self::MemoryAllocationError,
    ];

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "No errors.",
            Self::FileCantOpen => "Couldn't open the file.",
            Self::FileCantCreate => "Couldn't create the file.",
            Self::FileCantWrite => "Couldn't write data to the file.",
            Self::FileCantRead => "Couldn't read data from the file.",
            Self::BufferNotInitialized => "The buffer is not initialized.",
            Self::BufferZeroSize => "Buffer size is zero. Probably the buffer is not initialized.",
            Self::BufferWrongDataType => "The buffer has unsupported data type.",
            Self::BufferSizeIsExceeded => "Data buffer size is exceeded.",
            Self::BufferIsEmpty => "The buffer is empty.",
            Self::BufferAllocationZeroSize => {
                "There was an attempt to allocate a buffer of zero size."
            }
            Self::BufferInsufficientSize => "Buffer size is too small to contain all data.",
            Self::BufferWrongSize => "Buffer size is not correct.",
            Self::MemoryAllocationError => "Couldn't allocate memory.",
            Self::Unknown => "Unknown status code.",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}: {}", *self as u32, self.description())
    }
}
