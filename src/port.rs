use crate::{Buffer, DataType, Element, DEFAULT_CAPACITY};
use std::{cmp::Ordering, fmt};

/// Description of one register-level I/O port.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PortInfo<'a> {
    pub address: u32,
    pub bit_size: u8,
    /// UTF-16 name, borrowed from the driver library.
    pub name: &'a [u16],
}

impl PortInfo<'_> {
    pub fn name(&self) -> String {
        String::from_utf16_lossy(self.name)
    }
}

impl fmt::Display for PortInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[name: {}, address: {}, bitSize: {}]",
            self.name(),
            self.address,
            self.bit_size
        )
    }
}

impl Element for PortInfo<'_> {
    const DATA_TYPE: DataType = DataType::PortInfo;
    const BUFFER_TYPE: DataType = DataType::BufferTypePortInfo;

    fn ordering(&self, other: &Self) -> Option<Ordering> {
        Some(self.address.cmp(&other.address))
    }
}

/// Ports of a board: data ports and configuration ports.
#[derive(Clone, Debug)]
pub struct BoardPortInfo<'a> {
    pub ports: Buffer<PortInfo<'a>>,
    pub confs: Buffer<PortInfo<'a>>,
}

impl<'a> BoardPortInfo<'a> {
    pub fn new(max_ports: usize, max_confs: usize) -> Self {
        Self {
            ports: Buffer::new(max_ports),
            confs: Buffer::new(max_confs),
        }
    }

    /// Look a port up by name, data ports first.
    pub fn find(&self, name: &str) -> Option<&PortInfo<'a>> {
        self.ports
            .iter()
            .chain(self.confs.iter())
            .find(|port| port.name() == name)
    }
}

impl Default for BoardPortInfo<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_CAPACITY)
    }
}
