use crate::{Buffer, DataType, Element};
use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use std::{cmp::Ordering, ffi::CStr, fmt};

bitflags! {
    /// Physical connection of an enumerated device.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct InterfaceType: u32 {
        const PCI = 1 << 0;
        const PCIE = 1 << 1;
        const USB_11 = 1 << 2;
        const USB_20 = 1 << 3;
        const USB_30 = 1 << 4;
        const ETH = 1 << 5;
        const EMULATION = 1 << 6;
        const ANY = u32::MAX;
    }
}

impl InterfaceType {
    pub const UNDEFINED: Self = Self::empty();

    pub fn label(self) -> &'static str {
        const LABELS: [(InterfaceType, &str); 7] = [
            (InterfaceType::PCI, "PCI"),
            (InterfaceType::PCIE, "PCIe"),
            (InterfaceType::USB_11, "USB 1.1"),
            (InterfaceType::USB_20, "USB 2.0"),
            (InterfaceType::USB_30, "USB 3.0"),
            (InterfaceType::ETH, "Ethernet"),
            (InterfaceType::EMULATION, "Emulation"),
        ];
        LABELS
            .iter()
            .find(|(itype, _)| *itype == self)
            .map_or("Undefined", |(_, label)| label)
    }

    /// Whether a device with this interface passes an enumeration `filter`.
    pub fn matches(self, filter: InterfaceType) -> bool {
        filter == Self::ANY || filter.intersects(self)
    }
}

/// Identification of one enumerated board.
///
/// Laid out exactly like the driver's record so buffers of it can be handed
/// to enumeration calls and persisted as raw bytes.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, Pod, Zeroable)]
pub struct DeviceBaseInfo {
    pub chip: u16,
    pub vid: u16,
    pub pid: u16,
    pub rev: u16,
    pub slot: u16,
    /// 1-based enumeration index.
    pub base: u16,
    pub serial_number: u32,
}

impl DeviceBaseInfo {
    pub fn new(vid: u16, pid: u16, rev: u16, chip: u16, slot: u16, base: u16, serial_number: u32) -> Self {
        Self {
            chip,
            vid,
            pid,
            rev,
            slot,
            base,
            serial_number,
        }
    }

    pub fn cmp_by_base(&self, other: &Self) -> Ordering {
        self.base.cmp(&other.base)
    }
}

/// Serial numbers are not part of a device's identity.
impl PartialEq for DeviceBaseInfo {
    fn eq(&self, other: &Self) -> bool {
        self.vid == other.vid
            && self.pid == other.pid
            && self.rev == other.rev
            && self.chip == other.chip
            && self.slot == other.slot
            && self.base == other.base
    }
}

impl fmt::Display for DeviceBaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Base: {}, chip: {:x}, slot: {}, vid: 0x{:x}, pid: 0x{:x}, rev: {}, serialNumber: {}]",
            self.base, self.chip, self.slot, self.vid, self.pid, self.rev, self.serial_number
        )
    }
}

impl Element for DeviceBaseInfo {
    const DATA_TYPE: DataType = DataType::DeviceBaseInfo;
    const BUFFER_TYPE: DataType = DataType::BufferTypeDeviceBaseInfo;

    fn ordering(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_by_base(other))
    }
}

const UNKNOWN: &CStr = c"Unknown";
// "Unknown" in UTF-16
const UNKNOWN_WIDE: &[u16] = &[0x55, 0x6e, 0x6b, 0x6e, 0x6f, 0x77, 0x6e];

/// Device identification plus the driver's descriptive strings.
///
/// The strings are borrowed from the driver library that produced the
/// record and are only valid as long as that library keeps them alive;
/// device names are UTF-16 as the driver stores them.
#[derive(Clone, Copy, Debug)]
pub struct DeviceFullInfo<'a> {
    pub base: DeviceBaseInfo,
    pub itype: InterfaceType,
    pub library_name: &'a CStr,
    pub library_interface_name: &'a CStr,
    pub name_ru: &'a [u16],
    pub name_en: &'a [u16],
}

impl DeviceFullInfo<'_> {
    pub fn name(&self) -> String {
        String::from_utf16_lossy(self.name_en)
    }

    pub fn localized_name(&self) -> String {
        String::from_utf16_lossy(self.name_ru)
    }
}

impl Default for DeviceFullInfo<'_> {
    fn default() -> Self {
        DeviceBaseInfo::default().into()
    }
}

impl From<DeviceBaseInfo> for DeviceFullInfo<'_> {
    fn from(base: DeviceBaseInfo) -> Self {
        Self {
            base,
            itype: InterfaceType::UNDEFINED,
            library_name: UNKNOWN,
            library_interface_name: UNKNOWN,
            name_ru: UNKNOWN_WIDE,
            name_en: UNKNOWN_WIDE,
        }
    }
}

impl PartialEq for DeviceFullInfo<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.itype == other.itype
            && self.library_name == other.library_name
            && self.library_interface_name == other.library_interface_name
            && self.name_ru == other.name_ru
            && self.name_en == other.name_en
    }
}

impl fmt::Display for DeviceFullInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = &self.base;
        write!(
            f,
            "[Interface: {}, library name: {}, library interface: {}, original name: {}, ",
            self.itype.label(),
            self.library_name.to_string_lossy(),
            self.library_interface_name.to_string_lossy(),
            self.name()
        )?;
        write!(
            f,
            "base: {}, chip: {:x}, slot: {}, vid: 0x{:x}, pid: 0x{:x}, rev: {}, serialNumber: {}]",
            base.base, base.chip, base.slot, base.vid, base.pid, base.rev, base.serial_number
        )
    }
}

impl Element for DeviceFullInfo<'_> {
    const DATA_TYPE: DataType = DataType::DeviceFullInfo;
    const BUFFER_TYPE: DataType = DataType::BufferTypeDeviceFullInfo;

    fn ordering(&self, other: &Self) -> Option<Ordering> {
        Some(self.base.cmp_by_base(&other.base))
    }
}

pub type BufferDeviceBaseInfo = Buffer<DeviceBaseInfo>;
pub type BufferDeviceFullInfo<'a> = Buffer<DeviceFullInfo<'a>>;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn board(base: u16) -> DeviceBaseInfo {
        DeviceBaseInfo::new(0x1172, 0xa2b5, 3, 0x2c, 1, base, 4242)
    }

    #[test]
    fn equality_ignores_serial_number() {
        let mut other = board(1);
        other.serial_number = 1;
        assert_eq!(board(1), other);
        other.rev = 9;
        assert_ne!(board(1), other);
    }

    #[test]
    fn display_base_info() {
        assert_eq!(
            board(2).to_string(),
            "[Base: 2, chip: 2c, slot: 1, vid: 0x1172, pid: 0xa2b5, rev: 3, serialNumber: 4242]"
        );
    }

    #[test]
    fn interface_labels_and_filters() {
        assert_eq!(InterfaceType::PCIE.label(), "PCIe");
        assert_eq!(InterfaceType::USB_20.label(), "USB 2.0");
        assert_eq!(InterfaceType::UNDEFINED.label(), "Undefined");
        assert_eq!((InterfaceType::PCI | InterfaceType::ETH).label(), "Undefined");
        assert_eq!(InterfaceType::ANY.bits(), 0xFFFF_FFFF);

        assert!(InterfaceType::ETH.matches(InterfaceType::ANY));
        assert!(InterfaceType::USB_30.matches(InterfaceType::USB_20 | InterfaceType::USB_30));
        assert!(!InterfaceType::PCI.matches(InterfaceType::EMULATION));
    }

    #[test]
    fn full_info_defaults_to_unknown() {
        let info = DeviceFullInfo::from(board(1));
        assert_eq!(info.itype, InterfaceType::UNDEFINED);
        assert_eq!(info.library_name, c"Unknown");
        assert_eq!(info.name(), "Unknown");
        assert_eq!(info.localized_name(), "Unknown");
        assert!(info.to_string().starts_with(
            "[Interface: Undefined, library name: Unknown, library interface: Unknown, original name: Unknown, base: 1,"
        ));
    }

    #[test]
    fn full_info_equality_covers_extended_fields() {
        let a = DeviceFullInfo::from(board(1));
        let mut b = a;
        assert_eq!(a, b);
        b.itype = InterfaceType::PCI;
        assert_ne!(a, b);
        b = a;
        b.library_name = c"Other";
        assert_ne!(a, b);
    }

    #[test]
    fn device_lists_sort_by_base() {
        let mut list = BufferDeviceBaseInfo::new(4);
        for base in [3, 1, 2] {
            list.push_back(board(base)).unwrap();
        }
        list.sort_ascending().unwrap();
        let bases: Vec<u16> = list.iter().map(|d| d.base).collect();
        assert_eq!(bases, vec![1, 2, 3]);
        assert_eq!(list.type_tag(), DataType::BufferTypeDeviceBaseInfo);

        let mut full = BufferDeviceFullInfo::new(4);
        for base in [2, 5, 1] {
            full.push_back(board(base).into()).unwrap();
        }
        full.sort_descending().unwrap();
        let bases: Vec<u16> = full.iter().map(|d| d.base.base).collect();
        assert_eq!(bases, vec![5, 2, 1]);
    }

    #[test]
    fn base_info_lists_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("devices.bin");
        let mut list = BufferDeviceBaseInfo::new(2);
        list.push_back(board(1)).unwrap();
        list.push_back(board(2)).unwrap();
        list.write_to_file(&path, 0).unwrap();

        let mut loaded = BufferDeviceBaseInfo::new(0);
        loaded.read_from_file(&path, 0).unwrap();
        assert_eq!(loaded.size(), 2);
        assert_eq!(loaded[1].serial_number, 4242);
        assert_eq!(loaded.as_slice(), list.as_slice());
    }
}
