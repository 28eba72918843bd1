//! Software stand-in for a driver library.
//!
//! Exercises the buffer contract the way a real board does: enumeration
//! fills a caller-owned record list, and acquisition writes samples through
//! the raw `(pointer, psize)` pair and reports how many it produced.

use crate::{
    BoardPortInfo, Buffer, BufferDeviceFullInfo, BufferError, Channel, DeviceBaseInfo,
    DeviceFullInfo, EmulatorSettings, InterfaceType, PortInfo,
};
use log::{debug, info, warn};
use std::{ffi::CStr, slice};

const VID: u16 = 0x1172;
const PID: u16 = 0xe001;
const SERIAL_BASE: u32 = 0x0e00_0000;

const LIBRARY_NAME: &CStr = c"RshEmulator";
const LIBRARY_INTERFACE: &CStr = c"IRSHDevice";
// "Emulator"
static NAME_EN: [u16; 8] = [0x45, 0x6d, 0x75, 0x6c, 0x61, 0x74, 0x6f, 0x72];
// "Эмулятор"
static NAME_RU: [u16; 8] = [
    0x042d, 0x043c, 0x0443, 0x043b, 0x044f, 0x0442, 0x043e, 0x0440,
];
// "DIO", "CTRL"
static PORT_DIO: [u16; 3] = [0x44, 0x49, 0x4f];
static PORT_CTRL: [u16; 4] = [0x43, 0x54, 0x52, 0x4c];

pub struct Emulator {
    settings: EmulatorSettings,
    channels: Buffer<Channel>,
    tick: u64,
}

impl Emulator {
    /// A fresh emulator with a single used channel at unity gain.
    pub fn new(settings: &EmulatorSettings) -> Self {
        let mut channels = Buffer::new(1);
        let mut first = Channel::default();
        first.set_used(true).set_first_channel(true);
        // a one-slot buffer always takes one element
        let _ = channels.push_back(first);
        Self {
            settings: settings.clone(),
            channels,
            tick: 0,
        }
    }

    /// List the emulated boards passing `filter`.
    pub fn enumerate(&self, filter: InterfaceType) -> BufferDeviceFullInfo<'static> {
        let mut list = Buffer::new(usize::from(self.settings.devices));
        if !InterfaceType::EMULATION.matches(filter) {
            return list;
        }
        for base in 1..=self.settings.devices {
            let info = DeviceFullInfo {
                base: DeviceBaseInfo::new(VID, PID, 1, 0, 0, base, SERIAL_BASE + u32::from(base)),
                itype: InterfaceType::EMULATION,
                library_name: LIBRARY_NAME,
                library_interface_name: LIBRARY_INTERFACE,
                name_ru: &NAME_RU,
                name_en: &NAME_EN,
            };
            if let Err(e) = list.push_back(info) {
                warn!("enumeration stopped at base {base}: {e}");
                break;
            }
        }
        info!("found {} emulated devices", list.size());
        list
    }

    pub fn port_info(&self) -> BoardPortInfo<'static> {
        let mut board = BoardPortInfo::new(1, 1);
        let ports = [
            (
                &mut board.ports,
                PortInfo {
                    address: 0x10,
                    bit_size: 8,
                    name: &PORT_DIO,
                },
            ),
            (
                &mut board.confs,
                PortInfo {
                    address: 0x40,
                    bit_size: 32,
                    name: &PORT_CTRL,
                },
            ),
        ];
        for (table, port) in ports {
            if let Err(e) = table.push_back(port) {
                warn!("port {port}: {e}");
            }
        }
        board
    }

    /// Take over the channel table. Returns the number of used channels.
    pub fn configure(&mut self, channels: &Buffer<Channel>) -> Result<usize, BufferError> {
        if channels.is_empty() {
            return Err(BufferError::Empty);
        }
        self.channels.allocate(channels.size())?;
        self.channels.copy_from(channels);
        self.tick = 0;
        let used = self.used_channels();
        debug!("configured {} channels, {used} in use", channels.size());
        Ok(used)
    }

    pub fn used_channels(&self) -> usize {
        self.channels.iter().filter(|ch| ch.is_used()).count()
    }

    /// Write up to `psize` interleaved samples at `ptr`, whole frames only.
    /// Returns the number of samples written.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or valid for writes of `psize` `i16` values.
    pub unsafe fn get_data(&mut self, ptr: *mut i16, psize: libc::size_t) -> libc::size_t {
        let n_channels = self.used_channels();
        if ptr.is_null() || n_channels == 0 {
            return 0;
        }
        let out = slice::from_raw_parts_mut(ptr, psize);
        let period = u64::from(self.settings.period.max(1));
        let amplitude = i64::from(self.settings.amplitude);

        let mut written = 0;
        for frame in out.chunks_exact_mut(n_channels) {
            let ramp = (self.tick % period) as i64 * amplitude / period as i64;
            let used = self.channels.iter().filter(|ch| ch.is_used());
            for (sample, ch) in frame.iter_mut().zip(used) {
                let value = ramp * i64::from(ch.gain) + ch.adjustment as i64;
                *sample = value.clamp(i16::MIN.into(), i16::MAX.into()) as i16;
            }
            self.tick += 1;
            written += n_channels;
        }
        written
    }

    /// Fill `buffer` with the next block of samples.
    pub fn acquire(&mut self, buffer: &mut Buffer<i16>) -> Result<usize, BufferError> {
        if buffer.psize() == 0 {
            return Err(BufferError::NotInitialized);
        }
        // SAFETY: the pointer covers exactly psize initialized slots
        let n = unsafe { self.get_data(buffer.as_mut_ptr(), buffer.psize()) };
        buffer.set_size(n);
        debug!("acquired {n} samples");
        Ok(n)
    }
}
