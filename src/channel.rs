use crate::{Buffer, DataType, Element};
use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use std::{cmp::Ordering, fmt};

bitflags! {
    /// Bits of [`Channel::control`].
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct ChannelControl: u32 {
        const USED = 0x1;
        const SYNCHRO = 0x2;
        /// AC coupling; cleared means DC.
        const AC = 0x4;
        /// 50 Ohm input; cleared means 1 MOhm.
        const RESIST_50_OHM = 0x8;
        const ICP_POWER_ON = 0x10;
        const FIRST_CHANNEL = 0x10000;
    }
}

/// Acquisition settings of one input channel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Channel {
    pub gain: u32,
    pub control: u32,
    pub adjustment: f64,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            gain: 1,
            control: 0,
            adjustment: 0.0,
        }
    }
}

impl Channel {
    pub fn flags(&self) -> ChannelControl {
        ChannelControl::from_bits_retain(self.control)
    }

    fn set_flag(&mut self, flag: ChannelControl, on: bool) -> &mut Self {
        let mut flags = self.flags();
        flags.set(flag, on);
        self.control = flags.bits();
        self
    }

    pub fn set_used(&mut self, on: bool) -> &mut Self {
        self.set_flag(ChannelControl::USED, on)
    }

    pub fn set_first_channel(&mut self, on: bool) -> &mut Self {
        self.set_flag(ChannelControl::FIRST_CHANNEL, on)
    }

    pub fn set_synchro(&mut self, on: bool) -> &mut Self {
        self.set_flag(ChannelControl::SYNCHRO, on)
    }

    pub fn set_icp_power(&mut self, on: bool) -> &mut Self {
        self.set_flag(ChannelControl::ICP_POWER_ON, on)
    }

    pub fn set_input_ac(&mut self, on: bool) -> &mut Self {
        self.set_flag(ChannelControl::AC, on)
    }

    pub fn set_input_dc(&mut self, on: bool) -> &mut Self {
        self.set_input_ac(!on)
    }

    pub fn set_resist_50_ohm(&mut self, on: bool) -> &mut Self {
        self.set_flag(ChannelControl::RESIST_50_OHM, on)
    }

    pub fn set_resist_1_mohm(&mut self, on: bool) -> &mut Self {
        self.set_resist_50_ohm(!on)
    }

    pub fn is_used(&self) -> bool {
        self.flags().contains(ChannelControl::USED)
    }

    pub fn is_first_channel(&self) -> bool {
        self.flags().contains(ChannelControl::FIRST_CHANNEL)
    }

    pub fn is_synchro(&self) -> bool {
        self.flags().contains(ChannelControl::SYNCHRO)
    }

    pub fn is_icp_power_on(&self) -> bool {
        self.flags().contains(ChannelControl::ICP_POWER_ON)
    }

    pub fn is_input_ac(&self) -> bool {
        self.flags().contains(ChannelControl::AC)
    }

    pub fn is_input_dc(&self) -> bool {
        !self.is_input_ac()
    }

    pub fn is_resist_50_ohm(&self) -> bool {
        self.flags().contains(ChannelControl::RESIST_50_OHM)
    }

    pub fn is_resist_1_mohm(&self) -> bool {
        !self.is_resist_50_ohm()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.gain == other.gain
            && self.control == other.control
            && (self.adjustment - other.adjustment).abs() < f64::EPSILON
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[gain: {}, adjustment: {}, control: {}]",
            self.gain, self.adjustment, self.control
        )
    }
}

impl Element for Channel {
    const DATA_TYPE: DataType = DataType::Channel;
    const BUFFER_TYPE: DataType = DataType::BufferTypeChannel;

    fn ordering(&self, other: &Self) -> Option<Ordering> {
        Some(self.gain.cmp(&other.gain))
    }
}

pub type BufferChannel = Buffer<Channel>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let ch = Channel::default();
        assert_eq!(ch.gain, 1);
        assert!(!ch.is_used());
        assert!(ch.is_input_dc());
        assert!(ch.is_resist_1_mohm());
        assert_eq!(ch.to_string(), "[gain: 1, adjustment: 0, control: 0]");
    }

    #[test]
    fn control_bits() {
        let mut ch = Channel::default();
        ch.set_used(true).set_input_ac(true).set_first_channel(true);
        assert_eq!(ch.control, 0x10005);
        assert!(ch.is_used() && ch.is_input_ac() && ch.is_first_channel());

        ch.set_input_dc(true).set_resist_50_ohm(true).set_icp_power(true);
        assert!(ch.is_input_dc());
        assert!(ch.is_resist_50_ohm());
        assert!(ch.is_icp_power_on());
        assert_eq!(ch.control, 0x10019);

        ch.set_resist_1_mohm(true).set_synchro(true).set_used(false);
        assert!(ch.is_resist_1_mohm());
        assert!(ch.is_synchro());
        assert!(!ch.is_used());

        ch.reset();
        assert_eq!(ch, Channel::default());
    }

    #[test]
    fn unknown_control_bits_survive() {
        let mut ch = Channel {
            control: 0x8000_0000,
            ..Channel::default()
        };
        ch.set_used(true);
        assert_eq!(ch.control, 0x8000_0001);
    }

    #[test]
    fn equality_tolerates_rounding() {
        let a = Channel {
            adjustment: 0.1 + 0.2,
            ..Channel::default()
        };
        let b = Channel {
            adjustment: 0.3,
            ..Channel::default()
        };
        assert_eq!(a, b);
        let c = Channel {
            adjustment: 0.31,
            ..b
        };
        assert_ne!(a, c);
    }

    #[test]
    fn channel_tables_sort_by_gain() {
        let mut table = BufferChannel::new(3);
        for gain in [10, 1, 100] {
            table
                .push_back(Channel {
                    gain,
                    ..Channel::default()
                })
                .unwrap();
        }
        table.sort_descending().unwrap();
        let gains: Vec<u32> = table.iter().map(|c| c.gain).collect();
        assert_eq!(gains, vec![100, 10, 1]);
    }
}
