use std::fmt;

/// Group a [`DataType`] code belongs to, encoded in bits 12..20 of the code.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TypeGroup {
    Base = 0x1,
    Pointer = 0x2,
    Buffer = 0x3,
    Init = 0x4,
    Stuff = 0x5,
    Internal = 0x6,
    Dpa = 0x7,
    Lab = 0x8,
}

const fn tag(group: TypeGroup, index: u32) -> u32 {
    0xadc0_0000 | ((group as u32) << 12) | (index & 0xfff)
}

macro_rules! data_types {
    ($($group:ident => [$($variant:ident = $index:literal),* $(,)?])*) => {
        /// Type identifiers shared with the driver for diagnostics and
        /// cross-language type description.
        ///
        /// Codes are `0xadc00000 | group << 12 | index`. Nothing in this crate
        /// dispatches on them.
        #[repr(u32)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub enum DataType {
            Undefined = 0,
            $($($variant = tag(TypeGroup::$group, $index),)*)*
        }

        impl DataType {
            pub const ALL: &'static [DataType] = &[
                DataType::Undefined,
                $($(DataType::$variant,)*)*
            ];

            /// Display name used by the driver's type reports.
            pub fn name(self) -> &'static str {
                match self {
                    DataType::Undefined => "UnknownType",
                    $($(DataType::$variant => concat!("Rsh", stringify!($variant)),)*)*
                }
            }

            pub fn group(self) -> Option<TypeGroup> {
                match self {
                    DataType::Undefined => None,
                    $($(DataType::$variant => Some(TypeGroup::$group),)*)*
                }
            }
        }
    };
}

data_types! {
    Base => [
        U8 = 0x1, S8 = 0x2, U16 = 0x3, S16 = 0x4, U32 = 0x5, S32 = 0x6,
        U64 = 0x7, S64 = 0x8, Float = 0x9, Double = 0xA, Bool = 0xB,
    ]
    Pointer => [
        VoidP = 0x1, U8P = 0x2, S8P = 0x3, U16P = 0x4, S16P = 0x5, U32P = 0x6,
        S32P = 0x7, U64P = 0x8, S64P = 0x9, FloatP = 0xA, DoubleP = 0xB, BoolP = 0xC,
        U8PP = 0xD, S8PP = 0xE, U16PP = 0xF, S16PP = 0x10, U32PP = 0x11, S32PP = 0x12,
        U64PP = 0x13, S64PP = 0x14, FloatPP = 0x15, DoublePP = 0x16, BoolPP = 0x17,
    ]
    Buffer => [
        BufferTypeU8 = 0x1, BufferTypeS8 = 0x2, BufferTypeU16 = 0x3, BufferTypeS16 = 0x4,
        BufferTypeU32 = 0x5, BufferTypeS32 = 0x6, BufferTypeU64 = 0x7, BufferTypeS64 = 0x8,
        BufferTypeFloat = 0x9, BufferTypeDouble = 0xA, BufferTypeBool = 0xB,
        BufferTypeChannel = 0xC, BufferTypePortInfo = 0xD, BufferTypeSetting = 0xE,
        BufferTypeSettingChannel = 0xF,
        DBufferTypeU8 = 0x10, DBufferTypeS8 = 0x11, DBufferTypeU16 = 0x12, DBufferTypeS16 = 0x13,
        DBufferTypeU32 = 0x14, DBufferTypeS32 = 0x15, DBufferTypeU64 = 0x16, DBufferTypeS64 = 0x17,
        DBufferTypeFloat = 0x18, DBufferTypeDouble = 0x19, DBufferTypeBool = 0x1A,
        BufferTypeU8P = 0x1B, BufferTypeDeviceBaseInfo = 0x1C, BufferTypeDeviceFullInfo = 0x1D,
        BufferTypeChannelVoltage = 0x1E, BufferTypeCalibrationItem = 0x1F,
        BufferTypeCalibrationGroup = 0x20, BufferTypeBaseP = 0x21,
    ]
    Init => [
        InitADC = 0x1, InitGSPF = 0x2, InitDMA = 0x3, InitMemory = 0x4, InitVoltmeter = 0x5,
        InitPort = 0x6, InitPacket = 0x7, InitDAC = 0x8, InitTimer = 0x9,
    ]
    Stuff => [
        Register = 0x1, Port = 0x2, GatheringParameters = 0x3, DeviceActiveList = 0x4,
        OnboardBaseInfo = 0x5, DeviceBaseInfo = 0x6, DeviceFullInfo = 0x7, DeviceBuffer = 0x8,
        PortInfo = 0x9, BoardPortInfo = 0xA, IFactory = 0xB, IRSHDevice = 0xC, Channel = 0xD,
        SynchroChannel = 0xE, CalibrationParameters = 0xF, CalibrationControl = 0x10,
        DebugContainer = 0x11, ChannelVoltage = 0x12, DeviceKey = 0x13,
        CalibrationChannelParameter = 0x14, CalibrationItemBase = 0x15,
        CalibrationItemEntity = 0x16, CalibrationItemRegister = 0x17,
        CalibrationItemButton = 0x18, CalibrationItemFilePath = 0x19,
        CalibrationItemRegOffset = 0x1A,
    ]
    Internal => [
        BoardInfoDMA = 0x1, BoardInfoMemory = 0x2, BoardInfoDAC = 0x3, BoardInfoDP = 0x4,
        FRDACTune = 0x5, TunerDataWrapper = 0x6, TunerDataWrapperP = 0x7,
    ]
    Dpa => [
        DPADataFFTComplex = 0x1, DPADataWindowFunction = 0x2, DPADataFindGap = 0x3,
        DPADataFindFront = 0x4, DPADataGeneratorSignalBase = 0x5, DPADataFFTPowerSpectrum = 0x6,
        DPAStatisticsBase = 0x7, DPADataStroboscope = 0x8, DPADataSaveHDF5 = 0x9,
        DPADataThermoCouple = 0xA,
    ]
    Lab => [
        LabDataBuffer = 0x1, LabDataStatistics = 0x2, LabDataFeatures = 0x3, LabXYData = 0x4,
        LabDataSave = 0x5,
    ]
}

impl DataType {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Name for an arbitrary code, `"UnknownType"` when it is not in the namespace.
    pub fn name_of(code: u32) -> &'static str {
        Self::from_code(code).map_or("UnknownType", Self::name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
