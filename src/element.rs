use crate::DataType;
use std::{cmp::Ordering, fmt, ptr};

/// Contract for types that can be stored in a [`Buffer`](crate::Buffer).
///
/// Elements are plain values: copyable, comparable for equality and
/// default-constructible so fresh storage is always initialized. The two
/// tags bind the element to the driver's type namespace.
///
/// Ordering is optional. Types without a natural order keep the default
/// [`Element::ordering`], which makes sorting fail with
/// [`BufferError::UnsupportedOperation`](crate::BufferError::UnsupportedOperation)
/// instead of producing an arbitrary order.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + fmt::Display {
    /// Tag of a single element.
    const DATA_TYPE: DataType;
    /// Tag of a buffer holding this element.
    const BUFFER_TYPE: DataType;

    fn ordering(&self, _other: &Self) -> Option<Ordering> {
        None
    }
}

macro_rules! ordered_element {
    ($($ty:ty => $data:ident, $buffer:ident;)*) => {
        $(
            impl Element for $ty {
                const DATA_TYPE: DataType = DataType::$data;
                const BUFFER_TYPE: DataType = DataType::$buffer;

                fn ordering(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }
        )*
    };
}

ordered_element! {
    u8 => U8, BufferTypeU8;
    i8 => S8, BufferTypeS8;
    u16 => U16, BufferTypeU16;
    i16 => S16, BufferTypeS16;
    u32 => U32, BufferTypeU32;
    i32 => S32, BufferTypeS32;
    u64 => U64, BufferTypeU64;
    i64 => S64, BufferTypeS64;
    bool => Bool, BufferTypeBool;
}

impl Element for f32 {
    const DATA_TYPE: DataType = DataType::Float;
    const BUFFER_TYPE: DataType = DataType::BufferTypeFloat;

    fn ordering(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl Element for f64 {
    const DATA_TYPE: DataType = DataType::Double;
    const BUFFER_TYPE: DataType = DataType::BufferTypeDouble;

    fn ordering(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

/// Untyped byte pointer handed through the driver, e.g. per-channel block
/// addresses. Never dereferenced by this crate and has no ordering.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawPtr(pub *mut u8);

impl RawPtr {
    pub fn null() -> Self {
        RawPtr(ptr::null_mut())
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for RawPtr {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for RawPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", self.0)
    }
}

impl fmt::Display for RawPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Element for RawPtr {
    const DATA_TYPE: DataType = DataType::U8P;
    const BUFFER_TYPE: DataType = DataType::BufferTypeU8P;
}
