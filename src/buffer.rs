use crate::{BufferError, BufferSettings, DataType, Element, RawPtr};
use log::{debug, trace, warn};
use ndarray::ArrayView2;
use std::{
    cmp::Ordering,
    fmt, mem,
    ops::{Index, IndexMut},
    ptr, slice,
};

/// Capacity of a buffer created without an explicit size.
pub const DEFAULT_CAPACITY: usize = 32;

/// Maximum number of elements rendered by `Display`.
pub const PRINT_LIMIT: usize = 32;

/// Fixed-capacity owning array used to move samples and records across the
/// driver boundary.
///
/// A buffer distinguishes its *physical* size ([`Buffer::psize`], the number
/// of allocated slots) from its *logical* size ([`Buffer::size`], how many
/// leading slots hold meaningful data). Storage never grows implicitly: the
/// driver is handed a pointer and the physical size and must be able to rely
/// on both staying put for the duration of a call. Only [`Buffer::allocate`]
/// and [`Buffer::read_from_file`] replace the storage.
///
/// The element kind is tagged with [`Element::BUFFER_TYPE`], reported by
/// [`Buffer::type_tag`] for diagnostics.
pub struct Buffer<T: Element> {
    // Always exactly `psize` initialized elements.
    data: Vec<T>,
    size: usize,
}

fn allocate_storage<T: Element>(capacity: usize) -> Result<Vec<T>, BufferError> {
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| BufferError::AllocationFailure {
            requested: capacity,
        })?;
    data.resize(capacity, T::default());
    Ok(data)
}

impl<T: Element> Buffer<T> {
    /// Create a buffer with `capacity` default-initialized slots.
    ///
    /// If the storage can't be obtained the buffer is left with a physical
    /// size of zero and a warning is logged; check [`Buffer::psize`] or use
    /// [`Buffer::try_new`] to get the error.
    pub fn new(capacity: usize) -> Self {
        Self::try_new(capacity).unwrap_or_else(|e| {
            warn!("{}: {e}", T::BUFFER_TYPE);
            Self::empty()
        })
    }

    pub fn try_new(capacity: usize) -> Result<Self, BufferError> {
        Ok(Self {
            data: allocate_storage(capacity)?,
            size: 0,
        })
    }

    pub fn with_settings(settings: &BufferSettings) -> Self {
        Self::new(settings.default_capacity)
    }

    fn empty() -> Self {
        Self {
            data: Vec::new(),
            size: 0,
        }
    }

    /// Replace the storage with `capacity` fresh slots.
    ///
    /// Previous contents are always dropped and the logical size is reset to
    /// zero. On failure the buffer is left empty but usable.
    pub fn allocate(&mut self, capacity: usize) -> Result<(), BufferError> {
        self.size = 0;
        self.data = Vec::new();
        match allocate_storage(capacity) {
            Ok(data) => {
                debug!("{}: allocated {} elements", T::BUFFER_TYPE, capacity);
                self.data = data;
                Ok(())
            }
            Err(e) => {
                warn!("{}: {e}", T::BUFFER_TYPE);
                Err(e)
            }
        }
    }

    pub fn type_tag(&self) -> DataType {
        T::BUFFER_TYPE
    }

    /// Logical size: number of valid elements.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Physical size: number of allocated elements.
    pub fn psize(&self) -> usize {
        self.data.len()
    }

    pub fn byte_size(&self) -> usize {
        self.size * mem::size_of::<T>()
    }

    pub fn byte_psize(&self) -> usize {
        self.psize() * mem::size_of::<T>()
    }

    pub fn type_size(&self) -> usize {
        mem::size_of::<T>()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Forget the logical content. Storage is untouched.
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Set the logical size, clamped to the physical size.
    pub fn set_size(&mut self, size: usize) {
        self.size = size.min(self.psize());
    }

    /// Number of elements whole-buffer operations act on: the logical size,
    /// or the physical size when nothing has been marked valid yet.
    pub(crate) fn resolved_len(&self) -> usize {
        if self.size > 0 {
            self.size
        } else {
            self.psize()
        }
    }

    /// Copy from `src` into the start of the buffer.
    ///
    /// Copies `count` elements, or as many as `src` holds when `count` is 0,
    /// truncated to the physical size. The logical size becomes the number of
    /// elements copied, which is returned.
    pub fn copy_in(&mut self, src: &[T], count: usize) -> usize {
        let wanted = if count == 0 {
            src.len()
        } else {
            count.min(src.len())
        };
        let n = wanted.min(self.psize());
        self.data[..n].copy_from_slice(&src[..n]);
        self.size = n;
        trace!("{}: copied in {n} of {wanted} elements", T::BUFFER_TYPE);
        n
    }

    /// Copy the leading `min(psize, dst.len())` slots into `dst`.
    pub fn copy_out(&self, dst: &mut [T]) -> usize {
        let n = self.psize().min(dst.len());
        dst[..n].copy_from_slice(&self.data[..n]);
        n
    }

    /// Fill from another buffer without allocating.
    ///
    /// With a non-empty source, its logical content is copied (truncated to
    /// this buffer's physical size) and becomes this buffer's logical
    /// content. With an empty source, the overlapping storage is copied and
    /// the logical size stays zero.
    pub fn copy_from(&mut self, src: &Buffer<T>) -> usize {
        let (n, size) = if src.size == 0 {
            (self.psize().min(src.psize()), 0)
        } else {
            let n = self.psize().min(src.size);
            (n, n)
        };
        self.data[..n].copy_from_slice(&src.data[..n]);
        self.size = size;
        trace!("{}: copied {n} elements from buffer", T::BUFFER_TYPE);
        n
    }

    /// Append `value` after the logical content. Never reallocates.
    pub fn push_back(&mut self, value: T) -> Result<(), BufferError> {
        if self.size == self.psize() {
            warn!("{}: push_back on a full buffer", T::BUFFER_TYPE);
            return Err(BufferError::CapacityExceeded {
                capacity: self.psize(),
            });
        }
        self.data[self.size] = value;
        self.size += 1;
        Ok(())
    }

    pub fn sort_ascending(&mut self) -> Result<(), BufferError> {
        self.sort_with(|o| o)
    }

    pub fn sort_descending(&mut self) -> Result<(), BufferError> {
        self.sort_with(Ordering::reverse)
    }

    fn sort_with(&mut self, direction: fn(Ordering) -> Ordering) -> Result<(), BufferError> {
        if self.psize() == 0 {
            return Err(BufferError::NotInitialized);
        }
        let probe = T::default();
        if probe.ordering(&probe).is_none() {
            return Err(BufferError::UnsupportedOperation("sorting"));
        }
        let n = self.resolved_len();
        self.data[..n]
            .sort_by(|a, b| direction(a.ordering(b).unwrap_or(Ordering::Equal)));
        Ok(())
    }

    /// Logical content.
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.size]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..self.size]
    }

    /// Whole physical storage, including slots past the logical size.
    pub fn storage(&self) -> &[T] {
        &self.data
    }

    pub fn storage_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Pointer to the storage, null when the physical size is zero.
    ///
    /// Meant only for handing `(as_ptr(), psize())` to a driver entry point.
    /// The pointer is invalidated by anything that replaces the storage and
    /// must not outlive the buffer. Writing through it never changes the
    /// logical size; record the driver's count with [`Buffer::set_size`].
    pub fn as_ptr(&self) -> *const T {
        if self.data.is_empty() {
            ptr::null()
        } else {
            self.data.as_ptr()
        }
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        if self.data.is_empty() {
            ptr::null_mut()
        } else {
            self.data.as_mut_ptr()
        }
    }

    /// Let `fill` write into the whole storage and record the element count
    /// it returns (clamped to the physical size) as the logical size.
    pub fn fill_with<F>(&mut self, fill: F) -> usize
    where
        F: FnOnce(&mut [T]) -> usize,
    {
        let n = fill(&mut self.data);
        self.set_size(n);
        self.size
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// # Safety
    ///
    /// `index` must be below [`Buffer::psize`].
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        self.data.get_unchecked(index)
    }

    /// # Safety
    ///
    /// `index` must be below [`Buffer::psize`].
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        self.data.get_unchecked_mut(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// View interleaved multichannel samples as `(samples, channels)`.
    pub fn frames(&self, n_channels: usize) -> Result<ArrayView2<'_, T>, BufferError> {
        let wrong_size = BufferError::WrongSize {
            size: self.size,
            multiple: n_channels,
        };
        if n_channels == 0 || self.size % n_channels != 0 {
            return Err(wrong_size);
        }
        ArrayView2::from_shape((self.size / n_channels, n_channels), self.as_slice())
            .map_err(|_| wrong_size)
    }

    /// Equality over the common logical prefix: only the first
    /// `min(self.size(), other.size())` elements take part, so `[1, 2]`
    /// matches `[1, 2, 3]`. Not transitive; `==` compares whole buffers.
    pub fn eq_prefix(&self, other: &Self) -> bool {
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Lexicographic order over the common logical prefix using
    /// [`Element::ordering`]. `None` when a compared pair has no order, or
    /// when equal keys sit on unequal elements.
    pub fn cmp_prefix(&self, other: &Self) -> Option<Ordering> {
        let mut all_equal = true;
        for (a, b) in self.iter().zip(other.iter()) {
            if a == b {
                continue;
            }
            all_equal = false;
            match a.ordering(b)? {
                Ordering::Equal => continue,
                unequal => return Some(unequal),
            }
        }
        all_equal.then_some(Ordering::Equal)
    }

    /// Render at most `count` elements, or every valid element when `count`
    /// is 0.
    pub fn dump(&self, count: usize) -> Dump<'_, T> {
        Dump {
            buffer: self,
            count,
        }
    }
}

impl<T: Element> Default for Buffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<T: Element> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::new(self.psize());
        copy.copy_from(self);
        copy
    }

    /// Reallocates when the physical sizes differ. If that allocation fails
    /// the buffer is left empty with zero capacity.
    fn clone_from(&mut self, source: &Self) {
        if self.psize() != source.psize() {
            if let Err(e) = self.allocate(source.psize()) {
                debug!("{}: clone_from left the buffer empty: {e}", T::BUFFER_TYPE);
            }
        }
        self.copy_from(source);
    }
}

impl<T: Element> Index<usize> for Buffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T: Element> IndexMut<usize> for Buffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<'a, T: Element> IntoIterator for &'a Buffer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Buffers are equal when both sizes match and the logical contents are
/// equal element by element.
impl<T: Element> PartialEq for Buffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.psize() == other.psize()
            && self.size == other.size
            && self.as_slice() == other.as_slice()
    }
}

/// Ordered by physical size, then logical size, then lexicographically by
/// content, see [`Buffer::cmp_prefix`].
impl<T: Element> PartialOrd for Buffer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.psize().cmp(&other.psize()).then(self.size.cmp(&other.size)) {
            Ordering::Equal => self.cmp_prefix(other),
            unequal => Some(unequal),
        }
    }
}

impl<T: Element> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("type", &T::BUFFER_TYPE)
            .field("psize", &self.psize())
            .field("size", &self.size)
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<T: Element> fmt::Display for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.dump(self.resolved_len().min(PRINT_LIMIT)), f)
    }
}

/// Printable listing of a buffer, see [`Buffer::dump`].
pub struct Dump<'a, T: Element> {
    buffer: &'a Buffer<T>,
    count: usize,
}

impl<T: Element> fmt::Display for Dump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = self.buffer;
        writeln!(
            f,
            "Buffer [{:p}], type: {}",
            buffer.as_ptr(),
            buffer.type_tag().name()
        )?;
        writeln!(f, "Psize: {}, Size: {}", buffer.psize(), buffer.size())?;
        if buffer.psize() == 0 {
            return write!(f, "\nBuffer is not initialized!");
        }
        let available = buffer.resolved_len();
        let n = if self.count == 0 || self.count > available {
            available
        } else {
            self.count
        };
        writeln!(f, "Elements[0 - {n}]:")?;
        for (i, value) in buffer.data[..n].iter().enumerate() {
            writeln!(f, "{i:>6}: {value}")?;
        }
        Ok(())
    }
}

pub type BufferU8 = Buffer<u8>;
pub type BufferS8 = Buffer<i8>;
pub type BufferU16 = Buffer<u16>;
pub type BufferS16 = Buffer<i16>;
pub type BufferU32 = Buffer<u32>;
pub type BufferS32 = Buffer<i32>;
pub type BufferU64 = Buffer<u64>;
pub type BufferS64 = Buffer<i64>;
pub type BufferFloat = Buffer<f32>;
pub type BufferDouble = Buffer<f64>;
pub type BufferBool = Buffer<bool>;
pub type BufferU8P = Buffer<RawPtr>;
