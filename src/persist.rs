//! Raw binary persistence for [`Buffer`].
//!
//! Files hold `n * size_of::<T>()` bytes in native in-memory layout, with no
//! header and no endianness or alignment normalization. They are only
//! portable between identical builds on the same platform.

use crate::{Buffer, BufferError, Element, IoOp};
use bytemuck::{checked, CheckedBitPattern, NoUninit};
use log::debug;
use std::{
    fs::File,
    io::{self, Read, Write},
    mem,
    path::Path,
};

impl<T: Element + NoUninit> Buffer<T> {
    /// Dump `elements` slots to `path`, replacing the file.
    ///
    /// `elements == 0` writes the logical content, or the whole storage when
    /// the logical size is zero. Larger requests are truncated to the
    /// physical size.
    pub fn write_to_file(&self, path: impl AsRef<Path>, elements: usize) -> Result<(), BufferError> {
        let path = path.as_ref();
        let n = if elements == 0 {
            self.resolved_len()
        } else {
            elements.min(self.psize())
        };
        if n == 0 {
            return Err(BufferError::Empty);
        }

        let mut file = File::create(path).map_err(|e| BufferError::io(IoOp::Create, path, e))?;
        let bytes: &[u8] = bytemuck::cast_slice(&self.storage()[..n]);
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| BufferError::io(IoOp::Write, path, e))?;
        debug!(
            "{}: wrote {n} elements ({} bytes) to {}",
            self.type_tag(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}

impl<T: Element + CheckedBitPattern> Buffer<T> {
    /// Fill the buffer from a file written by [`Buffer::write_to_file`].
    ///
    /// `elements == 0` reads the whole file; a trailing partial element is
    /// ignored. The storage is reallocated when it is too small, dropping
    /// previous contents. On success the logical size is the number of
    /// elements read. A failed read or decode leaves the contents and logical
    /// size untouched, apart from the reallocation above.
    pub fn read_from_file(&mut self, path: impl AsRef<Path>, elements: usize) -> Result<(), BufferError> {
        let path = path.as_ref();
        let elem_size = mem::size_of::<T>();
        let mut file = File::open(path).map_err(|e| BufferError::io(IoOp::Open, path, e))?;

        let n = if elements == 0 {
            let len = file
                .metadata()
                .map_err(|e| BufferError::io(IoOp::Read, path, e))?
                .len();
            usize::try_from(len / elem_size as u64).map_err(|_| {
                BufferError::AllocationFailure {
                    requested: usize::MAX,
                }
            })?
        } else {
            elements
        };

        if self.psize() < n {
            self.allocate(n)?;
        }

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(n * elem_size)
            .map_err(|_| BufferError::AllocationFailure { requested: n })?;
        bytes.resize(n * elem_size, 0);
        file.read_exact(&mut bytes)
            .map_err(|e| BufferError::io(IoOp::Read, path, e))?;

        let mut values = Vec::new();
        values
            .try_reserve_exact(n)
            .map_err(|_| BufferError::AllocationFailure { requested: n })?;
        for chunk in bytes.chunks_exact(elem_size) {
            let value = checked::try_pod_read_unaligned(chunk).map_err(|e| {
                BufferError::io(
                    IoOp::Read,
                    path,
                    io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
                )
            })?;
            values.push(value);
        }
        self.copy_in(&values, n);
        debug!("{}: read {n} elements from {}", self.type_tag(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{BufferBool, BufferDouble, BufferError, BufferS16, BufferU32, IoOp, StatusCode};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn round_trip_logical_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.bin");
        let mut buf = BufferS16::new(8);
        buf.copy_in(&[-3, 0, 7, i16::MAX, i16::MIN], 0);
        buf.write_to_file(&path, 0).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 10);

        let mut loaded = BufferS16::new(0);
        loaded.read_from_file(&path, 0).unwrap();
        assert_eq!(loaded.size(), 5);
        assert_eq!(loaded.as_slice(), buf.as_slice());
    }

    #[test]
    fn round_trip_single_element_and_full_storage() {
        let dir = tempdir().unwrap();
        let mut buf = BufferDouble::new(4);
        buf.storage_mut().copy_from_slice(&[0.5, -1.25, 1e300, f64::MIN_POSITIVE]);

        let one = dir.path().join("one.bin");
        buf.write_to_file(&one, 1).unwrap();
        let mut loaded = BufferDouble::new(4);
        loaded.read_from_file(&one, 0).unwrap();
        assert_eq!(loaded.as_slice(), &[0.5]);

        // logical size zero: whole storage is written
        let full = dir.path().join("full.bin");
        buf.write_to_file(&full, 0).unwrap();
        let mut loaded = BufferDouble::new(1);
        loaded.read_from_file(&full, 0).unwrap();
        assert_eq!(loaded.psize(), 4);
        assert_eq!(loaded.as_slice(), buf.storage());

        let psize = dir.path().join("psize.bin");
        buf.write_to_file(&psize, buf.psize()).unwrap();
        let mut loaded = BufferDouble::new(0);
        loaded.read_from_file(&psize, buf.psize()).unwrap();
        assert_eq!(loaded.as_slice(), buf.storage());
    }

    #[test]
    fn write_request_is_truncated_to_capacity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let buf = BufferU32::new(3);
        buf.write_to_file(&path, 100).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 12);
    }

    #[test]
    fn write_empty_buffer_fails() {
        let dir = tempdir().unwrap();
        let err = BufferU32::new(0)
            .write_to_file(dir.path().join("x.bin"), 0)
            .unwrap_err();
        assert!(matches!(err, BufferError::Empty));
        assert_eq!(err.status(), StatusCode::BufferIsEmpty);
    }

    #[test]
    fn read_keeps_large_enough_storage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.bin");
        let mut src = BufferU32::new(2);
        src.copy_in(&[11, 22], 0);
        src.write_to_file(&path, 0).unwrap();

        let mut dst = BufferU32::new(10);
        dst.read_from_file(&path, 0).unwrap();
        assert_eq!(dst.psize(), 10);
        assert_eq!(dst.as_slice(), &[11, 22]);
    }

    #[test]
    fn read_ignores_trailing_partial_element() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.bin");
        fs::write(&path, [1u8, 0, 0, 0, 2, 0, 0, 0, 9]).unwrap();
        let mut buf = BufferU32::new(0);
        buf.read_from_file(&path, 0).unwrap();
        assert_eq!(buf.as_slice(), &[u32::from_ne_bytes([1, 0, 0, 0]), u32::from_ne_bytes([2, 0, 0, 0])]);
    }

    #[test]
    fn missing_file_and_short_read() {
        let dir = tempdir().unwrap();
        let mut buf = BufferU32::new(4);
        let err = buf.read_from_file(dir.path().join("missing.bin"), 0).unwrap_err();
        assert!(matches!(err, BufferError::Io { op: IoOp::Open, .. }));
        assert_eq!(err.status(), StatusCode::FileCantOpen);

        let path = dir.path().join("short.bin");
        fs::write(&path, [0u8; 8]).unwrap();
        let err = buf.read_from_file(&path, 4).unwrap_err();
        match err {
            BufferError::Io { op, source, .. } => {
                assert_eq!(op, IoOp::Read);
                assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unwritable_path_reports_create_failure() {
        let dir = tempdir().unwrap();
        let mut buf = BufferU32::new(1);
        buf.push_back(5).unwrap();
        let err = buf
            .write_to_file(dir.path().join("no/such/dir/out.bin"), 0)
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FileCantCreate);
    }

    #[test]
    fn bool_contents_are_validated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flags.bin");
        let mut flags = BufferBool::new(3);
        flags.copy_in(&[true, false, true], 0);
        flags.write_to_file(&path, 0).unwrap();
        let mut loaded = BufferBool::new(0);
        loaded.read_from_file(&path, 0).unwrap();
        assert_eq!(loaded.as_slice(), &[true, false, true]);

        fs::write(&path, [1u8, 7]).unwrap();
        let err = loaded.read_from_file(&path, 0).unwrap_err();
        match err {
            BufferError::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn failed_decode_keeps_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flags.bin");
        let mut flags = BufferBool::new(3);
        flags.copy_in(&[true, true, true], 0);

        // first element is valid, second is not
        fs::write(&path, [0u8, 7]).unwrap();
        assert!(flags.read_from_file(&path, 0).is_err());
        assert_eq!(flags.size(), 3);
        assert_eq!(flags.as_slice(), &[true, true, true]);
    }
}
