//! Shared byte-buffer pool for file transfers.
//!
//! Download loops lease a buffer, fill it from the component reader, and
//! return it when done. The lease is a guard, so the buffer goes back to
//! the pool on every exit path, including errors and cancellation.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

/// Minimum capacity of a leased buffer.
pub const MIN_BUFFER_SIZE: usize = 100 * 1024;

/// Buffers retained beyond this count are dropped instead of pooled.
const MAX_POOLED: usize = 32;

/// A cheaply-cloneable pool of reusable byte buffers.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Lease a buffer of at least [`MIN_BUFFER_SIZE`] bytes.
    pub fn lease(&self) -> BufferLease {
        let mut buf = self
            .inner
            .lock()
            .expect("buffer pool lock poisoned")
            .pop()
            .unwrap_or_default();
        if buf.len() < MIN_BUFFER_SIZE {
            buf.resize(MIN_BUFFER_SIZE, 0);
        }
        BufferLease {
            buf: Some(buf),
            pool: self.clone(),
        }
    }

    /// Number of buffers currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.inner.lock().expect("buffer pool lock poisoned").len()
    }

    fn put(&self, buf: Vec<u8>) {
        let mut buffers = self.inner.lock().expect("buffer pool lock poisoned");
        if buffers.len() < MAX_POOLED {
            buffers.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A leased buffer; returns itself to the pool on drop.
pub struct BufferLease {
    buf: Option<Vec<u8>>,
    pool: BufferPool,
}

impl Deref for BufferLease {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buf.as_deref().expect("buffer taken")
    }
}

impl DerefMut for BufferLease {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buf.as_deref_mut().expect("buffer taken")
    }
}

impl Drop for BufferLease {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.put(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leased_buffers_meet_the_minimum_size() {
        let pool = BufferPool::new();
        let lease = pool.lease();
        assert!(lease.len() >= MIN_BUFFER_SIZE);
    }

    #[test]
    fn buffers_return_to_the_pool_on_drop() {
        let pool = BufferPool::new();
        assert_eq!(pool.idle(), 0);
        {
            let _a = pool.lease();
            let _b = pool.lease();
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.idle(), 2);
        // A re-lease drains the pool again.
        let _c = pool.lease();
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn buffers_return_even_when_the_user_panics() {
        let pool = BufferPool::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _lease = pool.lease();
            panic!("transfer failed");
        }));
        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
    }
}
