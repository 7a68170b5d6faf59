//! In-process caches.

mod memory;

pub(crate) use memory::ExpiringLruCache;
