/// Reactive cache layer, addressed by opaque keys supplied by callers.
pub trait ICacheInvalidator: Send + Sync {
    fn invalidate(&self, key: &str);
}

/// Invalidator for hosts without a cache layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl ICacheInvalidator for NoopInvalidator {
    fn invalidate(&self, _key: &str) {}
}
