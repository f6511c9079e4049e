//! Runtime tuning knobs.
//!
//! A `const fn` constructor that validates with a panicking `assert!`,
//! capacities expressed as power-of-two exponents, and a `Default` impl
//! for the common case.

/// Configuration for an [`crate::runtime::ActorRuntime`].
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// `log2` of the ready queue's capacity (default 16 → 2^16 slots).
    ready_queue_bits: u8,
    /// Initial registry table size, must be a power of two (default 4).
    registry_initial_size: usize,
}

impl RuntimeConfig {
    /// Registry table size is capped below 2^27 entries.
    pub const MAX_REGISTRY_SIZE: usize = 1 << 27;

    /// Creates a new configuration.
    ///
    /// # Panics
    ///
    /// Panics if `ready_queue_bits` is 0 or greater than 24 (16M slots,
    /// an already-generous ceiling for an in-process ready set), or if
    /// `registry_initial_size` is not a power of two.
    pub const fn new(ready_queue_bits: u8, registry_initial_size: usize) -> Self {
        assert!(
            ready_queue_bits > 0 && ready_queue_bits <= 24,
            "ready_queue_bits must be between 1 and 24"
        );
        assert!(
            registry_initial_size > 0 && registry_initial_size.is_power_of_two(),
            "registry_initial_size must be a nonzero power of two"
        );
        Self {
            ready_queue_bits,
            registry_initial_size,
        }
    }

    /// Ready queue capacity in slots.
    #[inline]
    pub const fn ready_queue_capacity(&self) -> usize {
        1 << self.ready_queue_bits
    }

    /// Initial registry table size.
    #[inline]
    pub const fn registry_initial_size(&self) -> usize {
        self.registry_initial_size
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(16, 4)
    }
}
