//! Collection policy traits

use crate::accounting::{CollectionSnapshot, HeapUsage, YoungOccupancy};
use crate::common::{GcCause, SpaceSizes};
use crate::params::SpaceParameters;

/// GC collection policy
///
/// Decides, at stop-the-world collection boundaries, whether the next
/// collection should be incremental (young-only) or complete (young + old)
/// and what the space targets for the next cycle are.
pub trait CollectionPolicy: Send + Sync {
    /// Get policy name
    fn name(&self) -> &'static str;

    /// Check whether a complete collection should follow
    ///
    /// `following_incremental` is true when an incremental collection has
    /// already run in the current cycle.
    fn should_collect_completely(&mut self, following_incremental: bool, usage: &HeapUsage)
        -> bool;

    /// Called at the start of a collection pause
    fn on_collection_begin(&mut self, complete: bool, young: &YoungOccupancy);

    /// Called at the end of a collection pause
    fn on_collection_end(&mut self, complete: bool, cause: GcCause, snapshot: &CollectionSnapshot);

    /// Total number of collections so far
    ///
    /// Two plain integer reads; safe to call from uninterruptible contexts
    /// because the counters only change at safepoints.
    fn gc_count(&self) -> u64;

    /// Current space size targets
    fn sizes(&self) -> SpaceSizes;

    /// Current tenuring threshold
    fn tenuring_threshold(&self) -> u32;
}

/// Fixed proportional policy
///
/// Splits the heap budget young:old by a constant ratio and never adapts.
/// Requests a complete collection once the old generation has less free
/// space than the whole young generation could promote.
#[derive(Debug, Clone)]
pub struct ProportionalSpacesPolicy {
    sizes: SpaceSizes,
    tenuring_threshold: u32,
    minor_count: u64,
    major_count: u64,
}

impl ProportionalSpacesPolicy {
    /// Create a policy with a fixed `1/(young_fraction_denominator)` of the
    /// old-generation budget given to eden.
    pub fn new(params: &SpaceParameters, young_fraction_denominator: u64) -> Self {
        let eden = params.clamp_min_space(
            params.align_down(params.max_old_size / young_fraction_denominator.max(1)),
        );
        Self {
            sizes: SpaceSizes {
                eden_size: eden.min(params.max_eden_size),
                survivor_size: params.min_space_size,
                promo_size: params.min_space_size,
                old_size: params.max_old_size,
            },
            tenuring_threshold: 1,
            minor_count: 0,
            major_count: 0,
        }
    }
}

impl CollectionPolicy for ProportionalSpacesPolicy {
    fn name(&self) -> &'static str {
        "proportional"
    }

    fn should_collect_completely(
        &mut self,
        following_incremental: bool,
        usage: &HeapUsage,
    ) -> bool {
        let old_free = self.sizes.old_size.saturating_sub(usage.old_chunk_bytes);
        following_incremental && usage.young_chunk_bytes > old_free
    }

    fn on_collection_begin(&mut self, _complete: bool, _young: &YoungOccupancy) {}

    fn on_collection_end(
        &mut self,
        complete: bool,
        _cause: GcCause,
        _snapshot: &CollectionSnapshot,
    ) {
        if complete {
            self.major_count += 1;
        } else {
            self.minor_count += 1;
        }
    }

    fn gc_count(&self) -> u64 {
        self.minor_count + self.major_count
    }

    fn sizes(&self) -> SpaceSizes {
        self.sizes
    }

    fn tenuring_threshold(&self) -> u32 {
        self.tenuring_threshold
    }
}

/// Policy that never requests a complete collection
#[derive(Debug, Clone)]
pub struct IncrementalOnlyPolicy {
    sizes: SpaceSizes,
    tenuring_threshold: u32,
    minor_count: u64,
}

impl IncrementalOnlyPolicy {
    /// Create an incremental-only policy with fixed space targets
    pub fn new(params: &SpaceParameters) -> Self {
        Self {
            sizes: SpaceSizes {
                eden_size: params.max_eden_size,
                survivor_size: params.min_space_size,
                promo_size: params.min_space_size,
                old_size: params.max_old_size,
            },
            tenuring_threshold: 1,
            minor_count: 0,
        }
    }
}

impl CollectionPolicy for IncrementalOnlyPolicy {
    fn name(&self) -> &'static str {
        "incremental-only"
    }

    fn should_collect_completely(
        &mut self,
        _following_incremental: bool,
        _usage: &HeapUsage,
    ) -> bool {
        false
    }

    fn on_collection_begin(&mut self, _complete: bool, _young: &YoungOccupancy) {}

    fn on_collection_end(
        &mut self,
        _complete: bool,
        _cause: GcCause,
        _snapshot: &CollectionSnapshot,
    ) {
        self.minor_count += 1;
    }

    fn gc_count(&self) -> u64 {
        self.minor_count
    }

    fn sizes(&self) -> SpaceSizes {
        self.sizes
    }

    fn tenuring_threshold(&self) -> u32 {
        self.tenuring_threshold
    }
}
