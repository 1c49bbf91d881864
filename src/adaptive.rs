//! 自适应空间调整策略
//!
//! 在吞吐量与内存占用之间进行权衡的回收策略。基于 HotSpot ParallelGC
//! 的自适应大小策略，但没有停顿时间目标。每次回收结束时更新在线统计，
//! 重新计算 Eden、Survivor、老年代的目标大小以及晋升年龄阈值。

use tracing::{debug, trace};

use crate::accounting::{CollectionSnapshot, HeapUsage, YoungOccupancy};
use crate::averages::{AdaptivePaddedAverage, AdaptiveWeightedAverage};
use crate::common::{GcCause, SpaceSizes};
use crate::config::{
    AdaptivePolicyConfig, ADAPTIVE_SIZE_COST_ESTIMATORS_HISTORY_LENGTH,
    ADAPTIVE_SIZE_DECREMENT_SCALE_FACTOR, ADAPTIVE_SIZE_ESTIMATOR_MIN_SIZE_THROUGHPUT_TRADEOFF,
    ADAPTIVE_SIZE_MAJOR_GC_DECAY_TIME_SCALE, ADAPTIVE_SIZE_POLICY_INITIALIZING_STEPS,
    ADAPTIVE_SIZE_POLICY_READY_THRESHOLD, ADAPTIVE_SIZE_POLICY_WEIGHT, ADAPTIVE_TIME_WEIGHT,
    CONSECUTIVE_MINOR_TO_MAJOR_COLLECTION_PAUSE_TIME_RATIO, PAUSE_PADDING, PROMOTED_PADDING,
    SURVIVOR_PADDING, TENURED_GENERATION_SIZE_INCREMENT, TENURED_GENERATION_SIZE_SUPPLEMENT_DECAY,
    THRESHOLD_TOLERANCE_PERCENT, THROUGHPUT_GOAL, YOUNG_GENERATION_SIZE_INCREMENT,
    YOUNG_GENERATION_SIZE_SUPPLEMENT_DECAY,
};
use crate::error::{PolicyError, PolicyResult};
use crate::estimator::ReciprocalLeastSquareFit;
use crate::params::SpaceParameters;
use crate::timer::{monotonic_nanos, nanos_to_seconds, IntervalTimer};
use crate::traits::CollectionPolicy;

// ============================================================================
// 辅助函数
// ============================================================================

/// 当前大小的 `percent`% ，整数截断
fn space_increment(current_size: u64, percent: u64) -> u64 {
    current_size / 100 * percent
}

/// 将 `change` 按 `part/total` 的比例缩小
fn scale_down(change: u64, part: u64, total: u64) -> u64 {
    debug_assert!(part <= total);
    if total > 0 {
        let fraction = part as f64 / total as f64;
        (fraction * change as f64) as u64
    } else {
        change
    }
}

/// 判断把空间从 `size` 扩大 `delta` 字节是否预期带来足够的吞吐量提升
///
/// 吞吐量的相对增幅必须至少达到空间相对增幅的 80%。
fn expansion_significantly_reduces_cost(
    estimator: &ReciprocalLeastSquareFit,
    size: u64,
    delta: u64,
) -> bool {
    let x0 = size as f64;
    let x0_throughput = 1.0 - estimator.estimate(x0);
    if x0 == 0.0 || x0_throughput == 0.0 {
        // 下面的除法无定义
        return false;
    }
    let x1 = x0 + delta as f64;
    let x1_throughput = 1.0 - estimator.estimate(x1);
    if x0 >= x1 || x0_throughput >= x1_throughput {
        return false;
    }
    let min = (x1 / x0 - 1.0) * ADAPTIVE_SIZE_ESTIMATOR_MIN_SIZE_THROUGHPUT_TRADEOFF;
    let estimated = x1_throughput / x0_throughput - 1.0;
    estimated >= min
}

// ============================================================================
// 策略引擎
// ============================================================================

/// 自适应空间调整策略引擎
///
/// 拥有全部在线统计（加权平均、开销估计器、区间计时器），只在
/// stop-the-world 回收边界内被调用，不加锁也不分配堆内存。
#[derive(Debug)]
pub struct AdaptiveSizePolicy {
    params: SpaceParameters,
    config: AdaptivePolicyConfig,

    /// 当前各空间的目标大小
    sizes: SpaceSizes,
    /// 当前晋升年龄阈值
    tenuring_threshold: u32,
    /// 新生代中对齐 chunk 的占比（由分配器消费）
    avg_young_aligned_chunk_fraction: AdaptiveWeightedAverage,

    minor_timer: IntervalTimer,
    avg_minor_gc_cost: AdaptiveWeightedAverage,
    avg_minor_pause: AdaptivePaddedAverage,
    avg_survived: AdaptivePaddedAverage,
    avg_promoted: AdaptivePaddedAverage,
    minor_cost_estimator: ReciprocalLeastSquareFit,
    minor_count: u64,
    /// 最近一次 Minor GC 前的 mutator 区间（纳秒）
    latest_minor_mutator_interval_nanos: u64,
    young_gen_policy_is_ready: bool,
    /// 启动期新生代增长补贴（百分点，几何衰减）
    young_size_increment_supplement: u64,
    /// 为吞吐量扩容新生代的次数，作为估计器的启用门槛
    young_changes_for_minor_throughput: u64,
    minor_count_since_major: u64,

    major_timer: IntervalTimer,
    avg_major_gc_cost: AdaptiveWeightedAverage,
    avg_major_pause: AdaptivePaddedAverage,
    avg_major_interval_seconds: AdaptiveWeightedAverage,
    avg_old_live: AdaptiveWeightedAverage,
    major_cost_estimator: ReciprocalLeastSquareFit,
    major_count: u64,
    /// 启动期老年代增长补贴（百分点，几何衰减）
    old_size_increment_supplement: u64,
    /// 最近一次 Major GC 前的 mutator 区间（纳秒）
    latest_major_mutator_interval_nanos: u64,
    /// 上次回收时晋升量超出了老年代容量
    old_size_exceeded_in_previous_collection: bool,
    /// 为吞吐量扩容老年代的次数
    old_changes_for_major_throughput: u64,
}

impl AdaptiveSizePolicy {
    /// 创建策略引擎
    ///
    /// `initial` 是收集器给出的初始目标大小。两个区间计时器从创建时刻
    /// 开始测量第一个 mutator 区间。
    ///
    /// # Errors
    ///
    /// 初始大小未对齐或越界、初始晋升阈值越界时返回错误。
    pub fn new(
        params: SpaceParameters,
        config: AdaptivePolicyConfig,
        initial: SpaceSizes,
    ) -> PolicyResult<Self> {
        Self::with_clock(params, config, initial, monotonic_nanos)
    }

    /// 创建使用指定纳秒时钟的策略引擎，测试时可注入合成时钟
    pub fn with_clock(
        params: SpaceParameters,
        config: AdaptivePolicyConfig,
        initial: SpaceSizes,
        clock: fn() -> u64,
    ) -> PolicyResult<Self> {
        Self::validate_initial_sizes(&params, &initial)?;
        let max_threshold = params.max_survivor_spaces + 1;
        if config.initial_tenuring_threshold < 1 || config.initial_tenuring_threshold > max_threshold
        {
            return Err(PolicyError::TenuringThresholdOutOfRange {
                value: config.initial_tenuring_threshold,
                max: max_threshold,
            });
        }

        let mut minor_timer = IntervalTimer::with_source(clock);
        let mut major_timer = IntervalTimer::with_source(clock);
        minor_timer.open();
        major_timer.open();

        Ok(Self {
            params,
            sizes: initial,
            tenuring_threshold: config.initial_tenuring_threshold,
            avg_young_aligned_chunk_fraction: AdaptiveWeightedAverage::new(ADAPTIVE_TIME_WEIGHT),

            minor_timer,
            avg_minor_gc_cost: AdaptiveWeightedAverage::new(ADAPTIVE_TIME_WEIGHT),
            avg_minor_pause: AdaptivePaddedAverage::new(ADAPTIVE_TIME_WEIGHT, PAUSE_PADDING),
            avg_survived: AdaptivePaddedAverage::new(ADAPTIVE_SIZE_POLICY_WEIGHT, SURVIVOR_PADDING),
            avg_promoted: AdaptivePaddedAverage::with_no_negative_deviation(
                ADAPTIVE_SIZE_POLICY_WEIGHT,
                PROMOTED_PADDING,
                true,
            ),
            minor_cost_estimator: ReciprocalLeastSquareFit::new(
                ADAPTIVE_SIZE_COST_ESTIMATORS_HISTORY_LENGTH,
            ),
            minor_count: 0,
            latest_minor_mutator_interval_nanos: 0,
            young_gen_policy_is_ready: false,
            young_size_increment_supplement: config.young_size_supplement,
            young_changes_for_minor_throughput: 0,
            minor_count_since_major: 0,

            major_timer,
            avg_major_gc_cost: AdaptiveWeightedAverage::new(ADAPTIVE_TIME_WEIGHT),
            avg_major_pause: AdaptivePaddedAverage::new(ADAPTIVE_TIME_WEIGHT, PAUSE_PADDING),
            avg_major_interval_seconds: AdaptiveWeightedAverage::new(ADAPTIVE_TIME_WEIGHT),
            avg_old_live: AdaptiveWeightedAverage::new(ADAPTIVE_SIZE_POLICY_WEIGHT),
            major_cost_estimator: ReciprocalLeastSquareFit::new(
                ADAPTIVE_SIZE_COST_ESTIMATORS_HISTORY_LENGTH,
            ),
            major_count: 0,
            old_size_increment_supplement: config.old_size_supplement,
            latest_major_mutator_interval_nanos: 0,
            old_size_exceeded_in_previous_collection: false,
            old_changes_for_major_throughput: 0,

            config,
        })
    }

    fn validate_initial_sizes(params: &SpaceParameters, initial: &SpaceSizes) -> PolicyResult<()> {
        let checks = [
            ("eden_size", initial.eden_size, params.max_eden_size),
            ("survivor_size", initial.survivor_size, params.max_survivor_size),
            ("promo_size", initial.promo_size, params.max_old_size),
            ("old_size", initial.old_size, params.max_old_size),
        ];
        for (name, value, max) in checks {
            if !params.is_aligned(value) {
                return Err(PolicyError::UnalignedParameter {
                    name,
                    value,
                    alignment: params.alignment,
                });
            }
            if value < params.min_space_size {
                return Err(PolicyError::BelowMinimumSpace {
                    name,
                    value,
                    min: params.min_space_size,
                });
            }
            if value > max {
                return Err(PolicyError::AboveMaximumSpace { name, value, max });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 开销口径
    // ------------------------------------------------------------------

    /// Minor GC 的平均开销（墙钟时间占比）
    pub fn minor_gc_cost(&self) -> f64 {
        self.avg_minor_gc_cost.average().max(0.0)
    }

    /// Major GC 的平均开销（墙钟时间占比）
    pub fn major_gc_cost(&self) -> f64 {
        self.avg_major_gc_cost.average().max(0.0)
    }

    /// 总 GC 开销，钳制在 `[0, 1]`
    pub fn gc_cost(&self) -> f64 {
        let cost = (self.minor_gc_cost() + self.major_gc_cost()).min(1.0);
        debug_assert!(cost >= 0.0);
        cost
    }

    /// 距上次 Major GC 的秒数，不破坏正在进行的测量
    fn seconds_since_major_gc(&mut self) -> f64 {
        self.major_timer.close();
        let seconds = nanos_to_seconds(self.major_timer.measured_nanos());
        self.major_timer.open();
        seconds
    }

    /// Major GC 开销随距上次 Major GC 的时间衰减后的总开销
    fn decaying_gc_cost(&mut self) -> f64 {
        let mut decayed_major_gc_cost = self.major_gc_cost();
        let avg_major_interval = self.avg_major_interval_seconds.average();
        if self.config.decay_major_gc_cost
            && ADAPTIVE_SIZE_MAJOR_GC_DECAY_TIME_SCALE > 0.0
            && avg_major_interval > 0.0
        {
            let seconds_since_major = self.seconds_since_major_gc();
            if seconds_since_major > 0.0
                && seconds_since_major > ADAPTIVE_SIZE_MAJOR_GC_DECAY_TIME_SCALE * avg_major_interval
            {
                let decayed = decayed_major_gc_cost
                    * (ADAPTIVE_SIZE_MAJOR_GC_DECAY_TIME_SCALE * avg_major_interval)
                    / seconds_since_major;
                decayed_major_gc_cost = decayed_major_gc_cost.min(decayed);
            }
        }
        (decayed_major_gc_cost + self.minor_gc_cost()).min(1.0)
    }

    fn adjusted_mutator_cost(&mut self) -> f64 {
        let cost = 1.0 - self.decaying_gc_cost();
        debug_assert!(cost >= 0.0);
        cost
    }

    // ------------------------------------------------------------------
    // 回收结束时的统计更新
    // ------------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    fn update_collection_end_averages(
        cost_average: &mut AdaptiveWeightedAverage,
        pause_average: &mut AdaptivePaddedAverage,
        cost_estimator: &mut ReciprocalLeastSquareFit,
        interval_average: Option<&mut AdaptiveWeightedAverage>,
        adapt: bool,
        mutator_nanos: u64,
        pause_nanos: u64,
        size_bytes: u64,
    ) {
        if adapt {
            let mut cost = 0.0;
            let mutator_seconds = nanos_to_seconds(mutator_nanos);
            let pause_seconds = nanos_to_seconds(pause_nanos);
            pause_average.sample(pause_seconds);
            if mutator_seconds > 0.0 && pause_seconds > 0.0 {
                let interval_seconds = mutator_seconds + pause_seconds;
                cost = pause_seconds / interval_seconds;
                cost_average.sample(cost);
                if let Some(interval_average) = interval_average {
                    interval_average.sample(interval_seconds);
                }
            }
            // 开销为 0 的样本同样喂给估计器
            cost_estimator.sample(size_bytes as f64, cost);
        }
    }

    fn update_averages(
        &mut self,
        survived_chunk_bytes: u64,
        survivor_overflow_object_bytes: u64,
        promoted_object_bytes: u64,
    ) {
        // 溢出对象按对象字节数计入，未包含多个 Survivor 空间中部分填充
        // chunk 的开销，因此会低估所需容量。扩大 Survivor、降低晋升年龄
        // 以避免溢出之后，这一偏差会自行修正。
        self.avg_survived
            .sample((survived_chunk_bytes + survivor_overflow_object_bytes) as f64);
        self.avg_promoted.sample(promoted_object_bytes as f64);
    }

    // ------------------------------------------------------------------
    // Survivor 大小与晋升阈值
    // ------------------------------------------------------------------

    fn compute_survivor_space_size_and_threshold(
        &mut self,
        is_survivor_overflow: bool,
        survivor_limit: u64,
    ) {
        if !self.young_gen_policy_is_ready {
            return;
        }

        let mut incr_tenuring_threshold = false;
        let mut decr_tenuring_threshold = false;
        if !is_survivor_overflow {
            // 用晋升阈值平衡 Minor 与 Major 回收的开销，容忍度控制其
            // 对开销差异的敏感程度
            if self.minor_gc_cost() > self.major_gc_cost() * THRESHOLD_TOLERANCE_PERCENT {
                decr_tenuring_threshold = true;
            } else if self.major_gc_cost() > self.minor_gc_cost() * THRESHOLD_TOLERANCE_PERCENT {
                incr_tenuring_threshold = true;
            }
        } else {
            decr_tenuring_threshold = true;
        }

        let mut target_size = self
            .params
            .clamp_min_space(self.params.align_up(self.avg_survived.padded_average() as u64));
        if target_size > survivor_limit {
            target_size = survivor_limit;
            decr_tenuring_threshold = true;
        }
        self.sizes.survivor_size = target_size;

        if decr_tenuring_threshold {
            self.tenuring_threshold = self.tenuring_threshold.saturating_sub(1).max(1);
        } else if incr_tenuring_threshold {
            self.tenuring_threshold =
                (self.tenuring_threshold + 1).min(self.params.max_survivor_spaces + 1);
        }
    }

    // ------------------------------------------------------------------
    // Eden 大小
    // ------------------------------------------------------------------

    fn eden_increment_with_supplement_aligned_up(&self, current_eden: u64) -> u64 {
        self.params.align_up(space_increment(
            current_eden,
            self.young_size_increment_supplement + YOUNG_GENERATION_SIZE_INCREMENT,
        ))
    }

    fn eden_decrement(current_eden: u64) -> u64 {
        space_increment(current_eden, YOUNG_GENERATION_SIZE_INCREMENT)
            / ADAPTIVE_SIZE_DECREMENT_SCALE_FACTOR
    }

    fn adjust_eden_for_footprint(&self, current_eden: u64, desired_sum: u64) -> u64 {
        debug_assert!(current_eden <= desired_sum);
        let change = Self::eden_decrement(current_eden);
        let change = scale_down(change, current_eden, desired_sum);
        let reduced_size = current_eden.saturating_sub(change);
        self.params.align_up(reduced_size)
    }

    fn compute_eden_space_size(&mut self) {
        // 一般假设：扩容会降低开销
        let mut expansion_reduces_cost = true;
        let use_estimator = self.config.use_cost_estimators
            && self.young_changes_for_minor_throughput > ADAPTIVE_SIZE_POLICY_INITIALIZING_STEPS;
        if use_estimator {
            expansion_reduces_cost =
                self.minor_cost_estimator.slope(self.sizes.eden_size as f64) <= 0.0;
        }

        let mut desired_eden_size = self.sizes.eden_size;
        if expansion_reduces_cost
            && self.adjusted_mutator_cost() < THROUGHPUT_GOAL
            && self.gc_cost() > 0.0
        {
            let eden_heap_delta = self.eden_increment_with_supplement_aligned_up(self.sizes.eden_size);
            let scale_by_ratio = self.minor_gc_cost() / self.gc_cost();
            debug_assert!((0.0..=1.0).contains(&scale_by_ratio));
            let scaled_eden_heap_delta = (scale_by_ratio * eden_heap_delta as f64) as u64;

            expansion_reduces_cost = !use_estimator
                || expansion_significantly_reduces_cost(
                    &self.minor_cost_estimator,
                    self.sizes.eden_size,
                    scaled_eden_heap_delta,
                );
            if expansion_reduces_cost {
                desired_eden_size = self
                    .params
                    .align_up(desired_eden_size.saturating_add(scaled_eden_heap_delta));
                desired_eden_size = desired_eden_size.max(self.sizes.eden_size);
                self.young_changes_for_minor_throughput += 1;
            }
            // 估计器认为扩容带不来显著收益时走下面的缩容路径，避免停在
            // 假想的最优点上，也能继续积累数据点
        }
        if !expansion_reduces_cost
            || (self.config.use_footprint_goal
                && self.young_gen_policy_is_ready
                && self.adjusted_mutator_cost() >= THROUGHPUT_GOAL)
        {
            let desired_sum = self.sizes.eden_size.saturating_add(self.sizes.promo_size);
            desired_eden_size = self.adjust_eden_for_footprint(self.sizes.eden_size, desired_sum);
        }
        debug_assert!(self.params.is_aligned(desired_eden_size));
        desired_eden_size = self.params.clamp_min_space(desired_eden_size);

        let eden_limit = self.params.max_eden_size;
        if desired_eden_size > eden_limit {
            // 想扩但已到上限时不反向缩小，否则 Eden 会逐渐漂移变小；
            // 让晋升阈值的计算把更多对象推入老年代
            desired_eden_size = eden_limit.max(self.sizes.eden_size);
        }
        self.sizes.eden_size = desired_eden_size;
    }

    // ------------------------------------------------------------------
    // 老年代大小
    // ------------------------------------------------------------------

    fn promo_increment(current_promo: u64) -> u64 {
        space_increment(current_promo, TENURED_GENERATION_SIZE_INCREMENT)
    }

    fn promo_increment_with_supplement_aligned_up(&self, current_promo: u64) -> u64 {
        self.params.align_up(space_increment(
            current_promo,
            self.old_size_increment_supplement + TENURED_GENERATION_SIZE_INCREMENT,
        ))
    }

    fn promo_decrement(current_promo: u64) -> u64 {
        Self::promo_increment(current_promo) / ADAPTIVE_SIZE_DECREMENT_SCALE_FACTOR
    }

    fn adjust_promo_for_footprint(&self, current_promo: u64, desired_sum: u64) -> u64 {
        debug_assert!(current_promo <= desired_sum);
        let change = Self::promo_decrement(current_promo);
        let change = scale_down(change, current_promo, desired_sum);
        let reduced_size = current_promo.saturating_sub(change);
        self.params.align_up(reduced_size)
    }

    /// 晋升预留加上晋升量的上估计，即老年代期望保持的空闲空间
    fn calculated_old_free_size_in_bytes(&self) -> u64 {
        (self.sizes.promo_size as f64 + self.avg_promoted.padded_average()) as u64
    }

    fn compute_old_gen_space_size(&mut self, old_live: u64) {
        self.avg_old_live.sample(old_live as f64);

        // maxOldSize 缩小导致差值为负时，转换饱和为 0
        let promo_limit = (self.params.max_old_size as f64 - self.avg_old_live.average()) as u64;
        let promo_limit = self
            .params
            .align_down(self.sizes.promo_size.max(promo_limit));

        let mut expansion_reduces_cost = true;
        let use_estimator = self.config.use_cost_estimators
            && self.old_changes_for_major_throughput > ADAPTIVE_SIZE_POLICY_INITIALIZING_STEPS;
        if use_estimator {
            expansion_reduces_cost =
                self.major_cost_estimator.slope(self.sizes.promo_size as f64) <= 0.0;
        }

        let mut desired_promo_size = self.sizes.promo_size;
        if expansion_reduces_cost
            && self.adjusted_mutator_cost() < THROUGHPUT_GOAL
            && self.gc_cost() > 0.0
        {
            let promo_heap_delta =
                self.promo_increment_with_supplement_aligned_up(self.sizes.promo_size);
            let scale_by_ratio = self.major_gc_cost() / self.gc_cost();
            debug_assert!((0.0..=1.0).contains(&scale_by_ratio));
            let scaled_promo_heap_delta = (scale_by_ratio * promo_heap_delta as f64) as u64;

            expansion_reduces_cost = !use_estimator
                || expansion_significantly_reduces_cost(
                    &self.major_cost_estimator,
                    self.sizes.promo_size,
                    scaled_promo_heap_delta,
                );
            if expansion_reduces_cost {
                desired_promo_size = self
                    .params
                    .align_up(self.sizes.promo_size.saturating_add(scaled_promo_heap_delta));
                desired_promo_size = desired_promo_size.max(self.sizes.promo_size);
                self.old_changes_for_major_throughput += 1;
            }
        }
        if !expansion_reduces_cost
            || (self.config.use_footprint_goal
                && self.young_gen_policy_is_ready
                && self.adjusted_mutator_cost() >= THROUGHPUT_GOAL)
        {
            let desired_sum = self.sizes.eden_size.saturating_add(self.sizes.promo_size);
            desired_promo_size = self.adjust_promo_for_footprint(self.sizes.promo_size, desired_sum);
        }
        debug_assert!(self.params.is_aligned(desired_promo_size));
        desired_promo_size = self.params.clamp_min_space(desired_promo_size);

        desired_promo_size = desired_promo_size.min(promo_limit);
        self.sizes.promo_size = desired_promo_size;

        let desired_free_space = self.calculated_old_free_size_in_bytes();
        let desired_old_size = self.params.align_up(old_live.saturating_add(desired_free_space));
        self.sizes.old_size =
            desired_old_size.clamp(self.params.min_space_size, self.params.max_old_size);
    }

    // ------------------------------------------------------------------
    // 启动补贴衰减
    // ------------------------------------------------------------------

    fn decay_supplemental_growth(&mut self, complete_collection: bool) {
        // 补贴只用于加速初始增长，即使没有被用到也照常衰减
        if complete_collection {
            // Major GC 不等待就绪门槛
            if self.major_count % TENURED_GENERATION_SIZE_SUPPLEMENT_DECAY == 0 {
                self.old_size_increment_supplement >>= 1;
            }
        } else if self.minor_count >= ADAPTIVE_SIZE_POLICY_READY_THRESHOLD
            && self.minor_count % YOUNG_GENERATION_SIZE_SUPPLEMENT_DECAY == 0
        {
            self.young_size_increment_supplement >>= 1;
        }
    }

    // ------------------------------------------------------------------
    // 只读访问
    // ------------------------------------------------------------------

    /// Eden 的当前目标大小
    pub fn eden_size(&self) -> u64 {
        self.sizes.eden_size
    }

    /// 单个 Survivor 空间的当前目标大小
    pub fn survivor_size(&self) -> u64 {
        self.sizes.survivor_size
    }

    /// 晋升预留的当前目标大小
    pub fn promo_size(&self) -> u64 {
        self.sizes.promo_size
    }

    /// 老年代的当前目标大小
    pub fn old_size(&self) -> u64 {
        self.sizes.old_size
    }

    /// 新生代策略是否已经就绪
    pub fn is_young_gen_policy_ready(&self) -> bool {
        self.young_gen_policy_is_ready
    }

    /// 已发生的 Minor GC 次数
    pub fn minor_collection_count(&self) -> u64 {
        self.minor_count
    }

    /// 已发生的 Major GC 次数
    pub fn major_collection_count(&self) -> u64 {
        self.major_count
    }

    /// 当前新生代启动补贴（百分点）
    pub fn young_size_supplement(&self) -> u64 {
        self.young_size_increment_supplement
    }

    /// 当前老年代启动补贴（百分点）
    pub fn old_size_supplement(&self) -> u64 {
        self.old_size_increment_supplement
    }

    /// 新生代中对齐 chunk 占比的平均值
    pub fn young_aligned_chunk_fraction(&self) -> f64 {
        self.avg_young_aligned_chunk_fraction.average()
    }
}

impl CollectionPolicy for AdaptiveSizePolicy {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn should_collect_completely(
        &mut self,
        following_incremental: bool,
        usage: &HeapUsage,
    ) -> bool {
        if !following_incremental {
            // 总是先做增量回收：新生代大部分对象预期是垃圾，回收后剩下
            // 的 chunk 可以少分配一些内存就完成老年代活对象的复制
            return false;
        }
        if self.old_size_exceeded_in_previous_collection {
            // 上一次增量回收为避免晋升失败，把对象晋升到了老年代当前容量
            // 之外。跟进一次完整回收，回收足够的空间或扩大老年代
            debug!(cause = "old size exceeded", "forcing complete collection");
            return true;
        }
        if self.minor_count_since_major as f64 * self.avg_minor_pause.average()
            >= CONSECUTIVE_MINOR_TO_MAJOR_COLLECTION_PAUSE_TIME_RATIO as f64
                * self.avg_major_pause.padded_average()
        {
            // 增量回收一直能腾出足够空间时，累计停顿达到阈值后仍然触发
            // 一次完整回收，让老年代中的垃圾也有机会被回收
            debug!(
                minor_since_major = self.minor_count_since_major,
                cause = "cumulative minor pause",
                "forcing complete collection"
            );
            return true;
        }

        // 老年代剩余空间小于下次回收的预期晋升量时，立即做完整回收
        let average_promoted = self.avg_promoted.padded_average() as u64;
        let promotion_estimate = average_promoted.min(usage.young_chunk_bytes);
        let old_free = self.sizes.old_size.saturating_sub(usage.old_chunk_bytes);
        promotion_estimate > old_free
    }

    fn on_collection_begin(&mut self, complete: bool, young: &YoungOccupancy) {
        if complete {
            self.major_timer.close();
            self.latest_major_mutator_interval_nanos = self.major_timer.measured_nanos();
        } else {
            self.minor_timer.close();
            self.latest_minor_mutator_interval_nanos = self.minor_timer.measured_nanos();
        }

        // 在回收开始时采样对齐 chunk 占比，把已死对象也计算在内，因为
        // 该占比用于为后续分配预留对齐 chunk
        if young.chunk_bytes != 0 {
            self.avg_young_aligned_chunk_fraction
                .sample(young.aligned_chunk_bytes as f64 / young.chunk_bytes as f64);
        }

        // 开始测量停顿时长
        if complete {
            self.major_timer.reset();
            self.major_timer.open();
        } else {
            self.minor_timer.reset();
            self.minor_timer.open();
        }
    }

    fn on_collection_end(&mut self, complete: bool, cause: GcCause, snapshot: &CollectionSnapshot) {
        let adapt = cause == GcCause::OnAllocation || self.config.adapt_on_explicit_gc;

        let (pause_nanos, mutator_nanos) = if complete {
            self.major_timer.close();
            (
                self.major_timer.measured_nanos(),
                self.latest_major_mutator_interval_nanos,
            )
        } else {
            self.minor_timer.close();
            (
                self.minor_timer.measured_nanos(),
                self.latest_minor_mutator_interval_nanos,
            )
        };

        if complete {
            Self::update_collection_end_averages(
                &mut self.avg_major_gc_cost,
                &mut self.avg_major_pause,
                &mut self.major_cost_estimator,
                Some(&mut self.avg_major_interval_seconds),
                adapt,
                mutator_nanos,
                pause_nanos,
                self.sizes.promo_size,
            );
            self.major_count += 1;
            self.minor_count_since_major = 0;
        } else {
            Self::update_collection_end_averages(
                &mut self.avg_minor_gc_cost,
                &mut self.avg_minor_pause,
                &mut self.minor_cost_estimator,
                None,
                adapt,
                mutator_nanos,
                pause_nanos,
                self.sizes.eden_size,
            );
            self.minor_count += 1;
            self.minor_count_since_major += 1;

            if self.minor_count >= ADAPTIVE_SIZE_POLICY_READY_THRESHOLD {
                self.young_gen_policy_is_ready = true;
            }
        }

        // 开始测量下一个 mutator 区间
        if complete {
            self.major_timer.reset();
            self.major_timer.open();
        } else {
            self.minor_timer.reset();
            self.minor_timer.open();
        }

        let old_live = snapshot.old_generation_after_chunk_bytes;
        self.old_size_exceeded_in_previous_collection = old_live > self.sizes.old_size;

        self.update_averages(
            snapshot.survivor_chunk_bytes,
            snapshot.survivor_overflow_object_bytes,
            snapshot.tenured_object_bytes,
        );

        self.compute_survivor_space_size_and_threshold(
            snapshot.survivor_overflow_object_bytes > 0,
            self.params.max_survivor_size,
        );
        self.compute_eden_space_size();
        if complete {
            self.compute_old_gen_space_size(old_live);
        }
        self.decay_supplemental_growth(complete);

        trace!(
            complete,
            %cause,
            eden = self.sizes.eden_size,
            survivor = self.sizes.survivor_size,
            promo = self.sizes.promo_size,
            old = self.sizes.old_size,
            tenuring_threshold = self.tenuring_threshold,
            "collection end sizing"
        );
    }

    fn gc_count(&self) -> u64 {
        // 两次普通整数读取，计数只在安全点更新，调用方容忍读到中间状态
        self.minor_count + self.major_count
    }

    fn sizes(&self) -> SpaceSizes {
        self.sizes
    }

    fn tenuring_threshold(&self) -> u32 {
        self.tenuring_threshold
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator_with(points: &[(f64, f64)]) -> ReciprocalLeastSquareFit {
        let mut fit = ReciprocalLeastSquareFit::new(25);
        for &(x, y) in points {
            fit.sample(x, y);
        }
        fit
    }

    #[test]
    fn test_significance_rejects_zero_size() {
        let fit = estimator_with(&[(100.0, 0.5), (200.0, 0.25)]);
        assert!(!expansion_significantly_reduces_cost(&fit, 0, 100));
    }

    #[test]
    fn test_significance_rejects_zero_delta() {
        let fit = estimator_with(&[(100.0, 0.5), (200.0, 0.25)]);
        // x0 >= x1
        assert!(!expansion_significantly_reduces_cost(&fit, 100, 0));
    }

    #[test]
    fn test_significance_rejects_flat_estimate() {
        // 常数开销：吞吐量不随扩容变化
        let fit = estimator_with(&[(100.0, 0.3), (200.0, 0.3), (400.0, 0.3)]);
        assert!(!expansion_significantly_reduces_cost(&fit, 200, 100));
    }

    #[test]
    fn test_significance_accepts_steep_cost_drop() {
        // y = 60/x，x0=100 → x1=110：吞吐量 0.4 → 0.455，
        // est ≈ 0.136 ≥ (1.1 - 1) × 0.8 = 0.08
        let fit = estimator_with(&[(100.0, 0.6), (200.0, 0.3), (400.0, 0.15), (800.0, 0.075)]);
        assert!(expansion_significantly_reduces_cost(&fit, 100, 10));
    }

    #[test]
    fn test_significance_monotone_in_slope_magnitude() {
        // 相同的步幅下，开销下降越陡峭越容易通过
        let shallow = estimator_with(&[(100.0, 0.20), (200.0, 0.19), (400.0, 0.185)]);
        let steep = estimator_with(&[(100.0, 0.6), (200.0, 0.3), (400.0, 0.15)]);
        assert!(!expansion_significantly_reduces_cost(&shallow, 100, 10));
        assert!(expansion_significantly_reduces_cost(&steep, 100, 10));
    }

    #[test]
    fn test_space_increment_truncates() {
        assert_eq!(space_increment(1000, 10), 100);
        assert_eq!(space_increment(99, 10), 0);
    }

    #[test]
    fn test_scale_down() {
        assert_eq!(scale_down(100, 50, 100), 50);
        assert_eq!(scale_down(100, 100, 100), 100);
        assert_eq!(scale_down(100, 0, 100), 0);
        // total 为 0 时不缩放
        assert_eq!(scale_down(100, 0, 0), 100);
    }
}
