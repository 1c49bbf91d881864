//! 策略校准常量与可配置开关
//!
//! 常量取自 HotSpot ParallelGC 的自适应策略默认值（个别值为偏向小内存占用的
//! 调整）。不要单独修改某个常量：它们之间存在未在代码中表达的依赖关系。

use serde::{Deserialize, Serialize};

/// 时间类平均值的默认权重
pub const DEFAULT_TIME_WEIGHT: u32 = 25;

/// 开销、停顿、间隔平均值的权重
pub const ADAPTIVE_TIME_WEIGHT: u32 = DEFAULT_TIME_WEIGHT;

/// 空间类平均值（存活量、晋升量、老年代活对象）的权重
pub const ADAPTIVE_SIZE_POLICY_WEIGHT: u32 = 10;

/// 经历多少次 Minor GC 后新生代策略开始生效
pub const ADAPTIVE_SIZE_POLICY_READY_THRESHOLD: u64 = 5;

/// 在咨询开销估计器之前需要先应用的扩容次数
pub const ADAPTIVE_SIZE_POLICY_INITIALIZING_STEPS: u64 = ADAPTIVE_SIZE_POLICY_READY_THRESHOLD;

/// 缩容步长 = 扩容步长 / 此系数
pub const ADAPTIVE_SIZE_DECREMENT_SCALE_FACTOR: u64 = 4;

/// 晋升阈值对 Minor/Major 开销差异的容忍度（百分比）
pub const THRESHOLD_TOLERANCE: u32 = 10;

/// Survivor 空间平滑平均的偏差补偿倍数
pub const SURVIVOR_PADDING: u32 = 3;

/// 晋升量平滑平均的偏差补偿倍数
pub const PROMOTED_PADDING: u32 = 3;

/// 停顿时间平滑平均的偏差补偿倍数
pub const PAUSE_PADDING: u32 = 1;

/// 初始晋升年龄阈值
pub const INITIAL_TENURING_THRESHOLD: u32 = 7;

/// mutator 时间与 GC 时间的目标比值。HotSpot 默认 99（1% 时间用于 GC），
/// 这里取 19（5%）以偏向较小的内存占用。
pub const GC_TIME_RATIO: u32 = 19;

/// 新生代扩容步长（当前大小的百分比）。从 HotSpot 默认的 20 下调，
/// 让估计器以更小的步幅调整堆大小。
pub const YOUNG_GENERATION_SIZE_INCREMENT: u64 = 10;

/// 老年代扩容步长（当前大小的百分比）
pub const TENURED_GENERATION_SIZE_INCREMENT: u64 = 10;

/// 启动期新生代增长加速补贴（百分点，HotSpot 默认 80）
pub const YOUNG_GENERATION_SIZE_SUPPLEMENT: u64 = 0;

/// 启动期老年代增长加速补贴（百分点，HotSpot 默认 80）
pub const TENURED_GENERATION_SIZE_SUPPLEMENT: u64 = 0;

/// 新生代补贴衰减周期（每多少次 Minor GC 减半）
pub const YOUNG_GENERATION_SIZE_SUPPLEMENT_DECAY: u64 = 8;

/// 老年代补贴衰减周期（每多少次 Major GC 减半）
pub const TENURED_GENERATION_SIZE_SUPPLEMENT_DECAY: u64 = 2;

/// Major GC 开销随距上次 Major GC 时间的衰减尺度
pub const ADAPTIVE_SIZE_MAJOR_GC_DECAY_TIME_SCALE: f64 = 10.0;

/// 扩容 1% 所要求的最小吞吐量提升（与空间增幅之比）
pub const ADAPTIVE_SIZE_ESTIMATOR_MIN_SIZE_THROUGHPUT_TRADEOFF: f64 = 0.8;

/// 开销估计器的有效历史长度（指数衰减）
pub const ADAPTIVE_SIZE_COST_ESTIMATORS_HISTORY_LENGTH: u32 = ADAPTIVE_TIME_WEIGHT;

/// 连续 Minor GC 累计停顿超过 Major GC 停顿的多少倍后触发完整回收
pub const CONSECUTIVE_MINOR_TO_MAJOR_COLLECTION_PAUSE_TIME_RATIO: u64 = 2;

/// 吞吐量目标：mutator 时间占比 `1 - 1/(1 + GC_TIME_RATIO)`
pub const THROUGHPUT_GOAL: f64 = 1.0 - 1.0 / (1.0 + GC_TIME_RATIO as f64);

/// 晋升阈值容忍度的乘数形式
pub const THRESHOLD_TOLERANCE_PERCENT: f64 = 1.0 + THRESHOLD_TOLERANCE as f64 / 100.0;

/// 自适应策略的可配置开关
///
/// 默认值即上面的校准常量，一般不需要修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptivePolicyConfig {
    /// 是否使用倒数最小二乘估计器限制无效扩容
    pub use_cost_estimators: bool,
    /// 达到吞吐量目标后是否为内存占用缩容
    pub use_footprint_goal: bool,
    /// 是否随时间衰减 Major GC 开销
    pub decay_major_gc_cost: bool,
    /// 显式触发的回收是否参与统计
    pub adapt_on_explicit_gc: bool,
    /// 启动期新生代增长补贴（百分点）
    pub young_size_supplement: u64,
    /// 启动期老年代增长补贴（百分点）
    pub old_size_supplement: u64,
    /// 初始晋升年龄阈值
    pub initial_tenuring_threshold: u32,
}

impl Default for AdaptivePolicyConfig {
    fn default() -> Self {
        Self {
            use_cost_estimators: true,
            use_footprint_goal: true,
            decay_major_gc_cost: true,
            adapt_on_explicit_gc: false,
            young_size_supplement: YOUNG_GENERATION_SIZE_SUPPLEMENT,
            old_size_supplement: TENURED_GENERATION_SIZE_SUPPLEMENT,
            initial_tenuring_threshold: INITIAL_TENURING_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_constants() {
        assert_eq!(THROUGHPUT_GOAL, 0.95);
        assert!((THRESHOLD_TOLERANCE_PERCENT - 1.10).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_values() {
        assert_eq!(ADAPTIVE_TIME_WEIGHT, 25);
        assert_eq!(ADAPTIVE_SIZE_POLICY_WEIGHT, 10);
        assert_eq!(ADAPTIVE_SIZE_POLICY_READY_THRESHOLD, 5);
        assert_eq!(ADAPTIVE_SIZE_POLICY_INITIALIZING_STEPS, 5);
        assert_eq!(ADAPTIVE_SIZE_DECREMENT_SCALE_FACTOR, 4);
        assert_eq!(SURVIVOR_PADDING, 3);
        assert_eq!(PROMOTED_PADDING, 3);
        assert_eq!(PAUSE_PADDING, 1);
        assert_eq!(INITIAL_TENURING_THRESHOLD, 7);
        assert_eq!(YOUNG_GENERATION_SIZE_INCREMENT, 10);
        assert_eq!(TENURED_GENERATION_SIZE_INCREMENT, 10);
        assert_eq!(YOUNG_GENERATION_SIZE_SUPPLEMENT_DECAY, 8);
        assert_eq!(TENURED_GENERATION_SIZE_SUPPLEMENT_DECAY, 2);
        assert_eq!(ADAPTIVE_SIZE_MAJOR_GC_DECAY_TIME_SCALE, 10.0);
        assert_eq!(ADAPTIVE_SIZE_ESTIMATOR_MIN_SIZE_THROUGHPUT_TRADEOFF, 0.8);
        assert_eq!(ADAPTIVE_SIZE_COST_ESTIMATORS_HISTORY_LENGTH, 25);
        assert_eq!(CONSECUTIVE_MINOR_TO_MAJOR_COLLECTION_PAUSE_TIME_RATIO, 2);
    }

    #[test]
    fn test_default_config() {
        let config = AdaptivePolicyConfig::default();
        assert!(config.use_cost_estimators);
        assert!(config.use_footprint_goal);
        assert!(config.decay_major_gc_cost);
        assert!(!config.adapt_on_explicit_gc);
        assert_eq!(config.young_size_supplement, 0);
        assert_eq!(config.old_size_supplement, 0);
        assert_eq!(config.initial_tenuring_threshold, 7);
    }
}
