//! GC Policy - 分代垃圾回收的自适应空间调整策略
//!
//! 在每次回收结束时决定下一次回收的类型（仅新生代的增量回收或包含老年代的
//! 完整回收）、各空间（Eden、Survivor、老年代）的目标大小以及晋升年龄阈值。
//!
//! ## 主要功能
//!
//! - **在线统计**: 指数加权平均与带偏差补偿的平滑平均
//! - **吞吐量建模**: 倒数最小二乘拟合估计扩容的边际收益
//! - **反馈调整**: 吞吐量目标与内存占用目标之间的权衡
//! - **晋升阈值调整**: 平衡 Minor GC 与 Major GC 的开销
//!
//! 策略只在 stop-the-world 回收边界内执行，不加锁、不分配堆内存。

pub mod accounting;
pub mod adaptive;
pub mod averages;
pub mod common;
pub mod config;
pub mod error;
pub mod estimator;
pub mod params;
pub mod timer;
pub mod traits;

// 重新导出核心类型
pub use adaptive::AdaptiveSizePolicy;
pub use common::{GcCause, SpaceSizes};
pub use config::AdaptivePolicyConfig;
pub use error::{PolicyError, PolicyResult};

// Re-export accounting inputs
pub use accounting::{CollectionSnapshot, HeapUsage, YoungOccupancy};

// Re-export building blocks
pub use averages::{AdaptivePaddedAverage, AdaptiveWeightedAverage};
pub use estimator::ReciprocalLeastSquareFit;
pub use params::SpaceParameters;
pub use timer::IntervalTimer;

// Re-export policy traits and the simple policies
pub use traits::{CollectionPolicy, IncrementalOnlyPolicy, ProportionalSpacesPolicy};
