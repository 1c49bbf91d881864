//! 回收记账快照
//!
//! 收集器在回收边界向策略提供的只读值对象。策略不直接访问堆，
//! 所有活字节信息都经由这些快照传入。

use serde::{Deserialize, Serialize};

/// 回收开始前的新生代占用情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoungOccupancy {
    /// 新生代全部 chunk 字节数（含死对象）
    pub chunk_bytes: u64,
    /// 其中对齐 chunk 的字节数
    pub aligned_chunk_bytes: u64,
}

/// 回收结束后的记账快照
///
/// Survivor 使用 chunk 字节数而非对象字节数：存活对象按年龄分散在多个
/// 空间中，部分填充的 chunk 开销不可忽略，用 chunk 字节数可以避免低估
/// 所需的 Survivor 容量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Survivor 空间的 chunk 字节数
    pub survivor_chunk_bytes: u64,
    /// 溢出到老年代的 Survivor 对象字节数
    pub survivor_overflow_object_bytes: u64,
    /// 晋升到老年代的对象字节数（含溢出部分）
    pub tenured_object_bytes: u64,
    /// 回收后老年代的 chunk 字节数
    pub old_generation_after_chunk_bytes: u64,
}

/// 判断是否需要完整回收时的堆占用情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapUsage {
    /// 新生代已使用的 chunk 字节数
    pub young_chunk_bytes: u64,
    /// 老年代已使用的 chunk 字节数
    pub old_chunk_bytes: u64,
}
