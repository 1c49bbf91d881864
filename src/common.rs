//! 共享类型定义
//!
//! 定义在多个回收策略之间共享的通用值类型

use serde::{Deserialize, Serialize};

/// 各空间的目标大小（字节，均为对齐单位的整数倍）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSizes {
    /// Eden 目标大小
    pub eden_size: u64,
    /// 单个 Survivor 空间的目标大小
    pub survivor_size: u64,
    /// 为下次晋升预留的老年代空闲空间
    pub promo_size: u64,
    /// 老年代目标大小
    pub old_size: u64,
}

/// 回收触发原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcCause {
    /// 分配失败触发（常规路径，参与自适应统计）
    OnAllocation,
    /// 应用显式请求的回收
    Explicit,
    /// 诊断或工具触发的回收
    Diagnostic,
}

impl std::fmt::Display for GcCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GcCause::OnAllocation => write!(f, "OnAllocation"),
            GcCause::Explicit => write!(f, "Explicit"),
            GcCause::Diagnostic => write!(f, "Diagnostic"),
        }
    }
}
