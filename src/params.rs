//! 空间大小参数
//!
//! 由外部收集器在初始化时提供：对齐单位、各空间的最小/最大值以及
//! Survivor 空间数量。所有目标大小的对齐与钳制都经由这里完成。

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};

/// 收集器的空间大小参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceParameters {
    /// 对齐单位（2 的幂）
    pub alignment: u64,
    /// 任何空间的最小大小
    pub min_space_size: u64,
    /// Eden 的最大大小
    pub max_eden_size: u64,
    /// 单个 Survivor 空间的最大大小
    pub max_survivor_size: u64,
    /// 老年代的最大大小
    pub max_old_size: u64,
    /// Survivor 空间数量（晋升阈值上限为该值 + 1）
    pub max_survivor_spaces: u32,
}

impl SpaceParameters {
    /// 创建并校验空间参数
    ///
    /// # Errors
    ///
    /// 对齐单位不是 2 的幂、某个参数未对齐或最大值低于最小空间大小时返回错误。
    pub fn new(
        alignment: u64,
        min_space_size: u64,
        max_eden_size: u64,
        max_survivor_size: u64,
        max_old_size: u64,
        max_survivor_spaces: u32,
    ) -> PolicyResult<Self> {
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(PolicyError::InvalidAlignment { alignment });
        }
        let params = Self {
            alignment,
            min_space_size,
            max_eden_size,
            max_survivor_size,
            max_old_size,
            max_survivor_spaces,
        };
        for (name, value) in [
            ("min_space_size", min_space_size),
            ("max_eden_size", max_eden_size),
            ("max_survivor_size", max_survivor_size),
            ("max_old_size", max_old_size),
        ] {
            if !params.is_aligned(value) {
                return Err(PolicyError::UnalignedParameter {
                    name,
                    value,
                    alignment,
                });
            }
        }
        if min_space_size == 0 {
            return Err(PolicyError::BelowMinimumSpace {
                name: "min_space_size",
                value: 0,
                min: alignment,
            });
        }
        for (name, value) in [
            ("max_eden_size", max_eden_size),
            ("max_survivor_size", max_survivor_size),
            ("max_old_size", max_old_size),
        ] {
            if value < min_space_size {
                return Err(PolicyError::BelowMinimumSpace {
                    name,
                    value,
                    min: min_space_size,
                });
            }
        }
        Ok(params)
    }

    /// 向上对齐
    pub fn align_up(&self, value: u64) -> u64 {
        value.saturating_add(self.alignment - 1) & !(self.alignment - 1)
    }

    /// 向下对齐
    pub fn align_down(&self, value: u64) -> u64 {
        value & !(self.alignment - 1)
    }

    /// 是否已对齐
    pub fn is_aligned(&self, value: u64) -> bool {
        value & (self.alignment - 1) == 0
    }

    /// 钳制到最小空间大小之上
    pub fn clamp_min_space(&self, value: u64) -> u64 {
        value.max(self.min_space_size)
    }
}
