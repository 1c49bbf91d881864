//! 指数加权平均
//!
//! 提供两种在线平均：普通加权平均，以及带偏差补偿的平滑平均。
//! 后者用平均值加上若干倍的平均绝对偏差作为未来取值的上估计。

// ============================================================================
// 加权平均
// ============================================================================

/// 指数加权移动平均
///
/// 权重为 `W` 时，每个新样本以 `1/W` 的比例混入。前 `W` 个样本处于
/// 预热阶段，使用逐渐增大的有效权重，保证序列不依赖于构造与首个样本
/// 之间的先后关系。
#[derive(Debug, Clone)]
pub struct AdaptiveWeightedAverage {
    /// 权重（正整数）
    weight: u32,
    /// 已接收的样本数
    seen: u64,
    /// 当前平均值
    average: f64,
}

impl AdaptiveWeightedAverage {
    /// 创建新的加权平均
    pub fn new(weight: u32) -> Self {
        debug_assert!(weight > 0);
        Self {
            weight,
            seen: 0,
            average: 0.0,
        }
    }

    /// 混入一个新样本
    pub fn sample(&mut self, value: f64) {
        // 预热阶段有效权重为 seen + 1
        let effective = u64::from(self.weight).min(self.seen + 1);
        self.average = ((effective - 1) as f64 * self.average + value) / effective as f64;
        self.seen += 1;
    }

    /// 当前平均值
    pub fn average(&self) -> f64 {
        self.average
    }

    /// 已接收的样本数
    pub fn count(&self) -> u64 {
        self.seen
    }
}

// ============================================================================
// 带偏差补偿的平滑平均
// ============================================================================

/// 带偏差补偿的指数加权平均
///
/// 额外跟踪样本与均值的绝对偏差的加权平均，`padded_average` 返回
/// `均值 + padding × 偏差均值`，作为未来取值的上估计。
#[derive(Debug, Clone)]
pub struct AdaptivePaddedAverage {
    /// 均值
    mean: AdaptiveWeightedAverage,
    /// 绝对偏差的均值
    deviation: AdaptiveWeightedAverage,
    /// 偏差补偿倍数
    padding: u32,
    /// 样本低于均值时偏差记为 0
    no_negative_deviation: bool,
}

impl AdaptivePaddedAverage {
    /// 创建新的平滑平均
    pub fn new(weight: u32, padding: u32) -> Self {
        Self::with_no_negative_deviation(weight, padding, false)
    }

    /// 创建新的平滑平均，可选择忽略负向偏差
    pub fn with_no_negative_deviation(weight: u32, padding: u32, no_negative: bool) -> Self {
        Self {
            mean: AdaptiveWeightedAverage::new(weight),
            deviation: AdaptiveWeightedAverage::new(weight),
            padding,
            no_negative_deviation: no_negative,
        }
    }

    /// 混入一个新样本：先更新均值，再记录相对新均值的偏差
    pub fn sample(&mut self, value: f64) {
        self.mean.sample(value);
        let deviation = value - self.mean.average();
        let deviation = if self.no_negative_deviation && deviation < 0.0 {
            0.0
        } else {
            deviation.abs()
        };
        self.deviation.sample(deviation);
    }

    /// 当前均值
    pub fn average(&self) -> f64 {
        self.mean.average()
    }

    /// 均值加偏差补偿后的上估计
    pub fn padded_average(&self) -> f64 {
        self.mean.average() + f64::from(self.padding) * self.deviation.average()
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_average() {
        let mut avg = AdaptiveWeightedAverage::new(25);
        avg.sample(3.5);
        assert_eq!(avg.average(), 3.5);
        assert_eq!(avg.count(), 1);
    }

    #[test]
    fn test_warm_up_weights() {
        // 预热阶段等价于普通算术平均
        let mut avg = AdaptiveWeightedAverage::new(25);
        avg.sample(1.0);
        avg.sample(2.0);
        avg.sample(3.0);
        assert!((avg.average() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_steady_state_weight() {
        let mut avg = AdaptiveWeightedAverage::new(2);
        avg.sample(0.0);
        avg.sample(0.0);
        // 预热结束后按 ((W-1)*a + x)/W 更新
        avg.sample(4.0);
        assert_eq!(avg.average(), 2.0);
        avg.sample(4.0);
        assert_eq!(avg.average(), 3.0);
    }

    #[test]
    fn test_constant_input_converges_to_constant() {
        let mut avg = AdaptiveWeightedAverage::new(10);
        for _ in 0..1000 {
            avg.sample(7.25);
        }
        assert!((avg.average() - 7.25).abs() < 1e-12);
    }

    #[test]
    fn test_padded_average_constant_input() {
        // 恒定输入下偏差为 0，padded 与均值一致
        let mut avg = AdaptivePaddedAverage::new(10, 3);
        for _ in 0..100 {
            avg.sample(42.0);
        }
        assert!((avg.average() - 42.0).abs() < 1e-9);
        assert!((avg.padded_average() - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_padded_average_exceeds_mean_on_noise() {
        let mut avg = AdaptivePaddedAverage::new(10, 3);
        for i in 0..100 {
            avg.sample(if i % 2 == 0 { 10.0 } else { 20.0 });
        }
        assert!(avg.padded_average() > avg.average());
    }

    #[test]
    fn test_no_negative_deviation_clamp() {
        let mut plain = AdaptivePaddedAverage::new(10, 3);
        let mut clamped = AdaptivePaddedAverage::with_no_negative_deviation(10, 3, true);
        // 下降的序列只产生负向偏差
        for i in 0..10 {
            let v = 100.0 - f64::from(i) * 10.0;
            plain.sample(v);
            clamped.sample(v);
        }
        assert!(plain.padded_average() > plain.average());
        // 钳制后偏差均值为 0
        assert!((clamped.padded_average() - clamped.average()).abs() < 1e-12);
    }
}
