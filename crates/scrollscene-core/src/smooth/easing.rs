//! Easing functions mapping progress in [0, 1] to eased progress in [0, 1]

use crate::config::EasingType;

impl EasingType {
    /// Eased value for progress `t`, clamped to [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Self::Linear => t,
            Self::Cubic => power_out(t, 3),
            Self::Quintic => power_out(t, 5),
            Self::EaseOut => expo_out(t),
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// 1 - (1 - t)^n
#[inline]
fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// 1 - 2^(-10t), pinned to 1 at the end
#[inline]
fn expo_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - (-10.0 * t).exp2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [EasingType; 5] = [
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
        EasingType::Smoothstep,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in CURVES {
            assert!((easing.apply(0.0) - 0.0).abs() < 0.001, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
        }
        assert_eq!(EasingType::None.apply(0.99), 0.0);
        assert_eq!(EasingType::None.apply(1.0), 1.0);
    }

    #[test]
    fn test_power_curves() {
        assert!((EasingType::Cubic.apply(0.5) - 0.875).abs() < 1e-9);
        assert!((EasingType::Quintic.apply(0.5) - 0.96875).abs() < 1e-9);
        assert_eq!(EasingType::Smoothstep.apply(0.5), 0.5);
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in CURVES {
            let mut prev = 0.0;
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }
}
