//! ジョイントごと・軸ごとの再帰平滑化フィルタ

/// 平滑化パラメータ
///
/// Q: process noise, R: measurement noise. When disabled the raw measurement
/// is emitted, but gain and covariance still advance so the state stays
/// valid if smoothing is toggled on later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub enabled: bool,
    pub q: f32,
    pub r: f32,
}

impl SmoothingParams {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            q: 0.015,
            r: 0.015,
        }
    }
}

/// 1軸分のフィルタ状態
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    /// 前フレームの有効出力 (平滑化後の位置)
    pub estimate: f32,
    /// 誤差コバリアンス
    pub error_cov: f32,
}

impl AxisState {
    /// 1ステップ更新して出力を返す
    ///
    /// The stored estimate becomes the emitted output, not the raw
    /// measurement, so smoothing compounds across frames. `apply = false`
    /// emits the measurement while still advancing gain and covariance.
    pub fn advance(&mut self, measurement: f32, q: f32, r: f32, apply: bool) -> f32 {
        let gain = (self.error_cov + q) / (self.error_cov + q + r);
        let new_cov = r * (self.error_cov + q) / (q + self.error_cov + r);
        let smoothed = self.estimate + (measurement - self.estimate) * gain;

        let output = if apply { smoothed } else { measurement };
        self.estimate = output;
        self.error_cov = new_cov;
        output
    }
}

/// ジョイント1点分の2軸フィルタ状態
///
/// Both axes share the same Q and R and are filtered independently.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointTrack {
    pub x: AxisState,
    pub y: AxisState,
}

impl JointTrack {
    /// 前フレームの有効推定位置
    pub fn prior(&self) -> (f32, f32) {
        (self.x.estimate, self.y.estimate)
    }

    /// 両軸を1ステップ更新して出力位置を返す
    pub fn advance(
        &mut self,
        measurement_x: f32,
        measurement_y: f32,
        params: SmoothingParams,
        apply: bool,
    ) -> (f32, f32) {
        (
            self.x.advance(measurement_x, params.q, params.r, apply),
            self.y.advance(measurement_y, params.q, params.r, apply),
        )
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
