use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::pose::MultiPoseParams;
use crate::tracker::SmoothingParams;

/// OpenPose出力チャンネル → 正規ジョイントIDの対応表 (19ジョイント)
pub const OPENPOSE_JOINT_ORDER: [usize; 19] = [
    0, 17, 5, 7, 9, 6, 8, 10, 11, 13, 15, 12, 14, 16, 1, 2, 3, 4, 18,
];

/// 推定モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMode {
    Single,
    Multi,
}

/// モデルプロファイル
///
/// Joint reordering is resolved here once at configuration time, never
/// looked up by model name per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ModelProfile {
    #[serde(rename = "mobilenet")]
    MobileNet,
    #[serde(rename = "resnet50")]
    ResNet50,
    #[serde(rename = "deep_mobilenet")]
    DeepMobileNet,
    #[serde(rename = "openpose")]
    OpenPose,
}

impl ModelProfile {
    /// チャンネル→正規ジョイントIDの並び替え表 (恒等ならNone)
    pub fn joint_permutation(&self) -> Option<&'static [usize]> {
        match self {
            Self::OpenPose => Some(&OPENPOSE_JOINT_ORDER),
            _ => None,
        }
    }

    /// マルチポーズ走査に対応するか (OpenPoseはシングル専用)
    pub fn supports_multi(&self) -> bool {
        !matches!(self, Self::OpenPose)
    }
}

/// 入力画像の高さとヒートマップの高さからストライドを計算する
///
/// `floor((input - 1) / (heatmap - 1))`, rounded down to a multiple of 8.
/// Small ratios can yield 0; the decoders reject `stride <= 0` as
/// `InvalidTensorShape`, so the caller must check before decoding.
pub fn compute_stride(input_height: usize, heatmap_height: usize) -> i32 {
    if input_height == 0 || heatmap_height < 2 {
        return 0;
    }
    let stride = (input_height - 1) / (heatmap_height - 1);
    (stride - stride % 8) as i32
}

/// デコーダ設定 (セッション中は固定)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecoderConfig {
    #[serde(default = "default_mode")]
    pub mode: EstimationMode,
    #[serde(default = "default_model")]
    pub model: ModelProfile,
    /// マルチポーズの最大検出数
    #[serde(default = "default_max_poses")]
    pub max_poses: usize,
    /// 候補抽出のスコア閾値
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
    /// NMS半径 (画像ピクセル)
    #[serde(default = "default_nms_radius")]
    pub nms_radius: f32,
    /// 時間平滑化を有効にするか
    #[serde(default)]
    pub smoothing: bool,
    #[serde(default = "default_kalman_q")]
    pub kalman_q: f32,
    #[serde(default = "default_kalman_r")]
    pub kalman_r: f32,
    /// マルチポーズで平滑化を適用する最大フレーム間移動量 (ピクセル)
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,
}

fn default_mode() -> EstimationMode {
    EstimationMode::Single
}
fn default_model() -> ModelProfile {
    ModelProfile::MobileNet
}
fn default_max_poses() -> usize {
    3
}
fn default_score_threshold() -> f32 {
    0.25
}
fn default_nms_radius() -> f32 {
    100.0
}
fn default_kalman_q() -> f32 {
    0.015
}
fn default_kalman_r() -> f32 {
    0.015
}
fn default_distance_threshold() -> f32 {
    50.0
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model: default_model(),
            max_poses: default_max_poses(),
            score_threshold: default_score_threshold(),
            nms_radius: default_nms_radius(),
            smoothing: false,
            kalman_q: default_kalman_q(),
            kalman_r: default_kalman_r(),
            distance_threshold: default_distance_threshold(),
        }
    }
}

impl DecoderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: DecoderConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }

    pub fn smoothing_params(&self) -> SmoothingParams {
        SmoothingParams {
            enabled: self.smoothing,
            q: self.kalman_q,
            r: self.kalman_r,
        }
    }

    pub fn multi_params(&self) -> MultiPoseParams {
        MultiPoseParams {
            max_poses: self.max_poses,
            score_threshold: self.score_threshold,
            nms_radius: self.nms_radius,
            smoothing: self.smoothing_params(),
            distance_threshold: self.distance_threshold,
        }
    }
}
