//! シングルポーズデコーダ: ジョイントごとのグローバル argmax

use crate::error::DecodeError;
use crate::pose::coords::image_coords;
use crate::pose::keypoint::{Keypoint, Pose};
use crate::tensor::{ensure_channels, ensure_shape, sanitize_score, TensorView};
use crate::tracker::{SmoothingParams, TrackState};

/// 被写体が1人だけのフレームをデコードする
///
/// Each joint channel takes its global heatmap maximum; no threshold, no
/// graph traversal, no NMS. `permutation` remaps a model's channel order to
/// the canonical joint ids (OpenPose). Smoothing runs against slot 0 of the
/// track state with no distance guard — that guard exists only in the
/// multi-pose path.
///
/// The returned pose always has every joint populated.
pub fn decode_single(
    heatmaps: &impl TensorView,
    offsets: &impl TensorView,
    stride: i32,
    permutation: Option<&[usize]>,
    smoothing: SmoothingParams,
    track: &mut TrackState,
) -> Result<Pose, DecodeError> {
    ensure_shape(heatmaps, "heatmaps", stride)?;
    ensure_shape(offsets, "offsets", stride)?;

    let num_joints = heatmaps.channels();
    ensure_channels(offsets, "offsets", 2 * num_joints)?;
    if track.num_joints() != num_joints {
        return Err(DecodeError::ConfigurationMismatch {
            what: "track state",
            expected: num_joints,
            actual: track.num_joints(),
        });
    }
    if let Some(p) = permutation {
        if p.len() != num_joints {
            return Err(DecodeError::ConfigurationMismatch {
                what: "joint permutation",
                expected: num_joints,
                actual: p.len(),
            });
        }
    }

    let (height, width, _) = heatmaps.shape();
    let mut keypoints: Vec<Keypoint> = (0..num_joints).map(Keypoint::sentinel).collect();

    for channel in 0..num_joints {
        // グローバル最大値 (厳密な > なので同点は走査順の先勝ち)
        let mut best_score = 0.0;
        let (mut best_x, mut best_y) = (0, 0);
        for y in 0..height {
            for x in 0..width {
                let score = sanitize_score(heatmaps.at(y, x, channel));
                if score > best_score {
                    best_score = score;
                    best_x = x;
                    best_y = y;
                }
            }
        }

        // オフセットはモデルのチャンネル順、出力スロットは正規ジョイントID
        let joint = permutation.map_or(channel, |p| p[channel]);
        let (raw_x, raw_y) = image_coords(offsets, best_x, best_y, channel, stride);

        let filter = &mut track.slot_mut(0)[joint];
        let (x, y) = filter.advance(raw_x, raw_y, smoothing, smoothing.enabled);
        keypoints[joint] = Keypoint::new(best_score, x, y, joint);
    }

    Ok(Pose::new(keypoints))
}
