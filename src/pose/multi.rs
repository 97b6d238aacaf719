//! マルチポーズデコーダ: 貪欲ルート選択 + NMS + 骨格走査

use std::cmp::Ordering;

use crate::error::DecodeError;
use crate::graph::PoseGraph;
use crate::pose::coords::image_coords;
use crate::pose::extract::{extract_candidates, LOCAL_MAXIMUM_RADIUS};
use crate::pose::keypoint::Pose;
use crate::pose::traverse::decode_pose;
use crate::tensor::{ensure_channels, ensure_shape, TensorView};
use crate::tracker::{SmoothingParams, TrackState};

/// マルチポーズデコードのパラメータ (セッション中は固定)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiPoseParams {
    pub max_poses: usize,
    pub score_threshold: f32,
    /// 画像ピクセル単位のNMS半径
    pub nms_radius: f32,
    pub smoothing: SmoothingParams,
    /// 平滑化を適用する前フレームからの最大移動量 (ピクセル)
    pub distance_threshold: f32,
}

/// 最大 max_poses 人分の姿勢をデコードする
///
/// Returned poses are slot-stable: index `i` this frame is the same track
/// slot as index `i` last frame. Slots beyond the accepted count are reset
/// in the track state (tracks are dropped, not carried forward).
pub fn decode_multi(
    heatmaps: &impl TensorView,
    offsets: &impl TensorView,
    displacements_fwd: &impl TensorView,
    displacements_bwd: &impl TensorView,
    stride: i32,
    graph: &PoseGraph,
    params: &MultiPoseParams,
    track: &mut TrackState,
) -> Result<Vec<Pose>, DecodeError> {
    ensure_shape(heatmaps, "heatmaps", stride)?;
    ensure_shape(offsets, "offsets", stride)?;
    ensure_shape(displacements_fwd, "displacements_fwd", stride)?;
    ensure_shape(displacements_bwd, "displacements_bwd", stride)?;

    let num_joints = heatmaps.channels();
    ensure_channels(offsets, "offsets", 2 * num_joints)?;
    ensure_channels(displacements_fwd, "displacements_fwd", 2 * graph.num_edges())?;
    ensure_channels(displacements_bwd, "displacements_bwd", 2 * graph.num_edges())?;
    if track.num_joints() != num_joints {
        return Err(DecodeError::ConfigurationMismatch {
            what: "track state",
            expected: num_joints,
            actual: track.num_joints(),
        });
    }

    let squared_nms_radius = params.nms_radius * params.nms_radius;

    // スコア降順、同点は抽出順 (安定ソート)
    let mut candidates = extract_candidates(heatmaps, params.score_threshold, LOCAL_MAXIMUM_RADIUS);
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let max_poses = params.max_poses.min(track.max_poses());
    let mut accepted: Vec<Pose> = Vec::new();

    for root in &candidates {
        if accepted.len() >= max_poses {
            break;
        }

        let (root_x, root_y) = image_coords(offsets, root.cell_x, root.cell_y, root.joint, stride);

        // 既存ポーズの同一ジョイントに近すぎるルートは棄却 (未解決ジョイントは比較対象外)
        let suppressed = accepted.iter().any(|pose| {
            let kp = &pose.keypoints[root.joint];
            !kp.is_sentinel() && kp.distance_squared_to(root_x, root_y) <= squared_nms_radius
        });
        if suppressed {
            continue;
        }

        accepted.push(decode_pose(
            root,
            heatmaps,
            offsets,
            stride,
            displacements_fwd,
            displacements_bwd,
            graph,
        ));
    }

    // 被写体が消えたスロットのトラックは持ち越さない
    for slot in accepted.len()..track.max_poses() {
        track.reset_slot(slot);
    }

    for (slot, pose) in accepted.iter_mut().enumerate() {
        let filters = track.slot_mut(slot);
        for (joint, kp) in pose.keypoints.iter_mut().enumerate() {
            let filter = &mut filters[joint];
            let (prior_x, _) = filter.prior();

            // トラックが有効 (prior.x != 0) かつ前フレームからの移動が
            // 閾値未満のときだけ平滑化し、それ以外は生値で再出発する。
            // ゲインとコバリアンスはどちらでも前進する。
            let apply = params.smoothing.enabled
                && prior_x != 0.0
                && (prior_x - kp.x).abs() < params.distance_threshold;
            let (x, y) = filter.advance(kp.x, kp.y, params.smoothing, apply);
            kp.x = x;
            kp.y = y;
        }
    }

    Ok(accepted)
}
