//! ヒートマップからのキーポイント候補抽出 (マルチポーズ用)

use crate::tensor::{sanitize_score, TensorView};

/// 局所最大判定の窓半径
pub const LOCAL_MAXIMUM_RADIUS: usize = 1;

/// ヒートマップ格子座標のままのキーポイント候補
///
/// Kept distinct from [`Keypoint`](crate::pose::Keypoint): a candidate has
/// not been mapped to image space yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub score: f32,
    pub cell_x: usize,
    pub cell_y: usize,
    pub joint: usize,
}

/// 閾値以上かつ局所最大のセルを列挙する
///
/// Iteration is (channel, y, x) ascending, so the downstream stable sort is
/// reproducible under equal scores.
pub fn extract_candidates(
    heatmaps: &impl TensorView,
    score_threshold: f32,
    local_radius: usize,
) -> Vec<Candidate> {
    let (height, width, channels) = heatmaps.shape();
    let mut candidates = Vec::new();

    for joint in 0..channels {
        for y in 0..height {
            for x in 0..width {
                let score = sanitize_score(heatmaps.at(y, x, joint));
                if score < score_threshold {
                    continue;
                }
                if is_local_maximum(heatmaps, joint, score, y, x, local_radius) {
                    candidates.push(Candidate {
                        score,
                        cell_x: x,
                        cell_y: y,
                        joint,
                    });
                }
            }
        }
    }

    candidates
}

/// 同チャンネルの窓内に厳密により大きいスコアがないか
///
/// Equal scores do not disqualify; the window is clamped to the tensor.
fn is_local_maximum(
    heatmaps: &impl TensorView,
    joint: usize,
    score: f32,
    cell_y: usize,
    cell_x: usize,
    radius: usize,
) -> bool {
    let (height, width, _) = heatmaps.shape();
    let y_start = cell_y.saturating_sub(radius);
    let y_end = (cell_y + radius + 1).min(height);
    let x_start = cell_x.saturating_sub(radius);
    let x_end = (cell_x + radius + 1).min(width);

    for y in y_start..y_end {
        for x in x_start..x_end {
            if sanitize_score(heatmaps.at(y, x, joint)) > score {
                return false;
            }
        }
    }
    true
}
