//! 変位フィールドに沿った骨格木の走査

use crate::graph::PoseGraph;
use crate::pose::coords::{displacement_vector, image_coords, nearest_cell, offset_vector};
use crate::pose::extract::Candidate;
use crate::pose::keypoint::{Keypoint, Pose};
use crate::tensor::{sanitize_score, TensorView};

/// ルート候補から骨格木を辿って全ジョイントを解決する
///
/// Backward pass resolves parents from resolved children (edges in reverse
/// order), then the forward pass resolves children from parents. A joint is
/// resolved only when its traversed heatmap score is positive; everything
/// the walk cannot reach stays sentinel.
pub fn decode_pose(
    root: &Candidate,
    heatmaps: &impl TensorView,
    offsets: &impl TensorView,
    stride: i32,
    displacements_fwd: &impl TensorView,
    displacements_bwd: &impl TensorView,
    graph: &PoseGraph,
) -> Pose {
    let num_joints = heatmaps.channels();
    let mut resolved: Vec<Option<Keypoint>> = vec![None; num_joints];

    if root.score > 0.0 {
        let (root_x, root_y) = image_coords(offsets, root.cell_x, root.cell_y, root.joint, stride);
        resolved[root.joint] = Some(Keypoint::new(root.score, root_x, root_y, root.joint));
    }

    // 後退パス: 子が解決済みなら親を後退変位で解決
    for edge in (0..graph.num_edges()).rev() {
        let (parent, child) = graph.edge(edge);
        if resolved[parent].is_none() {
            if let Some(source) = resolved[child] {
                let target = traverse_to_target(
                    edge,
                    &source,
                    parent,
                    heatmaps,
                    offsets,
                    stride,
                    displacements_bwd,
                );
                if target.score > 0.0 {
                    resolved[parent] = Some(target);
                }
            }
        }
    }

    // 前進パス: 親が解決済みなら子を前進変位で解決
    for edge in 0..graph.num_edges() {
        let (parent, child) = graph.edge(edge);
        if resolved[child].is_none() {
            if let Some(source) = resolved[parent] {
                let target = traverse_to_target(
                    edge,
                    &source,
                    child,
                    heatmaps,
                    offsets,
                    stride,
                    displacements_fwd,
                );
                if target.score > 0.0 {
                    resolved[child] = Some(target);
                }
            }
        }
    }

    Pose::new(
        resolved
            .into_iter()
            .enumerate()
            .map(|(joint, kp)| kp.unwrap_or_else(|| Keypoint::sentinel(joint)))
            .collect(),
    )
}

/// 1エッジ分の走査: 変位を加えた位置のセルで対象ジョイントを読む
fn traverse_to_target(
    edge: usize,
    source: &Keypoint,
    target_joint: usize,
    heatmaps: &impl TensorView,
    offsets: &impl TensorView,
    stride: i32,
    displacements: &impl TensorView,
) -> Keypoint {
    let (height, width, _) = heatmaps.shape();

    let (source_x, source_y) = nearest_cell(source.x, source.y, stride, height, width);
    let (disp_x, disp_y) = displacement_vector(displacements, source_y, source_x, edge);
    let displaced_x = source.x + disp_x;
    let displaced_y = source.y + disp_y;

    let (cell_x, cell_y) = nearest_cell(displaced_x, displaced_y, stride, height, width);
    let (offset_x, offset_y) = offset_vector(offsets, cell_y, cell_x, target_joint);
    let score = sanitize_score(heatmaps.at(cell_y, cell_x, target_joint));

    Keypoint::new(
        score,
        cell_x as f32 * stride as f32 + offset_x,
        cell_y as f32 * stride as f32 + offset_y,
        target_joint,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    const STRIDE: i32 = 16;

    // 3ジョイント直鎖: 0 -> 1 -> 2
    fn chain_graph() -> PoseGraph {
        PoseGraph::new(vec![(0, 1), (1, 2)])
    }

    struct Fixture {
        heatmaps: Array4<f32>,
        offsets: Array4<f32>,
        fwd: Array4<f32>,
        bwd: Array4<f32>,
    }

    fn fixture() -> Fixture {
        Fixture {
            heatmaps: Array4::zeros((1, 8, 8, 3)),
            offsets: Array4::zeros((1, 8, 8, 6)),
            fwd: Array4::zeros((1, 8, 8, 4)),
            bwd: Array4::zeros((1, 8, 8, 4)),
        }
    }

    fn set_displacement(t: &mut Array4<f32>, y: usize, x: usize, edge: usize, dx: f32, dy: f32) {
        let num_edges = t.dim().3 / 2;
        t[[0, y, x, edge]] = dy;
        t[[0, y, x, num_edges + edge]] = dx;
    }

    #[test]
    fn test_forward_traversal_resolves_children() {
        let mut f = fixture();
        // ジョイント0がセル(2,2)、1が(4,2)、2が(4,5)にある
        f.heatmaps[[0, 2, 2, 0]] = 0.9;
        f.heatmaps[[0, 2, 4, 1]] = 0.8;
        f.heatmaps[[0, 5, 4, 2]] = 0.7;
        // エッジ0: (32,32) から +32px 右へ、エッジ1: (64,32) から +48px 下へ
        set_displacement(&mut f.fwd, 2, 2, 0, 32.0, 0.0);
        set_displacement(&mut f.fwd, 2, 4, 1, 0.0, 48.0);

        let root = Candidate {
            score: 0.9,
            cell_x: 2,
            cell_y: 2,
            joint: 0,
        };
        let pose = decode_pose(
            &root,
            &f.heatmaps,
            &f.offsets,
            STRIDE,
            &f.fwd,
            &f.bwd,
            &chain_graph(),
        );

        assert_eq!(pose.keypoints[0].score, 0.9);
        assert_eq!((pose.keypoints[0].x, pose.keypoints[0].y), (32.0, 32.0));
        assert_eq!(pose.keypoints[1].score, 0.8);
        assert_eq!((pose.keypoints[1].x, pose.keypoints[1].y), (64.0, 32.0));
        assert_eq!(pose.keypoints[2].score, 0.7);
        assert_eq!((pose.keypoints[2].x, pose.keypoints[2].y), (64.0, 80.0));
    }

    #[test]
    fn test_backward_traversal_resolves_parents() {
        let mut f = fixture();
        // ルートは末端ジョイント2、後退変位で1、0へ遡る
        f.heatmaps[[0, 5, 4, 2]] = 0.9;
        f.heatmaps[[0, 2, 4, 1]] = 0.8;
        f.heatmaps[[0, 2, 2, 0]] = 0.7;
        set_displacement(&mut f.bwd, 5, 4, 1, 0.0, -48.0);
        set_displacement(&mut f.bwd, 2, 4, 0, -32.0, 0.0);

        let root = Candidate {
            score: 0.9,
            cell_x: 4,
            cell_y: 5,
            joint: 2,
        };
        let pose = decode_pose(
            &root,
            &f.heatmaps,
            &f.offsets,
            STRIDE,
            &f.fwd,
            &f.bwd,
            &chain_graph(),
        );

        assert_eq!(pose.keypoints[2].score, 0.9);
        assert_eq!(pose.keypoints[1].score, 0.8);
        assert_eq!((pose.keypoints[1].x, pose.keypoints[1].y), (64.0, 32.0));
        assert_eq!(pose.keypoints[0].score, 0.7);
        assert_eq!((pose.keypoints[0].x, pose.keypoints[0].y), (32.0, 32.0));
    }

    #[test]
    fn test_offset_refines_traversed_position() {
        let mut f = fixture();
        f.heatmaps[[0, 2, 2, 0]] = 0.9;
        f.heatmaps[[0, 2, 4, 1]] = 0.8;
        set_displacement(&mut f.fwd, 2, 2, 0, 32.0, 0.0);
        // ジョイント1のオフセット: y=+2.0 (ch1), x=-3.0 (ch4)
        f.offsets[[0, 2, 4, 1]] = 2.0;
        f.offsets[[0, 2, 4, 4]] = -3.0;

        let root = Candidate {
            score: 0.9,
            cell_x: 2,
            cell_y: 2,
            joint: 0,
        };
        let pose = decode_pose(
            &root,
            &f.heatmaps,
            &f.offsets,
            STRIDE,
            &f.fwd,
            &f.bwd,
            &chain_graph(),
        );
        assert_eq!((pose.keypoints[1].x, pose.keypoints[1].y), (61.0, 34.0));
    }

    #[test]
    fn test_zero_score_root_leaves_all_sentinel() {
        let f = fixture();
        let root = Candidate {
            score: 0.0,
            cell_x: 2,
            cell_y: 2,
            joint: 0,
        };
        let pose = decode_pose(
            &root,
            &f.heatmaps,
            &f.offsets,
            STRIDE,
            &f.fwd,
            &f.bwd,
            &chain_graph(),
        );
        assert!(pose.keypoints.iter().all(|k| k.is_sentinel()));
    }

    #[test]
    fn test_zero_score_target_stays_sentinel() {
        let mut f = fixture();
        // ジョイント0だけ存在し、変位先のヒートマップは0
        f.heatmaps[[0, 2, 2, 0]] = 0.9;
        set_displacement(&mut f.fwd, 2, 2, 0, 32.0, 0.0);

        let root = Candidate {
            score: 0.9,
            cell_x: 2,
            cell_y: 2,
            joint: 0,
        };
        let pose = decode_pose(
            &root,
            &f.heatmaps,
            &f.offsets,
            STRIDE,
            &f.fwd,
            &f.bwd,
            &chain_graph(),
        );
        assert!(!pose.keypoints[0].is_sentinel());
        assert!(pose.keypoints[1].is_sentinel());
        assert!(pose.keypoints[2].is_sentinel());
    }

    #[test]
    fn test_displaced_point_clamped_to_grid() {
        let mut f = fixture();
        f.heatmaps[[0, 2, 2, 0]] = 0.9;
        f.heatmaps[[0, 2, 7, 1]] = 0.6;
        // グリッド外へ飛ぶ変位は端のセルにクランプされる
        set_displacement(&mut f.fwd, 2, 2, 0, 500.0, 0.0);

        let root = Candidate {
            score: 0.9,
            cell_x: 2,
            cell_y: 2,
            joint: 0,
        };
        let pose = decode_pose(
            &root,
            &f.heatmaps,
            &f.offsets,
            STRIDE,
            &f.fwd,
            &f.bwd,
            &chain_graph(),
        );
        assert_eq!(pose.keypoints[1].score, 0.6);
        assert_eq!(pose.keypoints[1].x, 112.0);
    }
}
