//! ヒートマップ格子と入力画像座標の変換

use crate::tensor::TensorView;

/// セル(x, y)のジョイント用オフセットベクトル (x, y) を読み取る
///
/// The y component lives in channel `joint`, the x component in channel
/// `joint + num_joints`. This reversed pairing is the model's output layout;
/// it must not be swapped.
pub(crate) fn offset_vector(
    offsets: &impl TensorView,
    y: usize,
    x: usize,
    joint: usize,
) -> (f32, f32) {
    let num_joints = offsets.channels() / 2;
    (offsets.at(y, x, joint + num_joints), offsets.at(y, x, joint))
}

/// セル(x, y)のエッジ用変位ベクトル (x, y) を読み取る
///
/// Same channel pairing as [`offset_vector`], with `num_edges` halves.
pub(crate) fn displacement_vector(
    displacements: &impl TensorView,
    y: usize,
    x: usize,
    edge: usize,
) -> (f32, f32) {
    let num_edges = displacements.channels() / 2;
    (
        displacements.at(y, x, num_edges + edge),
        displacements.at(y, x, edge),
    )
}

/// ヒートマップセルを入力画像座標へ変換する
///
/// `cell * stride + offset`. Pure; used by every decoding path.
pub fn image_coords(
    offsets: &impl TensorView,
    cell_x: usize,
    cell_y: usize,
    joint: usize,
    stride: i32,
) -> (f32, f32) {
    let (offset_x, offset_y) = offset_vector(offsets, cell_y, cell_x, joint);
    (
        cell_x as f32 * stride as f32 + offset_x,
        cell_y as f32 * stride as f32 + offset_y,
    )
}

/// 画像座標に最も近いヒートマップセル (丸め + 範囲内クランプ)
pub(crate) fn nearest_cell(
    x: f32,
    y: f32,
    stride: i32,
    height: usize,
    width: usize,
) -> (usize, usize) {
    let cell_x = (x / stride as f32).round().clamp(0.0, (width - 1) as f32) as usize;
    let cell_y = (y / stride as f32).round().clamp(0.0, (height - 1) as f32) as usize;
    (cell_x, cell_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_offset_channel_pairing() {
        // 2ジョイント: チャンネル0,1がy成分、2,3がx成分
        let mut offsets = Array4::<f32>::zeros((1, 4, 4, 4));
        offsets[[0, 2, 3, 1]] = -1.5; // joint 1, y
        offsets[[0, 2, 3, 3]] = 2.5; // joint 1, x

        let (ox, oy) = offset_vector(&offsets, 2, 3, 1);
        assert_eq!(ox, 2.5);
        assert_eq!(oy, -1.5);
    }

    #[test]
    fn test_displacement_channel_pairing() {
        // 1エッジ: チャンネル0がy成分、1がx成分
        let mut displacements = Array4::<f32>::zeros((1, 4, 4, 2));
        displacements[[0, 1, 1, 0]] = 4.0; // edge 0, y
        displacements[[0, 1, 1, 1]] = -3.0; // edge 0, x

        let (dx, dy) = displacement_vector(&displacements, 1, 1, 0);
        assert_eq!(dx, -3.0);
        assert_eq!(dy, 4.0);
    }

    #[test]
    fn test_image_coords_scales_and_offsets() {
        let mut offsets = Array4::<f32>::zeros((1, 8, 8, 2));
        offsets[[0, 7, 5, 0]] = 0.25; // y
        offsets[[0, 7, 5, 1]] = -0.5; // x

        let (x, y) = image_coords(&offsets, 5, 7, 0, 16);
        assert_eq!(x, 5.0 * 16.0 - 0.5);
        assert_eq!(y, 7.0 * 16.0 + 0.25);
    }

    #[test]
    fn test_nearest_cell_rounds() {
        assert_eq!(nearest_cell(40.0, 56.0, 16, 8, 8), (3, 4));
        assert_eq!(nearest_cell(39.9, 55.9, 16, 8, 8), (2, 3));
    }

    #[test]
    fn test_nearest_cell_clamps_to_bounds() {
        assert_eq!(nearest_cell(-30.0, -1.0, 16, 8, 8), (0, 0));
        assert_eq!(nearest_cell(500.0, 500.0, 16, 8, 8), (7, 7));
    }
}
