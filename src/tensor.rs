use ndarray::{Array4, ArrayView4};

use crate::error::DecodeError;

/// 推論エンジン出力への読み取り専用4Dビュー
///
/// Shape is `(height, width, channels)`; the batch dimension is fixed at 0.
/// Any inference runtime can supply this — the decoder has no dependency on
/// a specific execution engine.
pub trait TensorView {
    fn shape(&self) -> (usize, usize, usize);
    fn at(&self, y: usize, x: usize, c: usize) -> f32;

    fn height(&self) -> usize {
        self.shape().0
    }

    fn width(&self) -> usize {
        self.shape().1
    }

    fn channels(&self) -> usize {
        self.shape().2
    }
}

impl TensorView for Array4<f32> {
    fn shape(&self) -> (usize, usize, usize) {
        let (_, h, w, c) = self.dim();
        (h, w, c)
    }

    fn at(&self, y: usize, x: usize, c: usize) -> f32 {
        self[[0, y, x, c]]
    }
}

impl TensorView for ArrayView4<'_, f32> {
    fn shape(&self) -> (usize, usize, usize) {
        let (_, h, w, c) = self.dim();
        (h, w, c)
    }

    fn at(&self, y: usize, x: usize, c: usize) -> f32 {
        self[[0, y, x, c]]
    }
}

/// NaNと負のスコアを0に正規化する
///
/// A sanitized score never passes a threshold and never wins an argmax.
pub(crate) fn sanitize_score(value: f32) -> f32 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// 次元0のテンソルとストライド0以下を拒否する
pub(crate) fn ensure_shape(
    tensor: &impl TensorView,
    what: &'static str,
    stride: i32,
) -> Result<(), DecodeError> {
    let (height, width, channels) = tensor.shape();
    if height == 0 || width == 0 || channels == 0 || stride <= 0 {
        return Err(DecodeError::InvalidTensorShape {
            what,
            height,
            width,
            channels,
            stride,
        });
    }
    Ok(())
}

/// チャンネル数が構成と一致することを確認する
pub(crate) fn ensure_channels(
    tensor: &impl TensorView,
    what: &'static str,
    expected: usize,
) -> Result<(), DecodeError> {
    let actual = tensor.channels();
    if actual != expected {
        return Err(DecodeError::ConfigurationMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
