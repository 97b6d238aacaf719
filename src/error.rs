use thiserror::Error;

/// デコード失敗: そのフレームのテンソルでは処理を続行できない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// テンソルのチャンネル数が構成と一致しない
    #[error("configuration mismatch for {what}: expected {expected} channels, got {actual}")]
    ConfigurationMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// テンソル次元が0、またはストライドが0以下 (フレーム破棄扱い)
    #[error("invalid shape for {what}: {height}x{width}x{channels}, stride {stride}")]
    InvalidTensorShape {
        what: &'static str,
        height: usize,
        width: usize,
        channels: usize,
        stride: i32,
    },
}
