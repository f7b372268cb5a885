use thiserror::Error;

/// スライス比較プロッタが返すエラー。
///
/// 補間範囲外の格子点は `NaN` として扱い、エラーにはしません。
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("フィールド '{0}' が入力に存在しません")]
    MissingField(String),

    #[error("フィールド '{0}' に列がありません")]
    EmptyColumn(String),

    #[error("フィールド '{field}' の長さが一致しません (期待値: {expected}, 実際: {actual})")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("スライス条件に一致する点がありません")]
    EmptySelection,

    #[error(
        "スライス範囲が退化しています: x=[{xmin}, {xmax}], z=[{zmin}, {zmax}]"
    )]
    DegenerateExtent {
        xmin: f64,
        xmax: f64,
        zmin: f64,
        zmax: f64,
    },

    #[error("格子の解像度は各方向2以上が必要です: {nx}x{nz}")]
    InvalidResolution { nx: usize, nz: usize },

    #[error("テンソルデータの取得に失敗しました: {0}")]
    Tensor(String),

    #[error("描画に失敗しました: {0}")]
    Render(String),

    #[error("設定の読み込みに失敗しました: {0}")]
    Config(String),
}

pub type PlotResult<T> = Result<T, PlotError>;
