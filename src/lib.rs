//! # PINN 検証用スライス比較プロッタ
//!
//! 散在する3次元点で与えられた真値と予測値から `y` 一定の断面を取り出し、
//! 規則格子に線形補間して「真値・予測・差分」の3枚のヒートマップを描きます。
//!
//! 学習フレームワークの検証処理からは [`plotter::ValidatorPlotter`] として呼び出します。

pub mod cli;
pub mod colormap;
pub mod config;
pub mod demo;
pub mod error;
pub mod figure;
pub mod interpolate;
pub mod plotter;
pub mod slice;

pub use config::{Annotation, ColorScale, SliceConfig, SlicePredicate};
pub use error::{PlotError, PlotResult};
pub use figure::{Figure, Panel};
pub use plotter::{FieldMap, SliceValidatorPlotter, ValidatorPlotter};
