use crate::config::{SliceConfig, SlicePredicate};
use crate::plotter::{FieldMap, SliceValidatorPlotter, ValidatorPlotter};
use burn::backend::NdArray;
use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

type MyBackend = NdArray<f32>;

/// 検証用に合成した3次元点群。
#[derive(Debug, Clone)]
pub struct SyntheticCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub u_true: Vec<f32>,
    pub u_pred: Vec<f32>,
}

/// 解析的な真値: `u = sin(πx)·cos(πz) + 1`
pub fn analytic_u(x: f64, z: f64) -> f64 {
    (PI * x).sin() * (PI * z).cos() + 1.0
}

/// スライス条件に一致する `y` の代表値
fn slice_plane(predicate: &SlicePredicate) -> f64 {
    match *predicate {
        SlicePredicate::Band { lower, upper } => 0.5 * (lower + upper),
        SlicePredicate::Exact { value } => value,
        SlicePredicate::ChainedLegacy { lower, .. } => lower - 0.01,
    }
}

impl SyntheticCloud {
    /// `n` 点の点群を作ります。
    ///
    /// `y` はスライス面を含む5つの層から選ぶため、どの条件でも点が選ばれます。
    /// 予測値は真値に平均0・標準偏差 `noise` の正規ノイズを加えたものです。
    pub fn generate(n: usize, predicate: &SlicePredicate, noise: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let plane = slice_plane(predicate);
        let layers = [plane - 0.02, plane - 0.01, plane, plane + 0.01, plane + 0.02];

        let mut cloud = Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
            u_true: Vec::with_capacity(n),
            u_pred: Vec::with_capacity(n),
        };
        for _ in 0..n {
            let x: f64 = rng.random_range(-0.5..0.5);
            let z: f64 = rng.random_range(-0.5..0.5);
            let y = layers[rng.random_range(0..layers.len())];
            let u = analytic_u(x, z);
            let gauss: f64 = rng.sample(StandardNormal);
            cloud.x.push(x as f32);
            cloud.y.push(y as f32);
            cloud.z.push(z as f32);
            cloud.u_true.push(u as f32);
            cloud.u_pred.push((u + noise * gauss) as f32);
        }
        cloud
    }

    /// フレームワークが渡す形式 `(invar, true_outvar, pred_outvar)` に変換します。
    pub fn to_field_maps<B: Backend>(
        &self,
        field: &str,
        device: &B::Device,
    ) -> (FieldMap<B>, FieldMap<B>, FieldMap<B>) {
        let column = |values: &[f32]| {
            Tensor::<B, 2>::from_data(TensorData::new(values.to_vec(), [values.len(), 1]), device)
        };
        let invar = FieldMap::from([
            ("x".to_string(), column(&self.x)),
            ("y".to_string(), column(&self.y)),
            ("z".to_string(), column(&self.z)),
        ]);
        let true_outvar = FieldMap::from([(field.to_string(), column(&self.u_true))]);
        let pred_outvar = FieldMap::from([(field.to_string(), column(&self.u_pred))]);
        (invar, true_outvar, pred_outvar)
    }
}

/// `render` サブコマンドを実行します。
pub fn run(
    config: SliceConfig,
    points: usize,
    noise: f64,
    seed: u64,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let device = Default::default();
    info!(
        title = %config.title,
        points,
        seed,
        "合成点群で検証プロットを作成します - バックエンド: NdArray (CPU)"
    );
    let start = Instant::now();

    let cloud = SyntheticCloud::generate(points, &config.predicate, noise, seed);
    let (invar, true_outvar, pred_outvar) = cloud.to_field_maps::<MyBackend>(&config.field, &device);

    let plotter = SliceValidatorPlotter::new(config);
    let figures = plotter.plot(&invar, &true_outvar, &pred_outvar)?;

    fs::create_dir_all(out_dir)?;
    for (figure, name) in &figures {
        let path = out_dir.join(format!("{name}.png"));
        figure.save_png(&path)?;
        info!("=> 図を '{}' に保存しました。", path.display());
    }
    info!("=> 処理時間: {:.2?}", start.elapsed());

    Ok(())
}
