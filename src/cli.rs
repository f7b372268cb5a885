use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::SliceConfig;

/// clapでコマンドラインの構造を定義します。
#[derive(Parser, Debug)]
#[command(author, version, about = "Slice comparison plots for PINN validation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 実行するサブコマンドを定義します（render または dump-config）。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 合成点群からスライス比較図を作成し、PNGとして保存します
    Render {
        #[arg(long, value_enum, default_value_t = Scenario::ThreeFin)]
        scenario: Scenario,
        /// シナリオの設定の代わりに読み込むJSONファイル
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 4000)]
        points: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// 予測値に加えるノイズの標準偏差
        #[arg(long, default_value_t = 0.05)]
        noise: f64,
        #[arg(long, default_value = "plots")]
        out: PathBuf,
    },
    /// シナリオの設定をJSONで出力します
    DumpConfig {
        #[arg(long, value_enum, default_value_t = Scenario::ThreeFin)]
        scenario: Scenario,
    },
}

/// 組み込みのシナリオ
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// 三枚フィン流れ
    ThreeFin,
    /// キャビティ流れ
    LidDrivenCavity,
}

impl Scenario {
    pub fn config(self) -> SliceConfig {
        match self {
            Scenario::ThreeFin => SliceConfig::three_fin_flow(),
            Scenario::LidDrivenCavity => SliceConfig::lid_driven_cavity(),
        }
    }
}
