//! # PINN スライス比較プロッタ
//!
//! 合成した点群に対して検証用プロッタを実行し、比較図を保存するサンプルです。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --release -- render --scenario three-fin
//! cargo run --release -- render --scenario lid-driven-cavity --out plots
//! cargo run --release -- dump-config --scenario lid-driven-cavity > cavity.json
//! cargo run --release -- render --config cavity.json
//! ```

use clap::Parser;
use pinn_slice::SliceConfig;
use pinn_slice::cli::{Cli, Commands};
use pinn_slice::demo;
use tracing_subscriber::EnvFilter;

/// プログラムのエントリーポイント。
///
/// コマンドライン引数を解析し、`render`または`dump-config`の処理に振り分けます。
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scenario,
            config,
            points,
            seed,
            noise,
            out,
        } => {
            let config = match config {
                Some(path) => SliceConfig::from_json_file(path)?,
                None => scenario.config(),
            };
            demo::run(config, points, noise, seed, &out)?;
        }
        Commands::DumpConfig { scenario } => {
            println!("{}", scenario.config().to_json()?);
        }
    }

    Ok(())
}
