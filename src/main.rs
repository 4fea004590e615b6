use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use talava_measure::config::Config;
use talava_measure::report::{load_capture, save_payload, MeasurementPayload};
use talava_measure::run_pipeline;

const CONFIG_PATH: &str = "config.toml";

struct Args {
    capture_path: String,
    height_cm: Option<f32>,
    config_path: String,
    payload_path: Option<String>,
    show_vertices: bool,
}

fn usage() -> &'static str {
    "usage: talava-measure <capture.json> [height_cm] [--config path] [--payload [out.json]] [--vertices]"
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1).peekable();
    let mut capture_path = None;
    let mut height_cm = None;
    let mut config_path = CONFIG_PATH.to_string();
    let mut payload_path = None;
    let mut show_vertices = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = args.next().context("--config にはパスが必要です")?;
            }
            "--payload" => {
                // パス省略時は config の report.output_path
                let path = args.next_if(|next| !next.starts_with("--"));
                payload_path = Some(path.unwrap_or_default());
            }
            "--vertices" => show_vertices = true,
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            _ if capture_path.is_none() => capture_path = Some(arg),
            _ if height_cm.is_none() => {
                let h: f32 = arg
                    .parse()
                    .with_context(|| format!("身長(cm)として解釈できません: {}", arg))?;
                height_cm = Some(h);
            }
            _ => bail!("不明な引数: {}\n{}", arg, usage()),
        }
    }

    let Some(capture_path) = capture_path else {
        bail!("{}", usage());
    };

    Ok(Args {
        capture_path,
        height_cm,
        config_path,
        payload_path,
        show_vertices,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;
    let config = Config::load_or_default(&args.config_path);

    println!("=== Talava Measure ({}) ===", env!("GIT_VERSION"));

    let capture = load_capture(&args.capture_path)?;
    // 引数の身長が撮影データの申告身長より優先
    let height_cm = args.height_cm.unwrap_or(capture.height_cm);

    println!("撮影データ: {}", args.capture_path);
    println!("  正面: {} 関節", capture.front.len());
    println!("  側面: {} 関節", capture.side.len());
    println!("  身長: {:.1} cm", height_cm);
    println!();

    let outcome = match run_pipeline(&capture.front, &capture.side, height_cm, &config) {
        Ok(outcome) => outcome,
        Err(e) => {
            // 計測不能: 結果は空
            eprintln!("採寸できませんでした: {}", e);
            return Ok(());
        }
    };

    println!("頂点数: {}", outcome.vertices.vertex_count());
    if let Some((min, max)) = outcome.vertices.bounds() {
        println!(
            "  範囲: [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
            min[0], min[1], min[2], max[0], max[1], max[2]
        );
    }
    if args.show_vertices {
        for v in outcome.vertices.iter_vertices() {
            println!("  {:>8.4} {:>8.4} {:>8.4}", v[0], v[1], v[2]);
        }
    }
    println!();

    let displayed = outcome.report.displayed();
    println!("採寸結果 (補正比 {:.3}):", outcome.report.ratio);
    for (label, value) in &displayed {
        println!("  {:<24} {:>7.1} cm", label, value);
    }
    if displayed.is_empty() {
        println!("  (計測可能な項目がありません)");
    }

    if let Some(path) = args.payload_path {
        let path = if path.is_empty() {
            config.report.output_path.clone()
        } else {
            path
        };
        let payload = MeasurementPayload::from_report(&outcome.report);
        save_payload(&path, &payload)?;
        println!();
        println!("保存しました: {}", path);
    }

    Ok(())
}
