use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dashcanvas::config::CanvasSize;
use dashcanvas::format::SeriesArea;
use dashcanvas::script::Script;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a dashboard input script and print the resulting canvas", long_about = None)]
struct Cli {
    /// JSON script of host inputs
    #[arg(value_name = "SCRIPT")]
    script: Utf8PathBuf,

    /// Canvas size override, e.g. 1280x720
    #[arg(long, value_name = "WxH")]
    canvas: Option<CanvasSize>,

    /// Print the format panel as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DASHCANVAS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let text = std::fs::read_to_string(&cli.script).with_context(|| format!("Open {}", cli.script))?;
    let script = Script::from_json(&text).with_context(|| format!("Failed to parse {}", cli.script))?;
    let (dash, _) = script
        .replay(cli.canvas)
        .with_context(|| format!("Failed to replay {}", cli.script))?;

    if cli.json {
        let json = serde_json::to_string_pretty(dash.format())?;
        println!("{}", json);
        return Ok(());
    }

    let cfg = dash.registry().config();
    println!("canvas {}x{}, {} panel(s)", cfg.width, cfg.height, dash.registry().len());
    for id in dash.registry().paint_order() {
        let Some(p) = dash.registry().get(id) else { continue };
        let r = p.rect();
        let mark = if dash.selected() == Some(id) { "*" } else { " " };
        println!(
            "{} {:<6} z={:<4} [{}, {}, {}x{}] {} \"{}\"",
            mark,
            id.to_string(),
            p.z_index(),
            r.x,
            r.y,
            r.w,
            r.h,
            p.kind(),
            p.title
        );
    }

    let view = dash.format();
    println!("format: {}", view.status);
    if view.enabled {
        println!("  title: {}", view.title);
        println!("  box:   x={} y={} w={} h={}", view.x, view.y, view.w, view.h);
    }
    match &view.series {
        SeriesArea::Empty(msg) => println!("  {}", msg),
        SeriesArea::Rows(rows) => {
            for row in rows {
                println!("  {:<10} {} {}", row.key, row.color, row.label);
            }
        }
    }
    Ok(())
}
