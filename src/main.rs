use anyhow::Context;
use clap::Parser;
use rfpdf::{ExportConfig, RenderOrchestrator};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Render an HTML file to a paginated PDF
#[derive(Parser, Debug)]
#[command(name = "rfpdf", version, about)]
struct Cli {
    /// HTML input file, or `-` to read from stdin
    input: PathBuf,

    /// Output filename (defaults to report.pdf)
    #[arg(short, long)]
    output: Option<String>,

    /// Directory the PDF is saved into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Base URL for resolving relative image sources
    #[arg(long)]
    base_url: Option<String>,

    /// Print the render report as JSON
    #[arg(long)]
    json: bool,
}

fn read_input(path: &Path) -> rfpdf::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let html = read_input(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;

    let mut config = ExportConfig {
        output_dir: cli.out_dir,
        ..Default::default()
    };
    config.capture.base_url = cli.base_url;

    let report = RenderOrchestrator::new(config)
        .render_markup(&html, cli.output.as_deref())
        .context("rendering PDF")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}: {} page(s), {} bytes via {:?} renderer",
            report.path.display(),
            report.page_count,
            report.bytes,
            report.strategy
        );
    }
    Ok(())
}
