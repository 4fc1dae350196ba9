use anyhow::Result;
use clap::{Arg, Command};
use tracing::{info, warn};

use quran_video_maker::config::Config;
use quran_video_maker::pipeline::VideoAssembler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("quran_video_maker=info,warn")
        .init();

    let matches = Command::new("Quran Video Maker")
        .version("0.1.0")
        .about("Assembles word-timed Quran recitation videos")
        .arg(
            Arg::new("surah")
                .short('s')
                .long("surah")
                .value_name("NUM")
                .help("Surah number")
                .required(true),
        )
        .arg(
            Arg::new("from")
                .short('f')
                .long("from")
                .value_name("AYA")
                .help("First verse of the range")
                .default_value("1"),
        )
        .arg(
            Arg::new("to")
                .short('t')
                .long("to")
                .value_name("AYA")
                .help("Last verse of the range (inclusive)")
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let surah: u32 = matches.get_one::<String>("surah").unwrap().parse()?;
    let from: u32 = matches.get_one::<String>("from").unwrap().parse()?;
    let to: u32 = matches.get_one::<String>("to").unwrap().parse()?;
    if matches.get_flag("verbose") {
        info!("Verbose logging enabled");
    }
    if from > to {
        return Err(anyhow::anyhow!("verse range {}..={} is empty", from, to));
    }

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    info!("🚀 Quran Video Maker starting...");
    info!("📖 Surah {}, verses {}..={}", surah, from, to);
    info!("{}", config.summary());

    let assembler = VideoAssembler::new(config)?;

    let start_time = std::time::Instant::now();
    let output = assembler.run(surah, from..=to).await?;
    let duration = start_time.elapsed();

    info!("🎉 Finished in {:.2}s", duration.as_secs_f64());
    info!("✅ Output: {}", output.display());

    Ok(())
}
