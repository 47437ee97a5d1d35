//! # Desktop Player Example
//!
//! Plays a local file through the software engine for a few seconds, then
//! decodes it to raw PCM next to the input.
//!
//! Run with: `cargo run --example desktop_player --package core-service -- <file>`

use bridge_traits::{LogLevel, MediaSource};
use core_async::time::{sleep, Duration};
use core_playback::ProgressEvent;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::path::PathBuf;

#[core_async::main]
async fn main() -> core_service::Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let Some(input) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: desktop_player <media file>");
        return Ok(());
    };

    let (player, mut progress) = core_service::bootstrap_desktop()?;
    player.set_source(MediaSource::local(&input));
    player.toggle()?;

    let ticker = core_async::spawn(async move {
        while let Some(event) = progress.recv().await {
            if let ProgressEvent::Tick(fraction) = event {
                println!("{:>3}%", (fraction * 100.0).floor());
            }
        }
    });

    sleep(Duration::from_secs(2)).await;
    player.cycle_speed()?;
    sleep(Duration::from_secs(2)).await;
    player.stop()?;
    ticker.abort();

    let output = input.with_extension("pcm");
    let report = player.decode(&input, &output)?.await?;
    println!(
        "decoded {} -> {} in {:?}",
        report.input.display(),
        report.output.display(),
        report.elapsed
    );

    player.shutdown().await
}
