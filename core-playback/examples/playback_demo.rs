//! # Playback Control Example
//!
//! Drives the software engine through a short session: start, seek, speed
//! changes and stop, printing progress ticks as they arrive.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_desktop::SoftwareEngine;
use bridge_traits::{MediaEngine, MediaSource};
use core_async::time::{sleep, Duration};
use core_playback::{PlaybackController, PlayerConfig, ProgressEvent, ProgressPoller};
use std::sync::Arc;

#[core_async::main]
async fn main() -> core_playback::Result<()> {
    let engine: Arc<dyn MediaEngine> =
        Arc::new(SoftwareEngine::builder().fixed_duration(20.0).build());
    let config = PlayerConfig::default().with_poll_interval(Duration::from_millis(250));

    let controller = Arc::new(PlaybackController::new(engine, &config));
    let (poller, mut progress) = ProgressPoller::new(controller.clone(), &config)?;

    controller.set_source(MediaSource::local("/sdcard/1.mp4"));
    controller.start()?;
    poller.start()?;
    println!("state: {}", controller.get_state());

    let printer = core_async::spawn(async move {
        while let Some(event) = progress.recv().await {
            match event {
                ProgressEvent::Tick(fraction) => println!("progress: {:>5.1}%", fraction * 100.0),
                ProgressEvent::Failed(err) => println!("progress failed: {}", err),
            }
        }
    });

    sleep(Duration::from_secs(1)).await;
    controller.seek(0.5)?;
    let preset = controller.cycle_speed()?;
    println!("speed: {}", preset);

    sleep(Duration::from_secs(1)).await;
    controller.pause(true)?;
    println!("state: {}", controller.get_state());
    sleep(Duration::from_millis(500)).await;

    controller.stop()?;
    println!("state: {}", controller.get_state());

    poller.shutdown().await;
    drop(poller);
    printer.abort();
    Ok(())
}
