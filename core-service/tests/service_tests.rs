//! Player service façade tests.

use bridge_desktop::SoftwareEngine;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{BridgeError, MediaEngine, MediaSource, SurfaceHandle};
use core_async::time::{sleep, timeout, Duration};
use core_playback::{DecodeBusyReason, PlaybackError, PlaybackState, PlayerConfig, ProgressEvent};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, PlaybackEvent};
use core_service::{CoreError, PlayerService};
use mockall::mock;
use std::path::Path;
use std::sync::Arc;

mock! {
    pub Engine {}

    impl MediaEngine for Engine {
        fn play(&self, source: &MediaSource, surface: Option<SurfaceHandle>) -> BridgeResult<()>;
        fn set_surface(&self, surface: Option<SurfaceHandle>) -> BridgeResult<()>;
        fn pause(&self, paused: bool);
        fn seek(&self, seconds: f64) -> BridgeResult<()>;
        fn stop(&self) -> BridgeResult<()>;
        fn set_speed(&self, factor: f32) -> BridgeResult<()>;
        fn position(&self) -> BridgeResult<f64>;
        fn duration(&self) -> BridgeResult<f64>;
        fn run_decode(&self, input: &Path, output: &Path) -> BridgeResult<()>;
    }
}

fn core_config(engine: Arc<dyn MediaEngine>) -> CoreConfig {
    CoreConfig::builder().engine(engine).build().unwrap()
}

fn player_config() -> PlayerConfig {
    PlayerConfig::default().with_poll_interval(Duration::from_millis(20))
}

fn software(seconds: f64) -> Arc<dyn MediaEngine> {
    Arc::new(SoftwareEngine::builder().fixed_duration(seconds).build())
}

#[core_async::test]
async fn test_toggle_follows_play_button() {
    let (player, _progress) = PlayerService::new(core_config(software(60.0)), player_config()).unwrap();
    player.set_source(MediaSource::local("/sdcard/1.mp4"));

    assert_eq!(player.toggle().unwrap(), PlaybackState::Playing);
    assert_eq!(player.toggle().unwrap(), PlaybackState::Paused);
    assert_eq!(player.toggle().unwrap(), PlaybackState::Playing);

    player.stop().unwrap();
    assert_eq!(player.state(), PlaybackState::Ended);
    assert_eq!(player.toggle().unwrap(), PlaybackState::Playing);

    player.shutdown().await.unwrap();
    assert_eq!(player.state(), PlaybackState::Ended);
}

#[core_async::test]
async fn test_toggle_without_source_is_rejected() {
    let (player, _progress) = PlayerService::new(core_config(software(60.0)), player_config()).unwrap();

    let err = player.toggle().unwrap_err();
    assert!(err.is_rejection());
    assert!(matches!(err, CoreError::Playback(PlaybackError::SourceNotSet)));
    assert_eq!(player.state(), PlaybackState::Idle);
}

#[core_async::test]
async fn test_progress_reaches_receiver() {
    let (player, mut progress) =
        PlayerService::new(core_config(software(100.0)), player_config()).unwrap();
    player.set_source(MediaSource::local("/sdcard/1.mp4"));
    player.play().unwrap();
    player.seek(0.5).unwrap();

    let percent = player.progress_percent().unwrap();
    assert!((50..=51).contains(&percent), "percent {}", percent);

    match timeout(Duration::from_secs(1), progress.recv()).await.unwrap() {
        Some(ProgressEvent::Tick(fraction)) => assert!(fraction >= 0.5),
        other => panic!("unexpected {:?}", other),
    }

    player.stop().unwrap();
    sleep(Duration::from_millis(50)).await;
    while progress.try_recv().is_ok() {}
    sleep(Duration::from_millis(60)).await;
    assert!(progress.try_recv().is_err());
    assert_eq!(player.progress_percent().unwrap(), 0);
}

#[core_async::test]
async fn test_play_from_host_thread() {
    let (player, mut progress) =
        PlayerService::new(core_config(software(100.0)), player_config()).unwrap();
    let player = Arc::new(player);
    player.set_source(MediaSource::local("/sdcard/1.mp4"));

    let host = player.clone();
    std::thread::spawn(move || host.toggle().map(|_| ()))
        .join()
        .unwrap()
        .unwrap();

    let tick = timeout(Duration::from_secs(1), progress.recv()).await.unwrap();
    assert!(matches!(tick, Some(ProgressEvent::Tick(_))));
    player.shutdown().await.unwrap();
}

#[core_async::test]
async fn test_decode_rejected_while_playing() {
    let (player, _progress) = PlayerService::new(core_config(software(60.0)), player_config()).unwrap();
    player.set_source(MediaSource::local("/sdcard/1.mp4"));
    player.play().unwrap();

    let err = player.decode("/sdcard/1.mp4", "/sdcard/1.pcm").unwrap_err();
    assert!(err.is_rejection());
    assert!(matches!(
        err,
        CoreError::Playback(PlaybackError::DecodeBusy(DecodeBusyReason::PlaybackActive))
    ));
    assert!(!player.is_decoding());
}

#[core_async::test]
async fn test_decode_failure_surfaces_through_handle() {
    let mut engine = MockEngine::new();
    engine.expect_run_decode().times(1).returning(|_, _| {
        Err(BridgeError::Status {
            operation: "run_decode",
            code: -22,
        })
    });

    let (player, _progress) =
        PlayerService::new(core_config(Arc::new(engine)), player_config()).unwrap();
    let err = player
        .decode("/sdcard/in.mp4", "/sdcard/out.pcm")
        .unwrap()
        .await
        .unwrap_err();
    assert_eq!(err.engine_status(), Some(-22));
}

#[core_async::test]
async fn test_events_are_published() {
    let (player, _progress) = PlayerService::new(core_config(software(30.0)), player_config()).unwrap();
    let mut events = player
        .subscribe()
        .filter(|event| matches!(event, CoreEvent::Playback(_)));

    player.set_source(MediaSource::local("/sdcard/1.mp4"));
    player.play().unwrap();
    player.cycle_speed().unwrap();

    assert!(matches!(
        events.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::Started { duration_ms: 30_000, .. })
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::SpeedChanged { .. })
    ));
    player.shutdown().await.unwrap();
}

#[test]
fn test_new_requires_runtime() {
    let err = PlayerService::new(core_config(software(30.0)), PlayerConfig::default()).unwrap_err();
    assert!(matches!(err, CoreError::InitializationFailed(_)));
}

#[core_async::test]
async fn test_invalid_player_config_is_rejected() {
    let config = PlayerConfig::default().with_poll_interval(Duration::ZERO);
    let err = PlayerService::new(core_config(software(30.0)), config).unwrap_err();
    assert!(matches!(err, CoreError::Playback(PlaybackError::Config(_))));
}

#[cfg(feature = "desktop-shims")]
#[core_async::test]
async fn test_bootstrap_desktop() {
    let (player, _progress) = core_service::bootstrap_desktop().unwrap();
    assert_eq!(player.state(), PlaybackState::Idle);
    assert!(player.controller().arbiter().is_exclusive());
}

#[cfg(not(feature = "desktop-shims"))]
#[test]
fn test_missing_engine_fails_fast() {
    let err: CoreError = CoreConfig::builder().build().unwrap_err().into();
    assert!(matches!(err, CoreError::CapabilityMissing { .. }));
}
