use bridge_desktop::{decode_to_pcm, probe_duration, SoftwareEngine};
use bridge_traits::{MediaEngine, MediaSource};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Writes a mono 16-bit PCM WAV file holding `frames` samples of a ramp.
fn write_wav(path: &Path, sample_rate: u32, frames: u32) {
    let data_len = frames * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..frames {
        let sample = ((i % 200) as i16 - 100) * 100;
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&bytes).unwrap();
}

fn fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("tone.wav");
    write_wav(&path, 8_000, 16_000);
    path
}

#[test]
fn test_probe_duration_of_wav() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let seconds = probe_duration(&path).unwrap();
    assert!((seconds - 2.0).abs() < 1e-6, "got {}", seconds);
}

#[test]
fn test_decode_to_pcm_writes_f32_samples() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir);
    let output = dir.path().join("tone.pcm");

    let summary = decode_to_pcm(&input, &output).unwrap();
    assert_eq!(summary.channels, 1);
    assert_eq!(summary.sample_rate, 8_000);
    assert_eq!(summary.frames, 16_000);

    let written = std::fs::metadata(&output).unwrap().len();
    assert_eq!(written, 16_000 * 4);
    assert_eq!(written, summary.bytes_written);
}

#[test]
fn test_decode_rejects_non_media_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, b"not audio at all").unwrap();

    assert!(decode_to_pcm(&input, &dir.path().join("out.pcm")).is_err());
}

#[test]
fn test_engine_plays_probed_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    let engine = SoftwareEngine::new();

    engine.play(&MediaSource::local(&path), None).unwrap();
    assert!((engine.duration().unwrap() - 2.0).abs() < 1e-6);

    std::thread::sleep(Duration::from_millis(50));
    let position = engine.position().unwrap();
    assert!(position > 0.0 && position <= 2.0);

    engine.pause(true);
    let frozen = engine.position().unwrap();
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(engine.position().unwrap(), frozen);
}

#[test]
fn test_engine_speed_scales_clock() {
    let engine = SoftwareEngine::builder().fixed_duration(120.0).build();
    engine.set_speed(3.0).unwrap();
    engine.play(&MediaSource::local("clip.mp4"), None).unwrap();

    std::thread::sleep(Duration::from_millis(100));
    assert!(engine.position().unwrap() >= 0.3);
}

#[test]
fn test_engine_decode_when_idle() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir);
    let output = dir.path().join("decoded.pcm");
    let engine = SoftwareEngine::new();

    engine.run_decode(&input, &output).unwrap();
    assert!(output.exists());
}
