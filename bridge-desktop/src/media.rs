//! Symphonia-backed probing and batch decoding.

use bridge_traits::BridgeError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported media: {0}")]
    Unsupported(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MediaError> for BridgeError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Open { source, .. } => BridgeError::Io(source),
            MediaError::Io(source) => BridgeError::Io(source),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

/// Result of a [`decode_to_pcm`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmSummary {
    /// Sample frames written (one frame = one sample per channel).
    pub frames: u64,
    pub channels: usize,
    pub sample_rate: u32,
    pub bytes_written: u64,
}

fn open_reader(path: &Path) -> Result<Box<dyn FormatReader>, MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| MediaError::Unsupported(format!("probe failed: {}", e)))?;

    Ok(probed.format)
}

fn first_decodable(reader: &dyn FormatReader) -> Result<Track, MediaError> {
    reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .cloned()
        .ok_or_else(|| MediaError::Unsupported("no decodable track".to_string()))
}

/// Duration in seconds of the first decodable track of `path`.
pub fn probe_duration(path: &Path) -> Result<f64, MediaError> {
    let reader = open_reader(path)?;
    let track = first_decodable(reader.as_ref())?;
    let params = &track.codec_params;

    let n_frames = params
        .n_frames
        .ok_or_else(|| MediaError::Unsupported("unknown duration".to_string()))?;

    let seconds = match (params.time_base, params.sample_rate) {
        (Some(tb), _) => {
            let time = tb.calc_time(n_frames);
            time.seconds as f64 + time.frac
        }
        (None, Some(rate)) if rate > 0 => n_frames as f64 / rate as f64,
        _ => return Err(MediaError::Unsupported("unknown time base".to_string())),
    };

    debug!(path = %path.display(), seconds, "Probed duration");
    Ok(seconds)
}

/// Decodes the first decodable track of `input` into interleaved
/// little-endian `f32` samples at `output`, replacing any existing file.
pub fn decode_to_pcm(input: &Path, output: &Path) -> Result<PcmSummary, MediaError> {
    let mut reader = open_reader(input)?;
    let track = first_decodable(reader.as_ref())?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| MediaError::Unsupported(format!("no codec: {}", e)))?;

    let mut writer = BufWriter::new(File::create(output)?);
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut summary = PcmSummary {
        frames: 0,
        channels: 0,
        sample_rate: 0,
        bytes_written: 0,
    };

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                warn!("Track list changed mid-stream, stopping decode");
                break;
            }
            Err(e) => return Err(MediaError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!("Skipping corrupt packet: {}", msg);
                continue;
            }
            Err(e) => return Err(MediaError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        let needed = decoded.capacity() * spec.channels.count();
        if sample_buf.as_ref().map_or(true, |buf| buf.capacity() < needed) {
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        for sample in buf.samples() {
            writer.write_all(&sample.to_le_bytes())?;
        }

        summary.bytes_written += (buf.samples().len() * std::mem::size_of::<f32>()) as u64;
        summary.channels = spec.channels.count();
        summary.sample_rate = spec.rate;
        if summary.channels > 0 {
            summary.frames += (buf.samples().len() / summary.channels) as u64;
        }
    }

    writer.flush()?;
    Ok(summary)
}
