//! Microphone capture to a mono 16-bit WAV file.
//!
//! Samples arrive on cpal's audio thread, get folded to mono and are written
//! straight to disk through hound. The loudest sample since the last poll is
//! kept in an atomic so the visualizer can read it without locking.

use super::media::{CaptureHandle, MediaBackend};
use super::playback::RodioPlayback;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use hound::WavWriter;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

type SharedWriter = Arc<Mutex<Option<WavWriter<BufWriter<File>>>>>;

/// Media backend on top of cpal (input), hound (file) and rodio (output).
pub struct CpalBackend {
    device_name: String,
    sample_rate: u32,
}

impl CpalBackend {
    /// `device_name` is "default", a device name, or an index from `list-devices`.
    pub fn new(device_name: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            device_name: device_name.into(),
            sample_rate,
        }
    }
}

impl MediaBackend for CpalBackend {
    type Capture = MicrophoneCapture;
    type Playback = RodioPlayback;

    fn start_capture(&mut self, path: &Path) -> Result<MicrophoneCapture> {
        MicrophoneCapture::start(&self.device_name, self.sample_rate, path)
    }

    fn start_playback(&mut self, path: &Path) -> Result<RodioPlayback> {
        RodioPlayback::start(path)
    }
}

/// A running input stream and the file it writes to.
pub struct MicrophoneCapture {
    stream: cpal::Stream,
    writer: SharedWriter,
    peak: Arc<AtomicU16>,
}

impl MicrophoneCapture {
    /// Opens the input device and starts writing to `path`.
    ///
    /// The file is recorded at the device's native rate; `requested_rate` only
    /// produces a warning when it differs.
    ///
    /// # Errors
    /// - If the device is missing or refuses an input configuration
    /// - If `path` cannot be created
    /// - If the stream cannot be built or started
    pub fn start(device_name: &str, requested_rate: u32, path: &Path) -> Result<Self> {
        let device = open_input_device(device_name)?;
        let name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Recording device: {}", name);

        let device_config = device
            .default_input_config()
            .with_context(|| format!("Input device '{name}' has no usable configuration"))?;
        let sample_rate = device_config.sample_rate().0;
        let channels = device_config.channels() as usize;

        if sample_rate != requested_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Recording at device rate.",
                requested_rate,
                sample_rate
            );
        }
        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}",
            sample_rate,
            channels,
            device_config.sample_format()
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let wav_spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = WavWriter::create(path, wav_spec)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let writer: SharedWriter = Arc::new(Mutex::new(Some(writer)));
        let peak = Arc::new(AtomicU16::new(0));

        let sample_format = device_config.sample_format();
        let config: cpal::StreamConfig = device_config.into();
        let stream = match sample_format {
            SampleFormat::I16 => build_stream::<i16>(&device, &config, &writer, &peak, channels),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, &writer, &peak, channels),
            SampleFormat::I32 => build_stream::<i32>(&device, &config, &writer, &peak, channels),
            SampleFormat::F32 => build_stream::<f32>(&device, &config, &writer, &peak, channels),
            other => Err(anyhow!("Unsupported input sample format: {other:?}")),
        }?;

        stream.play()?;
        tracing::debug!("Audio stream started");

        Ok(Self {
            stream,
            writer,
            peak,
        })
    }
}

impl CaptureHandle for MicrophoneCapture {
    fn max_amplitude(&mut self) -> u16 {
        self.peak.swap(0, Ordering::Relaxed)
    }

    fn stop(self) -> Result<()> {
        // The callback holds a clone of the writer; stop it before finalizing.
        drop(self.stream);

        let writer = self
            .writer
            .lock()
            .map_err(|_| anyhow!("Audio writer lock poisoned"))?
            .take();

        if let Some(writer) = writer {
            let duration = writer.duration();
            let rate = writer.spec().sample_rate;
            writer.finalize()?;
            tracing::info!(
                "Recording stopped: {:.2}s ({} samples at {}Hz)",
                duration as f32 / rate as f32,
                duration,
                rate
            );
        }
        Ok(())
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    writer: &SharedWriter,
    peak: &Arc<AtomicU16>,
    channels: usize,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let writer = Arc::clone(writer);
    let peak = Arc::clone(peak);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let Ok(mut guard) = writer.lock() else {
                return;
            };
            let Some(writer) = guard.as_mut() else {
                return;
            };

            let mut loudest = 0u16;
            for frame in data.chunks_exact(channels.max(1)) {
                let mono = downmix(frame.iter().map(|s| s.to_sample::<i16>()));
                loudest = loudest.max(mono.unsigned_abs());
                if let Err(e) = writer.write_sample(mono) {
                    tracing::error!("Failed to write audio sample: {}", e);
                    return;
                }
            }
            peak.fetch_max(loudest, Ordering::Relaxed);
        },
        |err| {
            tracing::error!("Audio stream error: {}", err);
        },
        None,
    )?;
    Ok(stream)
}

/// Averages one frame of interleaved samples into a single mono sample.
fn downmix(frame: impl ExactSizeIterator<Item = i16>) -> i16 {
    let count = frame.len().max(1) as i32;
    let sum: i32 = frame.map(i32::from).sum();
    (sum / count) as i16
}

/// Resolves the configured input device, keeping ALSA's startup noise off the terminal.
///
/// # Errors
/// - If no device matches `device_name`
pub fn open_input_device(device_name: &str) -> Result<cpal::Device> {
    suppress_alsa_warnings(|| {
        let host = cpal::default_host();
        if device_name == "default" {
            host.default_input_device()
                .ok_or_else(|| anyhow!("No audio input device available"))
        } else {
            find_device_by_name(&host, device_name)
        }
    })
}

/// Finds an input device by exact name or by its position in the device list.
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    let mut devices: Vec<_> = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
        .collect();

    if let Ok(index) = device_spec.parse::<usize>() {
        let count = devices.len();
        return if index < count {
            Ok(devices.swap_remove(index))
        } else {
            Err(anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                count.saturating_sub(1)
            ))
        };
    }

    devices
        .into_iter()
        .find(|device| device.name().is_ok_and(|name| name == device_spec))
        .ok_or_else(|| {
            anyhow!(
                "Audio input device '{device_spec}' not found. Use 'recalc list-devices' to see available devices."
            )
        })
}

/// Temporarily redirects stderr to /dev/null while `f` runs.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    if unsafe { libc::dup2(dev_null.as_raw_fd(), libc::STDERR_FILENO) } == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_channels() {
        assert_eq!(downmix([100i16].into_iter()), 100);
        assert_eq!(downmix([100i16, 300].into_iter()), 200);
        assert_eq!(downmix([i16::MAX, i16::MAX].into_iter()), i16::MAX);
        assert_eq!(downmix([i16::MIN, i16::MAX].into_iter()), 0);
        assert_eq!(downmix([-30i16, 0, 30, 60].into_iter()), 15);
    }

    #[test]
    fn sample_conversion_spans_the_i16_range() {
        assert_eq!(1.0f32.to_sample::<i16>(), i16::MAX);
        assert_eq!(0.0f32.to_sample::<i16>(), 0);
        assert_eq!(u16::MAX.to_sample::<i16>(), i16::MAX);
    }
}
