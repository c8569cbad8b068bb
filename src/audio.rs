//! Live audio loudness metering, behind the `audio` feature.
//!
//! The meter opens a capture stream, extracts the first channel, and
//! follows the block RMS with a fast-attack slow-release envelope. Hosts
//! poll [`LoudnessMeter::level`] and forward the scalar to the engine,
//! which applies its own sensitivity scaling.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use log::{error, info};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Envelope step while the signal is rising.
const ATTACK: f32 = 0.85;
/// Envelope step while the signal is falling.
const RELEASE: f32 = 0.5;

/// Polls microphone loudness as a single smoothed scalar.
///
/// The capture stream is owned by the meter and stops when the meter is
/// dropped. [`cpal::Stream`] is not `Send`, so the meter lives on the
/// thread that created it; the level cell is shared with the audio
/// callback.
pub struct LoudnessMeter {
    stream: Option<Stream>,
    level: Arc<Mutex<f32>>,
}

impl LoudnessMeter {
    /// Open a capture stream on `device_name`, or the default input
    /// device when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error when the device cannot be found or the stream
    /// cannot be built or started.
    pub fn start(device_name: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let (device, config) = input_device(device_name)?;
        let channels = config.channels.max(1) as usize;

        let level = Arc::new(Mutex::new(0.0f32));
        let shared = level.clone();

        let stream = device.build_input_stream(
            &config,
            move |data: &[f32], _| {
                let rms = block_rms(data, channels);
                if let Ok(mut slot) = shared.lock() {
                    *slot = follow(*slot, rms);
                }
            },
            move |err| error!("Error in audio stream: {err}"),
            None,
        )?;

        stream.play()?;
        info!(
            "loudness meter capturing from {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        Ok(Self {
            stream: Some(stream),
            level,
        })
    }

    /// The latest smoothed loudness, roughly 0.0 (silence) to 1.0.
    pub fn level(&self) -> f32 {
        self.level.lock().map_or(0.0, |slot| *slot)
    }

    /// Stop capturing. The level decays to its last value and stays there.
    pub fn stop(&mut self) {
        self.stream.take();
    }

    /// Whether a capture stream is running.
    pub const fn is_active(&self) -> bool {
        self.stream.is_some()
    }
}

impl std::fmt::Debug for LoudnessMeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoudnessMeter")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// RMS of the first channel in an interleaved block.
fn block_rms(data: &[f32], channels: usize) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for sample in data.iter().step_by(channels) {
        sum += sample * sample;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        (sum / count as f32).sqrt()
    }
}

/// One envelope step: fast attack, slow release.
fn follow(current: f32, target: f32) -> f32 {
    let coeff = if target > current { ATTACK } else { RELEASE };
    current + coeff * (target - current)
}

fn input_device(device_name: Option<&str>) -> Result<(Device, StreamConfig), Box<dyn Error>> {
    let host = cpal::default_host();
    let device = match device_name {
        Some(name) => host
            .input_devices()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| Box::<dyn Error>::from(format!("Audio device '{name}' not found")))?,
        None => host
            .default_input_device()
            .ok_or_else(|| Box::<dyn Error>::from("No default audio input device"))?,
    };

    let config = device.default_input_config()?.into();
    Ok((device, config))
}

/// Names of every available audio input device.
///
/// # Errors
///
/// Returns an error when the host cannot enumerate devices.
pub fn list_input_devices() -> Result<Vec<String>, Box<dyn Error>> {
    let host = cpal::default_host();
    let devices = host.input_devices()?;
    let info = devices
        .map(|device| {
            let name = device.name()?;
            Ok::<String, Box<dyn Error>>(name)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_rms_strides_channels() {
        // Stereo block: left channel is constant 0.5, right is noise.
        let data = [0.5, 0.9, 0.5, -0.3, 0.5, 0.1, 0.5, -0.8];
        let rms = block_rms(&data, 2);
        assert!((rms - 0.5).abs() < 1e-6);

        assert!((block_rms(&[], 2) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_envelope_attacks_faster_than_it_releases() {
        let risen = follow(0.0, 1.0);
        assert!((risen - 0.85).abs() < 1e-6);

        let fallen = follow(1.0, 0.0);
        assert!((fallen - 0.5).abs() < 1e-6);
        assert!(1.0 - fallen < risen);
    }
}
