//! ImageMagick based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult};

/// Output coder prefix; forces HEIC regardless of the output file's extension.
const OUTPUT_CODER: &str = "HEIC";

/// Converter that shells out to `magick`.
pub struct MagickConverter {
    config: ConverterConfig,
}

impl MagickConverter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds `magick` arguments for one conversion.
    fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<String> {
        let mut args = vec![input_path.to_string_lossy().to_string()];

        if let Some(quality) = self.config.quality {
            args.extend(["-quality".to_string(), quality.to_string()]);
        }

        args.extend(self.config.extra_args.iter().cloned());

        args.push(format!("{}:{}", OUTPUT_CODER, output_path.to_string_lossy()));

        args
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::MagickNotFound {
                path: self.config.magick_path.clone(),
            }
        } else {
            ConverterError::Io(e)
        }
    }
}

#[async_trait]
impl Converter for MagickConverter {
    fn name(&self) -> &str {
        "imagemagick"
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        if !tokio::fs::try_exists(&job.input_path).await? {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        let args = self.build_args(&job.input_path, &job.output_path);
        tracing::debug!(job_id = %job.job_id, ?args, "running magick");

        let output = Command::new(&self.config.magick_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConverterError::conversion_failed(
                format!("magick exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("Output file not created", None))?;

        Ok(ConversionResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let output = Command::new(&self.config.magick_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(ConverterError::conversion_failed(
                "magick -version failed",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        Ok(())
    }
}
