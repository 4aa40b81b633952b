//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionResult};

/// A codec that turns a readable image into an encoded file at the job's
/// output path.
///
/// The output directory is created by the caller before `convert` is invoked.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Converts one image according to the job.
    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct EchoConverter;

    #[async_trait]
    impl Converter for EchoConverter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
            Ok(ConversionResult {
                job_id: job.job_id,
                output_path: job.output_path,
                output_size_bytes: 512,
                duration_ms: 1,
            })
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_converter_is_object_safe() {
        let converter: Box<dyn Converter> = Box::new(EchoConverter);
        let job = ConversionJob::new(
            "a.jpg",
            PathBuf::from("/src/a.jpg"),
            PathBuf::from("/dst/a.HEIC"),
        );
        let result = converter.convert(job).await.unwrap();
        assert_eq!(result.job_id, "a.jpg");
        assert_eq!(result.output_path, PathBuf::from("/dst/a.HEIC"));
        assert_eq!(converter.name(), "echo");
        assert!(converter.validate().await.is_ok());
    }
}
