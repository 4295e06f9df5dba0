//! Training program configuration format.

use crate::{common::*, utils};

pub use dataset::*;
pub use training::*;

/// The main configuration.
///
/// Keys other than the ones listed here are kept in `extra` so that the
/// configuration can be written back without losing information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The working directory where checkpoints are saved.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub load_checkpoint: LoadCheckpoint,
    pub test_dataloader: DataLoaderConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        Self::from_json5_str(&text)
    }

    pub fn from_json5_str(text: &str) -> Result<Self> {
        let config = json5::from_str(text)?;
        Ok(config)
    }

    /// Get the data pipeline of the test dataset.
    pub fn test_pipeline(&self) -> Result<&[TransformConfig]> {
        self.test_dataloader
            .dataset
            .find_pipeline()
            .ok_or_else(|| format_err!("cannot find `pipeline` in `test_dataloader`"))
    }

    /// Locate the checkpoint file to resume from, following `load_checkpoint`.
    pub fn checkpoint_to_load(&self, suffix: &str) -> Result<Option<PathBuf>> {
        match (&self.load_checkpoint, &self.work_dir) {
            (LoadCheckpoint::FromRecent, None) => {
                bail!("`work_dir` must be set to load the most recent checkpoint")
            }
            (load_checkpoint, work_dir) => {
                let work_dir = work_dir.as_deref().unwrap_or_else(|| Path::new("."));
                utils::resolve_checkpoint(work_dir, load_checkpoint, suffix)
            }
        }
    }
}

/// Load a configuration file and get the data pipeline of the test dataset.
pub fn load_test_pipeline<P>(path: P) -> Result<Vec<TransformConfig>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let config = Config::open(path)
        .with_context(|| format!("failed to load config file '{}'", path.display()))?;
    let pipeline = config.test_pipeline()?.to_vec();
    Ok(pipeline)
}

mod dataset {
    use super::*;

    /// Data loader options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DataLoaderConfig {
        pub dataset: DatasetConfig,
        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    /// Dataset options.
    ///
    /// A dataset either owns a `pipeline`, or wraps other datasets through
    /// `dataset` (e.g. repeated datasets) or `datasets` (e.g. concatenated
    /// datasets).
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub pipeline: Option<Vec<TransformConfig>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub dataset: Option<Box<DatasetConfig>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub datasets: Option<Vec<DatasetConfig>>,
        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    impl DatasetConfig {
        /// Search the pipeline through dataset wrappers.
        ///
        /// The own `pipeline` takes precedence over the wrapped `dataset`,
        /// which takes precedence over the first of `datasets`.
        pub fn find_pipeline(&self) -> Option<&[TransformConfig]> {
            if let Some(pipeline) = &self.pipeline {
                Some(pipeline.as_slice())
            } else if let Some(dataset) = &self.dataset {
                dataset.find_pipeline()
            } else if let Some(datasets) = &self.datasets {
                datasets.first()?.find_pipeline()
            } else {
                None
            }
        }
    }

    /// A step of the data pipeline.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransformConfig {
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(flatten)]
        pub args: Map<String, Value>,
    }
}

mod training {
    use super::*;

    /// Checkpoint file loading method.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "type")]
    pub enum LoadCheckpoint {
        /// Disable checkpoint file loading.
        Disabled,
        /// Load the most recent checkpoint file in the working directory.
        FromRecent,
        /// Load the checkpoint file at specified path.
        FromFile { file: PathBuf },
    }

    impl Default for LoadCheckpoint {
        fn default() -> Self {
            Self::Disabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_precedence() {
        let config = Config::from_json5_str(
            r#"{
                test_dataloader: {
                    dataset: {
                        type: "RepeatDataset",
                        pipeline: [{ type: "Outer" }],
                        dataset: { pipeline: [{ type: "Inner" }] },
                    },
                },
            }"#,
        )
        .unwrap();

        let pipeline = config.test_pipeline().unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline[0].kind, "Outer");
    }

    #[test]
    fn null_pipeline_falls_through_to_wrapped_dataset() {
        let config = Config::from_json5_str(
            r#"{
                test_dataloader: {
                    dataset: {
                        type: "RepeatDataset",
                        pipeline: null,
                        dataset: { pipeline: [{ type: "Inner" }] },
                    },
                },
            }"#,
        )
        .unwrap();

        let pipeline = config.test_pipeline().unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline[0].kind, "Inner");
    }

    #[test]
    fn empty_concat_has_no_pipeline() {
        let config = Config::from_json5_str(
            r#"{ test_dataloader: { dataset: { type: "ConcatDataset", datasets: [] } } }"#,
        )
        .unwrap();

        let err = config.test_pipeline().unwrap_err();
        assert!(err.to_string().contains("cannot find `pipeline`"));
    }

    #[test]
    fn load_checkpoint_defaults_to_disabled() {
        let config = Config::from_json5_str(r#"{ test_dataloader: { dataset: {} } }"#).unwrap();
        assert_eq!(config.load_checkpoint, LoadCheckpoint::Disabled);
        assert_eq!(config.checkpoint_to_load("pth").unwrap(), None);
    }

    #[test]
    fn recent_checkpoint_requires_work_dir() {
        let config = Config::from_json5_str(
            r#"{ load_checkpoint: { type: "FromRecent" }, test_dataloader: { dataset: {} } }"#,
        )
        .unwrap();
        assert!(config.checkpoint_to_load("pth").is_err());
    }
}
