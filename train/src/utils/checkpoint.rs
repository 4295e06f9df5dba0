use crate::{common::*, config::LoadCheckpoint};

/// The file extension of checkpoint files unless specified.
pub const DEFAULT_CHECKPOINT_SUFFIX: &str = "pth";

/// The file stem of the checkpoint that always points to the newest state.
pub const LATEST_CHECKPOINT_STEM: &str = "latest";

/// Extract the iteration counter from a checkpoint file name.
///
/// The counter is the text after the last `_` up to the following `.`,
/// e.g. `epoch_12.pth` gives 12 and `iter_1000.pth` gives 1000.
pub fn checkpoint_counter(file_name: &str) -> Option<u64> {
    let tail = file_name.rsplit('_').next()?;
    let counter = tail.split('.').next()?;
    counter.parse().ok()
}

/// Find the checkpoint file to resume from in a working directory.
///
/// `latest.<suffix>` is preferred if present. Otherwise the file with the
/// largest iteration counter is returned. A missing directory, a
/// directory without checkpoints or a non UTF-8 directory path is reported
/// by a warning and `None`.
pub fn find_latest_checkpoint<P>(dir: P, suffix: &str) -> Result<Option<PathBuf>>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();

    if !dir.exists() {
        warn!(
            "the path of checkpoints '{}' does not exist",
            dir.display()
        );
        return Ok(None);
    }

    let latest_file = dir.join(format!("{}.{}", LATEST_CHECKPOINT_STEM, suffix));
    if latest_file.is_file() {
        return Ok(Some(latest_file));
    }

    let dir_str = match dir.to_str() {
        Some(dir_str) => dir_str,
        None => {
            warn!(
                "cannot search checkpoints in '{}' because it is not a valid UTF-8 path",
                dir.display()
            );
            return Ok(None);
        }
    };
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(dir_str),
        glob::Pattern::escape(suffix)
    );
    let paths: Vec<PathBuf> = glob::glob(&pattern)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|path| path.is_file())
        .collect();

    if paths.is_empty() {
        warn!("there are no checkpoints in '{}'", dir.display());
        return Ok(None);
    }

    let latest = paths
        .into_iter()
        .filter_map(|path| {
            let counter = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(checkpoint_counter);

            match counter {
                Some(counter) => Some((path, counter)),
                None => {
                    warn!(
                        "ignore '{}' because its name has no iteration counter",
                        path.display()
                    );
                    None
                }
            }
        })
        .fold(None, |latest: Option<(PathBuf, u64)>, (path, counter)| {
            match latest {
                Some((_, latest_counter)) if latest_counter >= counter => latest,
                _ => Some((path, counter)),
            }
        })
        .map(|(path, _counter)| path);

    Ok(latest)
}

/// Decide the checkpoint file to load with the specified loading method.
pub fn resolve_checkpoint(
    work_dir: &Path,
    load_checkpoint: &LoadCheckpoint,
    suffix: &str,
) -> Result<Option<PathBuf>> {
    let path = match load_checkpoint {
        LoadCheckpoint::Disabled => {
            info!("checkpoint loading is disabled");
            None
        }
        LoadCheckpoint::FromRecent => {
            let checkpoint_file = find_latest_checkpoint(work_dir, suffix)?;

            if checkpoint_file.is_none() {
                warn!("no checkpoint file found");
            }

            checkpoint_file
        }
        LoadCheckpoint::FromFile { file } => {
            if file.is_file() {
                Some(file.to_owned())
            } else {
                warn!("{} is not a file", file.display());
                None
            }
        }
    };

    if let Some(path) = &path {
        info!("load checkpoint file {}", path.display());
    }

    Ok(path)
}
