use anyhow::Result;
use std::fs;
use train::{
    config::LoadCheckpoint,
    utils::{find_latest_checkpoint, resolve_checkpoint, DEFAULT_CHECKPOINT_SUFFIX},
};

fn touch_all(dir: &std::path::Path, file_names: &[&str]) -> Result<()> {
    file_names
        .iter()
        .try_for_each(|name| fs::write(dir.join(name), b"weights"))?;
    Ok(())
}

#[test]
fn missing_directory_gives_none() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("not_exist");
    assert_eq!(find_latest_checkpoint(&dir, DEFAULT_CHECKPOINT_SUFFIX)?, None);
    Ok(())
}

#[test]
fn empty_directory_gives_none() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    touch_all(tmp.path(), &["iter_100.ckpt", "notes.txt"])?;
    assert_eq!(find_latest_checkpoint(tmp.path(), "pth")?, None);
    Ok(())
}

#[test]
fn latest_file_takes_precedence() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    touch_all(tmp.path(), &["epoch_1.pth", "epoch_12.pth", "latest.pth"])?;
    assert_eq!(
        find_latest_checkpoint(tmp.path(), "pth")?,
        Some(tmp.path().join("latest.pth"))
    );
    Ok(())
}

#[test]
fn largest_counter_wins() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    touch_all(
        tmp.path(),
        &["iter_900.pth", "iter_1000.pth", "iter_20.pth", "model_final.pth"],
    )?;
    assert_eq!(
        find_latest_checkpoint(tmp.path(), "pth")?,
        Some(tmp.path().join("iter_1000.pth"))
    );
    Ok(())
}

#[test]
fn equal_counters_keep_first_in_name_order() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    touch_all(tmp.path(), &["c_1.pth", "b_01.pth", "a_1.pth"])?;
    assert_eq!(
        find_latest_checkpoint(tmp.path(), "pth")?,
        Some(tmp.path().join("a_1.pth"))
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn non_utf8_directory_gives_none() -> Result<()> {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join(OsStr::from_bytes(b"exp_\xff"));
    fs::create_dir(&dir)?;
    touch_all(&dir, &["epoch_2.pth"])?;
    assert_eq!(find_latest_checkpoint(&dir, "pth")?, None);
    Ok(())
}

#[test]
fn custom_suffix() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    touch_all(tmp.path(), &["epoch_3.ckpt", "epoch_30.pth"])?;
    assert_eq!(
        find_latest_checkpoint(tmp.path(), "ckpt")?,
        Some(tmp.path().join("epoch_3.ckpt"))
    );
    Ok(())
}

#[test]
fn unparsable_names_only_gives_none() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    touch_all(tmp.path(), &["model_final.pth", "best.pth"])?;
    assert_eq!(find_latest_checkpoint(tmp.path(), "pth")?, None);
    Ok(())
}

#[test]
fn glob_characters_in_directory_name() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("exp[1]");
    fs::create_dir(&dir)?;
    touch_all(&dir, &["epoch_2.pth"])?;
    assert_eq!(
        find_latest_checkpoint(&dir, "pth")?,
        Some(dir.join("epoch_2.pth"))
    );
    Ok(())
}

#[test]
fn resolve_with_loading_methods() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    touch_all(tmp.path(), &["epoch_5.pth", "epoch_6.pth"])?;
    let work_dir = tmp.path();

    assert_eq!(
        resolve_checkpoint(work_dir, &LoadCheckpoint::Disabled, "pth")?,
        None
    );
    assert_eq!(
        resolve_checkpoint(work_dir, &LoadCheckpoint::FromRecent, "pth")?,
        Some(work_dir.join("epoch_6.pth"))
    );

    let file = work_dir.join("epoch_5.pth");
    assert_eq!(
        resolve_checkpoint(
            work_dir,
            &LoadCheckpoint::FromFile { file: file.clone() },
            "pth"
        )?,
        Some(file)
    );
    assert_eq!(
        resolve_checkpoint(
            work_dir,
            &LoadCheckpoint::FromFile {
                file: work_dir.join("epoch_7.pth")
            },
            "pth"
        )?,
        None
    );
    Ok(())
}
