use std::{
    fs::{File, OpenOptions},
    path::Path,
};

use anyhow::Context;
use fs_extra::dir::CopyOptions;
use log::{debug, info};

/// Opens `path` for writing, creating parent directories and truncating.
pub(super) fn create_output(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("while creating {parent:?}"))?;
    }
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("while opening {path:?}"))
}

/// Clears `out_dir` and copies the contents of `public_dir` into it.
pub(super) fn prepare_out_dir(out_dir: &Path, public_dir: &Path) -> anyhow::Result<()> {
    fs_extra::dir::remove(out_dir).with_context(|| format!("while removing {out_dir:?}"))?;
    fs_extra::dir::create_all(out_dir, false)?;

    if !public_dir.is_dir() {
        info!("public_dir({public_dir:?}) does not exist. ignoring...");
        return Ok(());
    }
    let mut cp_opts = CopyOptions::new();
    cp_opts.content_only = true;
    cp_opts.overwrite = true;
    fs_extra::dir::copy(public_dir, out_dir, &cp_opts)
        .with_context(|| format!("while copying {public_dir:?}"))?;
    debug!("copied {public_dir:?} into {out_dir:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_dir_is_reset_and_public_copied() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        let public = root.path().join("public");
        std::fs::create_dir_all(public.join("img")).unwrap();
        std::fs::write(public.join("style.css"), "body {}").unwrap();
        std::fs::write(public.join("img/logo.svg"), "<svg/>").unwrap();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.html"), "old").unwrap();

        prepare_out_dir(&out, &public).unwrap();
        assert!(!out.join("stale.html").exists());
        assert!(out.join("style.css").exists());
        assert!(out.join("img/logo.svg").exists());
    }

    #[test]
    fn missing_public_dir_is_fine() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        prepare_out_dir(&out, &root.path().join("nope")).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn create_output_truncates() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("a/b/index.html");
        std::io::Write::write_all(&mut create_output(&path).unwrap(), b"longer text").unwrap();
        std::io::Write::write_all(&mut create_output(&path).unwrap(), b"short").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "short");
    }
}
