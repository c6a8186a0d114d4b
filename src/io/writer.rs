use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::{Builder, NamedTempFile};

use crate::io::IoError;

/// Serialize `value` as block-style YAML, keeping field and map order.
pub fn write_yaml<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<(), IoError> {
    serde_yaml::to_writer(writer, value)?;
    Ok(())
}

/// Write `value` to `path` in one shot.
///
/// The document goes to a sibling temporary file first and is renamed over
/// `path` only after it has been fully written, so `path` is never left
/// half-written. An existing file keeps its permissions; a new one gets the
/// usual umask-filtered mode.
pub fn write_yaml_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = sibling_temp_file(dir, path)?;
    write_yaml(&mut file, value)?;
    file.as_file_mut().flush()?;
    file.persist(path)?;
    Ok(())
}

fn sibling_temp_file(dir: &Path, path: &Path) -> Result<NamedTempFile, IoError> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let file = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(path) {
        fs::set_permissions(file.path(), existing.permissions())?;
    }
    Ok(file)
}
