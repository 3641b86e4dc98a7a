use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{Error, Result};

const INDENT: &[u8] = b"    ";

/// Path of the file `file_name` is saved to under `dir`. The `.json` extension is appended to
/// the name rather than replacing an existing one.
pub(crate) fn json_file_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(format!("{file_name}.json"))
}

/// Serialize `data` with 4-space indentation, keeping non-ASCII characters unescaped.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    data.serialize(&mut ser)?;
    Ok(buf)
}

pub(crate) fn write_json_file<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    data: &T,
) -> Result<PathBuf> {
    let path = json_file_path(dir, file_name);
    let content = match to_pretty_json(data) {
        Ok(content) => content,
        Err(source) => return Err(Error::Save { path, source }),
    };
    match fs::write(&path, content) {
        Ok(()) => Ok(path),
        Err(source) => Err(Error::Io { path, source }),
    }
}
