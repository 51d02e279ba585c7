use std::{
    fs,
    io::{BufWriter, Write as _},
};

use camino::Utf8Path;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

pub fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T> {
    let file = fs::File::open(path)?;
    serde_json::from_reader(file).map_err(Into::into)
}

/// Write `value` to `path`, replacing the previous file in a single rename so
/// readers never observe a partially written file.
pub fn write_json<T: Serialize>(path: &Utf8Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    let file = fs::File::create(&tmp)?;
    let mut buf = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut buf, value)?;
    buf.write_all(b"\n")?;
    buf.flush()?;
    drop(buf);

    fs::rename(&tmp, path)?;

    Ok(())
}
