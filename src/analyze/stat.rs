use crate::error::{ErrorKind, Result};
use crate::facts::Facts;
use crate::handle::FileHandle;
use exn::ResultExt;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub(super) fn os_stat(handle: &FileHandle) -> Result<Facts> {
    let path = handle.path();
    let metadata = std::fs::metadata(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    let mut facts = Facts::new();
    facts.insert("File:FileSize", metadata.len());
    // Not every platform or filesystem records all three.
    for (key, time) in [
        ("File:FileModifyDate", metadata.modified()),
        ("File:FileAccessDate", metadata.accessed()),
        ("File:FileCreateDate", metadata.created()),
    ] {
        if let Ok(time) = time {
            facts.insert(key, rfc3339(time).or_raise(|| ErrorKind::Io(path.to_path_buf()))?);
        }
    }
    Ok(facts)
}

fn rfc3339(time: SystemTime) -> std::result::Result<String, time::error::Format> {
    OffsetDateTime::from(time).format(&Rfc3339)
}

pub(super) fn mimetype(handle: &FileHandle) -> Result<Facts> {
    let mut facts = Facts::new();
    facts.insert("File:MIMEType", handle.mime()?);
    Ok(facts)
}
