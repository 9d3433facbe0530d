use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::engine::EngineError;
use crate::model::*;
use crate::observability::PERSIST_DURATION_SECONDS;

/// Read and parse the dataset file. Structural validation happens in `Engine::new`.
pub fn load(path: &Path) -> Result<Dataset, EngineError> {
    let raw = fs::read(path)
        .map_err(|e| EngineError::DatasetInvalid(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&raw)
        .map_err(|e| EngineError::DatasetInvalid(format!("{}: {e}", path.display())))
}

/// Same shape as `Dataset`, with bookings that may be borrowed or replaced.
#[derive(Serialize)]
struct SnapshotView<'a> {
    dealers: &'a [Dealer],
    bookings: Vec<Cow<'a, Booking>>,
}

/// Serialize the dataset as it will look once `event` is applied,
/// without applying it.
pub fn encode_after(dataset: &Dataset, event: &Event) -> Result<Vec<u8>, EngineError> {
    let mut bookings: Vec<Cow<'_, Booking>> = dataset.bookings.iter().map(Cow::Borrowed).collect();
    match event {
        Event::BookingCreated { booking } => bookings.push(Cow::Borrowed(booking)),
        Event::BookingCancelled {
            id,
            cancelled_at,
            reason,
        } => {
            let slot = bookings
                .iter_mut()
                .find(|b| b.id == *id)
                .ok_or_else(|| EngineError::BookingNotFound(id.clone()))?;
            let b = slot.to_mut();
            b.cancelled_at = Some(*cancelled_at);
            b.cancelled_reason = Some(reason.clone());
        }
    }
    let view = SnapshotView {
        dealers: &dataset.dealers,
        bookings,
    };
    serde_json::to_vec_pretty(&view).map_err(|e| EngineError::Persist(e.to_string()))
}

/// `<path>.tmp`, in the same directory so the rename stays on one filesystem.
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Write `bytes` to a temp file next to `path`, fsync, then rename over `path`.
/// Readers see either the old file or the new one, never a partial write.
/// On failure the temp file is removed and `path` is untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp_path = tmp_path_for(path);
    let result = write_synced(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Persist the post-event snapshot to `path`.
pub fn persist_after(path: &Path, dataset: &Dataset, event: &Event) -> Result<(), EngineError> {
    let start = Instant::now();
    let bytes = encode_after(dataset, event)?;
    write_atomic(path, &bytes)
        .map_err(|e| EngineError::Persist(format!("{}: {e}", path.display())))?;
    metrics::histogram!(PERSIST_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "dataset written");
    Ok(())
}

pub fn save(path: &Path, dataset: &Dataset) -> Result<(), EngineError> {
    let bytes = serde_json::to_vec_pretty(dataset).map_err(|e| EngineError::Persist(e.to_string()))?;
    write_atomic(path, &bytes).map_err(|e| EngineError::Persist(format!("{}: {e}", path.display())))
}
