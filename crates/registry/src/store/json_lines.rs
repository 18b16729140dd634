use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use super::{CityStore, StoreError};
use crate::{City, CityId};

/// File-backed store holding one JSON-encoded city per line.
///
/// The file is append-only: re-founding a city appends a new line and the
/// last line for an id wins. A missing file is an empty store.
#[derive(Debug)]
pub struct JsonLinesStore {
	path: PathBuf,
	append_lock: Mutex<()>,
}

impl JsonLinesStore {
	/// Opens a store at `path`. The file is created on first append.
	pub fn open(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			append_lock: Mutex::new(()),
		}
	}

	/// Path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Persists `city` by appending it to the file.
	pub fn append(&self, city: &City) -> Result<(), StoreError> {
		let mut line = serde_json::to_string(city).map_err(|source| StoreError::Encode { id: city.id, source })?;
		line.push('\n');

		let _guard = self.append_lock.lock();
		let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
		file.write_all(line.as_bytes())?;
		file.flush()?;
		debug!(city = %city.id, path = %self.path.display(), "appended city");
		Ok(())
	}

	/// Visits each decoded record in file order. Blank lines are skipped.
	fn for_each_record(&self, mut visit: impl FnMut(City)) -> Result<(), StoreError> {
		let file = match File::open(&self.path) {
			Ok(file) => file,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
			Err(e) => return Err(e.into()),
		};
		for (idx, line) in BufReader::new(file).lines().enumerate() {
			let line = line?;
			if line.trim().is_empty() {
				continue;
			}
			let city = serde_json::from_str(&line).map_err(|source| StoreError::Decode { line: idx + 1, source })?;
			visit(city);
		}
		Ok(())
	}
}

impl CityStore for JsonLinesStore {
	fn load_all(&self, visit: &mut dyn FnMut(City)) -> Result<(), StoreError> {
		self.for_each_record(visit)
	}

	fn fetch(&self, id: CityId) -> Result<Option<City>, StoreError> {
		let mut found = None;
		self.for_each_record(|city| {
			if city.id == id {
				found = Some(city);
			}
		})?;
		Ok(found)
	}
}
