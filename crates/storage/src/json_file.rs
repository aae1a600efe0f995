//! JsonFileAssignmentStore - one JSON document per assignment

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use contracts::{Assignment, AssignmentId, AssignmentStore, ContractError, StoredAssignment};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

const EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// Store writing each assignment to `<base_path>/<id>.json`
///
/// Documents are written to a temporary file and renamed into place, so
/// readers never observe a partial assignment.
#[derive(Debug)]
pub struct JsonFileAssignmentStore {
    name: String,
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileAssignmentStore {
    /// Create the store, creating `base_path` if needed
    pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self {
            name: name.into(),
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    fn document_path(&self, id: &AssignmentId) -> PathBuf {
        self.base_path.join(format!("{id}.{EXTENSION}"))
    }

    async fn write_document(&self, stored: &StoredAssignment) -> std::io::Result<()> {
        let body = serde_json::to_vec_pretty(stored)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

        let final_path = self.document_path(&stored.id);
        let temp_path = self.base_path.join(format!("{}.{TEMP_EXTENSION}", stored.id));

        let _guard = self.write_lock.lock().await;
        write_atomically(&temp_path, &final_path, &body).await
    }

    async fn read_documents(&self) -> std::io::Result<Vec<StoredAssignment>> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }

            let body = fs::read(&path).await?;
            let stored: StoredAssignment = serde_json::from_slice(&body).map_err(|e| {
                warn!(store = %self.name, path = %path.display(), error = %e, "Unreadable assignment");
                std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("{}: {e}", path.display()),
                )
            })?;
            documents.push(stored);
        }

        documents.sort_by(|a, b| {
            a.assignment
                .created_at
                .cmp(&b.assignment.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(documents)
    }
}

/// Write `body` to `temp_path`, then rename it over `final_path`
///
/// On any failure the temporary file is removed.
async fn write_atomically(
    temp_path: &Path,
    final_path: &Path,
    body: &[u8],
) -> std::io::Result<()> {
    let result = match fs::write(temp_path, body).await {
        Ok(()) => fs::rename(temp_path, final_path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = fs::remove_file(temp_path).await;
    }
    result
}

impl AssignmentStore for JsonFileAssignmentStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "json_file_store_save",
        skip(self, assignment),
        fields(store = %self.name, items = assignment.items.len())
    )]
    async fn save(&self, assignment: Assignment) -> Result<StoredAssignment, ContractError> {
        let stored = StoredAssignment {
            id: AssignmentId::generate(),
            assignment,
        };

        self.write_document(&stored).await.map_err(|e| {
            error!(store = %self.name, id = %stored.id, error = %e, "Write failed");
            ContractError::persistence(&self.name, e.to_string())
        })?;

        debug!(store = %self.name, id = %stored.id, "Assignment saved");
        Ok(stored)
    }

    #[instrument(name = "json_file_store_list", skip(self), fields(store = %self.name))]
    async fn list_all(&self) -> Result<Vec<StoredAssignment>, ContractError> {
        self.read_documents()
            .await
            .map_err(|e| ContractError::persistence(&self.name, e.to_string()))
    }
}
