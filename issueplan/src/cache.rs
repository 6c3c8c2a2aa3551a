//! Per-run schema cache keyed by project id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::errors::TransportError;
use crate::github::ProjectSchemaProvider;
use crate::schema::SchemaIndex;

type Slot<T> = Arc<OnceCell<T>>;

/// Memoizes provider calls for the duration of one run.
///
/// Each project id is fetched at most once: concurrent callers asking for the
/// same project wait on a single fill. Failed fetches are not stored.
pub struct SchemaCache<'p, P> {
    provider: &'p P,
    schemas: Mutex<HashMap<String, Slot<Arc<SchemaIndex>>>>,
    names: Mutex<HashMap<String, Slot<String>>>,
}

impl<'p, P> SchemaCache<'p, P>
where
    P: ProjectSchemaProvider,
{
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            schemas: Mutex::new(HashMap::new()),
            names: Mutex::new(HashMap::new()),
        }
    }

    /// Schema index for `project_id`, fetched on first use.
    ///
    /// `owner` is only passed through to the provider on the fetching call.
    pub async fn schema(&self, project_id: &str, owner: &str) -> Result<Arc<SchemaIndex>, TransportError> {
        let slot = slot_for(&self.schemas, project_id).await;
        let index = slot
            .get_or_try_init(|| async {
                log::debug!("fetching fields for project {project_id}");
                let fields = self.provider.project_fields(project_id, owner).await?;
                log::debug!("project {project_id} has {} field(s)", fields.len());
                Ok::<_, TransportError>(Arc::new(SchemaIndex::build(fields)))
            })
            .await?;
        Ok(Arc::clone(index))
    }

    /// Display name of `project_id`, fetched on first use.
    pub async fn project_name(&self, project_id: &str) -> Result<String, TransportError> {
        let slot = slot_for(&self.names, project_id).await;
        let name = slot
            .get_or_try_init(|| self.provider.project_name(project_id))
            .await?;
        Ok(name.clone())
    }

    /// Number of projects with a cached schema.
    pub async fn cached_projects(&self) -> usize {
        let schemas = self.schemas.lock().await;
        schemas.values().filter(|slot| slot.initialized()).count()
    }
}

async fn slot_for<T>(slots: &Mutex<HashMap<String, Slot<T>>>, key: &str) -> Slot<T> {
    let mut slots = slots.lock().await;
    Arc::clone(slots.entry(key.to_string()).or_default())
}
