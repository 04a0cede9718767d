//! `PostgreSQL` workflow repository.

use super::{models::WorkflowVersionRow, schema::workflow_versions};
use crate::access::domain::SpaceId;
use crate::workflow::{
    domain::{
        PersistedWorkflowData, WorkflowDefinition, WorkflowDigest, WorkflowId, WorkflowVersion,
    },
    ports::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by workflow adapters.
pub type WorkflowPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed workflow repository.
///
/// Versions are insert-only; there is no update path.
#[derive(Debug, Clone)]
pub struct PostgresWorkflowRepository {
    pool: WorkflowPgPool,
}

impl PostgresWorkflowRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkflowRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkflowRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkflowRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkflowRepositoryError::persistence)?
    }
}

#[async_trait]
impl WorkflowRepository for PostgresWorkflowRepository {
    async fn store_version(&self, definition: &WorkflowDefinition) -> WorkflowRepositoryResult<()> {
        let workflow_id = definition.id();
        let version = definition.version();
        let row = definition_to_row(definition)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(workflow_versions::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkflowRepositoryError::DuplicateVersion {
                            workflow_id,
                            version,
                        }
                    }
                    _ => WorkflowRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_version(
        &self,
        workflow_id: WorkflowId,
        version: WorkflowVersion,
    ) -> WorkflowRepositoryResult<Option<WorkflowDefinition>> {
        let version_number = version_to_column(version)?;
        self.run_blocking(move |connection| {
            let row = workflow_versions::table
                .filter(workflow_versions::workflow_id.eq(workflow_id.into_inner()))
                .filter(workflow_versions::version.eq(version_number))
                .select(WorkflowVersionRow::as_select())
                .first::<WorkflowVersionRow>(connection)
                .optional()
                .map_err(WorkflowRepositoryError::persistence)?;
            row.map(row_to_definition).transpose()
        })
        .await
    }

    async fn latest_version(
        &self,
        workflow_id: WorkflowId,
    ) -> WorkflowRepositoryResult<Option<WorkflowDefinition>> {
        self.run_blocking(move |connection| {
            let row = workflow_versions::table
                .filter(workflow_versions::workflow_id.eq(workflow_id.into_inner()))
                .order(workflow_versions::version.desc())
                .select(WorkflowVersionRow::as_select())
                .first::<WorkflowVersionRow>(connection)
                .optional()
                .map_err(WorkflowRepositoryError::persistence)?;
            row.map(row_to_definition).transpose()
        })
        .await
    }
}

fn version_to_column(version: WorkflowVersion) -> WorkflowRepositoryResult<i32> {
    i32::try_from(version.value()).map_err(WorkflowRepositoryError::persistence)
}

fn definition_to_row(definition: &WorkflowDefinition) -> WorkflowRepositoryResult<WorkflowVersionRow> {
    Ok(WorkflowVersionRow {
        workflow_id: definition.id().into_inner(),
        version: version_to_column(definition.version())?,
        space_id: definition.space_id().into_inner(),
        name: definition.name().to_owned(),
        statuses: serde_json::to_value(definition.statuses())
            .map_err(WorkflowRepositoryError::persistence)?,
        transitions: serde_json::to_value(definition.transitions())
            .map_err(WorkflowRepositoryError::persistence)?,
        digest: definition.digest().as_str().to_owned(),
        published_at: definition.published_at(),
    })
}

fn row_to_definition(row: WorkflowVersionRow) -> WorkflowRepositoryResult<WorkflowDefinition> {
    let version_number =
        u32::try_from(row.version).map_err(WorkflowRepositoryError::persistence)?;
    let version =
        WorkflowVersion::new(version_number).map_err(WorkflowRepositoryError::persistence)?;
    let statuses =
        serde_json::from_value(row.statuses).map_err(WorkflowRepositoryError::persistence)?;
    let transitions =
        serde_json::from_value(row.transitions).map_err(WorkflowRepositoryError::persistence)?;

    Ok(WorkflowDefinition::from_persisted(PersistedWorkflowData {
        id: WorkflowId::from_uuid(row.workflow_id),
        space_id: SpaceId::from_uuid(row.space_id),
        name: row.name,
        version,
        statuses,
        transitions,
        digest: WorkflowDigest::from_persisted(row.digest),
        published_at: row.published_at,
    }))
}
