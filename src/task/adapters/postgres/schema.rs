//! Diesel schema for task storage.

diesel::table! {
    /// Task records bound to a workflow version.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning space.
        space_id -> Uuid,
        /// Title.
        #[max_length = 500]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional assignee.
        assignee_id -> Nullable<Uuid>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Optional priority.
        #[max_length = 20]
        priority -> Nullable<Varchar>,
        /// Tag list as a JSON array.
        tags -> Jsonb,
        /// Custom-field values as a JSON object.
        custom_fields -> Jsonb,
        /// Subtasks as a JSON array.
        subtasks -> Jsonb,
        /// Bound workflow.
        workflow_id -> Uuid,
        /// Bound workflow version.
        workflow_version -> Int4,
        /// Current workflow status.
        workflow_status_id -> Uuid,
        /// Mirrored legacy simple status.
        #[max_length = 100]
        legacy_status_id -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
