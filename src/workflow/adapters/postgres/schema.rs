//! Diesel schema for workflow version storage.

diesel::table! {
    /// One row per published workflow version.
    workflow_versions (workflow_id, version) {
        /// Workflow identifier.
        workflow_id -> Uuid,
        /// Version number, starting at 1.
        version -> Int4,
        /// Owning space.
        space_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Status nodes as a JSON array.
        statuses -> Jsonb,
        /// Transition edges as a JSON array.
        transitions -> Jsonb,
        /// SHA-256 digest of the canonical draft.
        #[max_length = 64]
        digest -> Varchar,
        /// Publication timestamp.
        published_at -> Timestamptz,
    }
}
