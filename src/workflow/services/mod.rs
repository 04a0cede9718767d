//! Application services for workflow publication and lookup.

mod definitions;

pub use definitions::{
    PublishWorkflowRequest, TaskSnapshot, WorkflowDefinitionService, WorkflowServiceError,
    WorkflowServiceResult,
};
