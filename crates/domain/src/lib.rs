//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod condition;
mod dynamic_logic;
mod form;
mod metadata;
mod security;
mod view;

pub use condition::{Condition, ConditionGroup, ConditionNode, ConditionOperator, LogicalOperator};
pub use dynamic_logic::{
    DynamicFieldState, EntityDynamicLogic, FieldDynamicLogic, PanelDynamicLogic,
};
pub use form::{DetailLayout, LayoutCell, LayoutPanel, LayoutSlot};
pub use metadata::{ClientDefs, EntityDefs, EntityMetadata, FieldDefinition, FieldDefinitions, FieldType};
pub use security::{
    AccessLevel, AclAction, AclData, FieldAccess, FieldAction, PermissionValue, ScopeEntry,
};
pub use view::{ColumnAlign, ListColumn, ListLayout};
