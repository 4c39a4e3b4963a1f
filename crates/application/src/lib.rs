//! Application services and ports.

#![forbid(unsafe_code)]

mod acl_resolver;
mod condition_evaluator;
mod dynamic_logic_service;
mod entity_view_service;
mod layout_composer;
mod schema_generator;
mod session_service;
mod view_ports;

pub use acl_resolver::{AclResolver, FieldPermissions};
pub use condition_evaluator::{evaluate, evaluate_at, is_empty_value, value_by_path};
pub use dynamic_logic_service::{
    EntityDynamicState, evaluate_entity, evaluate_entity_at, evaluate_field, evaluate_field_at,
};
pub use entity_view_service::EntityViewService;
pub use layout_composer::{
    CellPlan, ColumnPlan, DetailComposition, DetailPlan, ListComposition, ListPlan, PanelPlan,
    RowArrangement, RowPlan, SlotPlan, compose_detail, compose_list, default_detail_layout,
    default_list_layout,
};
pub use schema_generator::{
    EntitySchemaOptions, EntityValidator, FieldValidator, SYSTEM_FIELDS, ValidationOutcome,
    generate_entity_schema, generate_field_schema, validate_entity_data, validate_field_value,
};
pub use session_service::{SessionService, SessionSnapshot};
pub use view_ports::{EntityLayout, LayoutKind, MetadataSource, SessionPayload, SessionSource};
