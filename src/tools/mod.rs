pub mod deepself;
pub mod normalize;
pub mod registry;
pub mod schema;
pub mod traits;
pub mod validate;

pub use registry::{Dispatch, ToolRegistry};
pub use schema::{Constraint, ParamSpec, ParamType, ParameterSchema};
pub use traits::{HostTool, Operation, Summary, ToolDefinition};
pub use validate::{validate, ValidatedArgs};
