mod operation;
mod selection;

pub use operation::{FragmentDefinition, OperationDefinition, OperationKind, VariableDefinition};
pub use selection::{FieldSelection, InlineFragmentSelection, SelectionItem, SelectionSet};
