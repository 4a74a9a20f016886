//! Built-in validation rules
//!
//! Each rule lives in its own file and implements one of the rule traits:
//! - `SdlRule` - checks type system definitions, optionally against a schema
//! - `DocumentRule` - checks executable documents against a schema

mod no_deprecated;
mod unique_directive_names;
mod unique_type_names;

pub use no_deprecated::NoDeprecatedRuleImpl;
pub use unique_directive_names::UniqueDirectiveNamesRuleImpl;
pub use unique_type_names::UniqueTypeNamesRuleImpl;
