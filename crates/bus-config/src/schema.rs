use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::BusConfig;

/// JSON schema for the TOML configuration, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(BusConfig)
}
