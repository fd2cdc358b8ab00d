//! Translates the CLI flag surface into a transformation registry.
//!
//! Composition order for chains targeting the same entry: quote repair
//! first, then column add/repair, then deletion requests, which override
//! everything registered before them.

use std::collections::HashSet;

use tracing::info;

use crate::error::FixError;
use crate::registry::{Outcome, Registry};
use crate::transforms::bikes_allowed::add_bikes_allowed;
use crate::transforms::location_type::rewrite_location_type;
use crate::transforms::quotes::escape_double_quotes;

/// Fixed target of the bikes_allowed transformation.
pub const TRIPS_FILE: &str = "trips.txt";
/// Fixed target of the location_type rewrite.
pub const STOPS_FILE: &str = "stops.txt";

/// The selected transformations, decoupled from the clap structs.
#[derive(Debug, Default, Clone)]
pub struct Options {
    /// Add the `bikes_allowed` column to trips.txt.
    pub bikes_allowed: bool,
    /// Accept an existing `bikes_allowed` column and repair it instead.
    pub bikes_allowed_exists_ok: bool,
    /// Files whose stray double quotes should be escaped.
    pub escape_double_quotes: Vec<String>,
    /// Rewrite `location_type` 2 to 0 in stops.txt.
    pub change_stop_location_type: bool,
    /// Files to drop from the archive.
    pub delete: Vec<String>,
}

/// Validates the options and builds the registry the pipeline will run.
///
/// # Errors
///
/// Fails when a repeatable option names the same file twice or names a file
/// that is not a `.txt` GTFS table.
pub fn build_registry(options: &Options) -> Result<Registry, FixError> {
    validate_targets(&options.escape_double_quotes)?;
    validate_targets(&options.delete)?;

    let mut registry = Registry::new();

    // Quote repair must run before anything tries to parse the file as CSV.
    for name in &options.escape_double_quotes {
        let entry = name.clone();
        registry.register(
            name.clone(),
            Box::new(move |text| {
                let (output, escaped) = escape_double_quotes(text);
                info!(entry = %entry, escaped, "Escaped stray double quotes");
                Ok(Outcome::Continue(output))
            }),
        );
    }

    if options.bikes_allowed {
        let exists_ok = options.bikes_allowed_exists_ok;
        registry.register(
            TRIPS_FILE,
            Box::new(move |text| {
                let (output, change) = add_bikes_allowed(text, exists_ok)?;
                if change.column_added {
                    info!(
                        entry = TRIPS_FILE,
                        rows = change.rows_total,
                        "Added bikes_allowed column with all values set to allowed"
                    );
                } else {
                    info!(
                        entry = TRIPS_FILE,
                        rewritten = change.rows_changed,
                        undefined_pct = change.changed_pct(),
                        "Set undefined bikes_allowed values to allowed"
                    );
                }
                Ok(Outcome::Continue(output))
            }),
        );
    }

    if options.change_stop_location_type {
        registry.register(
            STOPS_FILE,
            Box::new(|text| {
                let (output, change) = rewrite_location_type(text)?;
                info!(
                    entry = STOPS_FILE,
                    rewritten = change.rows_changed,
                    changed_pct = change.changed_pct(),
                    "Rewrote location_type 2 to 0"
                );
                Ok(Outcome::Continue(output))
            }),
        );
    }

    // Deletion overrides whatever was registered above for the same entry.
    for name in &options.delete {
        registry.register_delete(name.clone());
    }

    Ok(registry)
}

fn validate_targets(names: &[String]) -> Result<(), FixError> {
    let mut seen = HashSet::new();
    for name in names {
        if !name.ends_with(".txt") {
            return Err(FixError::InvalidTarget(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(FixError::DuplicateTarget(name.clone()));
        }
    }
    Ok(())
}
