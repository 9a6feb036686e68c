use std::collections::BTreeSet;

use tracing::{debug, instrument};

use relay_model::{GlobalParams, Property, TaskIdentity, TaskParams, VarPool};

use crate::{CacheError, placeholder::placeholder_names};

/// Render the cache-relevant input variables of a task canonically.
///
/// Steps:
/// 1. collect the relevant names: local params declared `IN` plus every `${name}` referenced in `raw_parameter_text`;
/// 2. start from the upstream pool and append globals whose name is not present yet (upstream wins);
/// 3. keep `IN` entries whose name is relevant;
/// 4. sort by name (stable) and serialize as a compact JSON array.
///
/// Duplicate names surviving the filter are a caller defect; their relative order is whatever the merged pool had.
#[instrument(level = "debug", skip_all, fields(task = %identity))]
pub fn resolve_input_variables(
    identity: &TaskIdentity,
    declared_local_params: &[Property],
    raw_parameter_text: &str,
    upstream_var_pool: &VarPool,
    global_params: &GlobalParams,
) -> Result<String, CacheError> {
    let mut relevant: BTreeSet<&str> = declared_local_params
        .iter()
        .filter(|p| p.is_input())
        .map(|p| p.prop.as_str())
        .collect();
    relevant.extend(placeholder_names(raw_parameter_text));

    let mut pool: Vec<&Property> = upstream_var_pool.iter().collect();
    let fillers: Vec<&Property> = global_params
        .iter()
        .filter(|(name, _)| !upstream_var_pool.contains(name))
        .map(|(_, p)| p)
        .collect();
    pool.extend(fillers);

    let mut inputs: Vec<&Property> = pool
        .into_iter()
        .filter(|p| p.is_input() && relevant.contains(p.prop.as_str()))
        .collect();
    inputs.sort_by(|a, b| a.prop.cmp(&b.prop));

    debug!(
        relevant = relevant.len(),
        selected = inputs.len(),
        "input variables resolved"
    );
    Ok(serde_json::to_string(&inputs)?)
}

/// Parse raw task parameter text, then resolve its input variables.
///
/// Malformed text fails before anything else is looked at.
pub fn resolve_from_task_params(
    identity: &TaskIdentity,
    raw_parameter_text: &str,
    upstream_var_pool: &VarPool,
    global_params: &GlobalParams,
) -> Result<String, CacheError> {
    let params = TaskParams::parse(raw_parameter_text)?;
    resolve_input_variables(
        identity,
        params.local_params(),
        params.raw(),
        upstream_var_pool,
        global_params,
    )
}
