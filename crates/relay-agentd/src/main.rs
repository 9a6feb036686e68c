mod config;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use taskvisor::{
    BackoffPolicy, SupervisorConfig, JitterPolicy, RestartPolicy, Supervisor, TaskSpec,
};
use tracing::{debug, info};

use relay_cache::{Fingerprinter, generate_tag_cache_key, resolve_from_task_params, revert_cache_key};
use relay_core::DriverContext;
use relay_exec::{RemoteRunner, ScriptedProvider};
use relay_model::{GlobalParams, TaskIdentity, VarPool};
use relay_observe::init_logger;
use relay_prometheus::PrometheusMetrics;

use crate::config::AgentConfig;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // 1) config + logger
    let cfg = AgentConfig::load()?;
    init_logger(&cfg.logger.clone().with_env_overrides()?)?;
    info!(digest = %cfg.digest, "agent starting");

    // 2) cache fingerprint
    let task = &cfg.task;
    let identity = TaskIdentity::new(task.code, task.version, task.cache);
    let upstream = VarPool::from_json(&task.var_pool).context("upstream var pool")?;
    let globals: GlobalParams = task.globals.iter().cloned().collect();

    let resolved = resolve_from_task_params(&identity, &task.params, &upstream, &globals)?;
    let key = Fingerprinter::from_name(&cfg.digest)?.cache_key(&identity, &resolved);
    let tag = generate_tag_cache_key(task.source_task_id, key.as_str());
    info!(task = %identity, cache_key = %key.as_str(), tag = %tag, "cache key computed");
    debug!(inputs = %resolved, reverted = %revert_cache_key(Some(&tag)), "fingerprint inputs");

    // 3) driver context
    let metrics = PrometheusMetrics::new()?;
    let ctx = DriverContext::default()
        .with_config(cfg.driver.clone())
        .with_metrics(Arc::new(metrics.clone()));

    // 4) remote task on the scripted provider
    let provider = Arc::new(ScriptedProvider::completing("scripted"));
    let runner = RemoteRunner::new("scripted", provider, ctx).with_globals(globals);
    let remote = runner.build_task(&task.params)?;

    // 5) supervise until the task is done
    let spec = TaskSpec::new(
        remote,
        RestartPolicy::Never,
        BackoffPolicy {
            first: Duration::ZERO,
            max: Duration::ZERO,
            jitter: JitterPolicy::None,
            factor: 1.0,
        },
        Some(Duration::from_millis(cfg.task_timeout_ms)),
    );
    let sup = Supervisor::builder(SupervisorConfig::default()).build();
    sup.run(vec![spec])
        .await
        .map_err(|e| anyhow::anyhow!("supervisor exited with error: {e}"))?;

    info!(metrics = %metrics.encode_text()?, "agent finished");
    Ok(())
}
