use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeDelta};
use rand::RngExt;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracecop_core::trace::types::AccessMode;
use typed_builder::TypedBuilder;

use crate::log::ProcessLog;

const MICROS_PER_SEC: i64 = 1_000_000;

#[derive(Clone, Debug, Default, Deserialize, Serialize, TypedBuilder)]
pub struct GeneratorParams {
    pub id: u64,
    /// Process ids are drawn from `1..=n_process`.
    pub n_process: u64,
    /// Records per generated trace.
    pub n_record: u64,
    /// Resources are drawn from a pool named `res0 .. res{n_resource - 1}`.
    pub n_resource: u64,
    /// Upper bound on resources per record, duplicates included.
    pub max_resources: u64,
    /// Every record starts within this many seconds of the trace origin.
    pub horizon_secs: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GeneratedTrace {
    params: GeneratorParams,
    info: String,
    start: DateTime<Local>,
    end: DateTime<Local>,
    logs: Vec<ProcessLog>,
}

impl GeneratedTrace {
    #[must_use]
    pub const fn get_id(&self) -> u64 {
        self.params.id
    }

    #[must_use]
    pub fn get_logs(&self) -> &[ProcessLog] {
        &self.logs
    }

    #[must_use]
    pub fn into_logs(self) -> Vec<ProcessLog> {
        self.logs
    }

    #[must_use]
    pub const fn get_params(&self) -> &GeneratorParams {
        &self.params
    }

    #[must_use]
    pub fn get_duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Generate one trace of `params.n_record` random executions.
///
/// Each record gets a process id from `1..=n_process`, a start within
/// `horizon_secs` of `origin` at microsecond resolution, a run time of at most
/// a quarter of the horizon, up to `max_resources` resources from the pool
/// (repeats allowed, as real producers emit them) and a uniformly chosen
/// access mode. Every record satisfies `start <= end`.
///
/// A zero `n_process` yields an empty trace; a zero `n_resource` yields
/// records without resources.
#[must_use]
pub fn generate_single_trace(params: &GeneratorParams, origin: NaiveDateTime) -> Vec<ProcessLog> {
    if params.n_process == 0 {
        return Vec::new();
    }

    let mut random_generator = rand::rng();
    let horizon = i64::from(params.horizon_secs) * MICROS_PER_SEC;
    let max_resources = if params.n_resource == 0 {
        0
    } else {
        params.max_resources
    };

    (0..params.n_record)
        .map(|_| {
            let pid = random_generator.random_range(1..=params.n_process);
            let offset = random_generator.random_range(0..=horizon);
            let length = random_generator.random_range(0..=horizon / 4);
            let start = origin + TimeDelta::microseconds(offset);
            let end = start + TimeDelta::microseconds(length);

            let n_resources = random_generator.random_range(0..=max_resources);
            let resources = (0..n_resources)
                .map(|_| {
                    let index = random_generator.random_range(0..params.n_resource);
                    format!("res{index}")
                })
                .collect();

            let mode = match random_generator.random_range(0..3u8) {
                0 => AccessMode::Read,
                1 => AccessMode::Write,
                _ => AccessMode::None,
            };

            ProcessLog {
                pid,
                start,
                end,
                resources,
                mode,
            }
        })
        .collect()
}

/// Generate `n_trace` traces in parallel, numbered `0..n_trace`, each with
/// the other fields of `params`. Each trace starts at the wall-clock time its
/// generation began.
#[must_use]
pub fn generate_mult_traces(n_trace: u64, params: &GeneratorParams) -> Vec<GeneratedTrace> {
    (0..n_trace)
        .into_par_iter()
        .map(|id| {
            let params = GeneratorParams {
                id,
                ..params.clone()
            };
            let start_time = Local::now();
            let logs = generate_single_trace(&params, start_time.naive_local());
            let end_time = Local::now();
            GeneratedTrace {
                params,
                info: "generated".to_string(),
                start: start_time,
                end: end_time,
                logs,
            }
        })
        .collect()
}
