//! The checking-run driver.
//!
//! A run is two phases separated by barriers: population (a single bulk
//! writer filling the environment) and checking (one worker task per
//! definition, each owning its definition's store partition). Consumers
//! only see the store through the returned [`CheckedProgram`], so by the
//! time they can read, every writer has finished and published.

use rayon::prelude::*;
use tracing::{debug, info_span};
use vetch_checker::{TypeChecker, TypeResolutionStore};
use vetch_common::{
    CheckError, Configuration, PositionKey, QualifiedName, Source, SourceFlags, TypeSnapshot,
};
use vetch_env::Environment;
use vetch_graph::{CallGraph, CallGraphBuilder, OverrideAnalyzer, OverrideMap};

/// A completed checking run over a fixed source set.
///
/// The run-scoped context object: environment and store live exactly as
/// long as this value, and a new run starts from a fresh one - there is no
/// process-wide state.
#[derive(Debug)]
pub struct CheckedProgram {
    environment: Environment,
    store: TypeResolutionStore,
    config: Configuration,
}

impl CheckedProgram {
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn store(&self) -> &TypeResolutionStore {
        &self.store
    }

    pub fn config(&self) -> Configuration {
        self.config
    }

    /// Caller -> ordered callees for one checked source.
    pub fn call_graph(&self, source: &Source) -> CallGraph {
        CallGraphBuilder::new(&self.environment, &self.store).of_source(source)
    }

    /// Base method -> immediate overriders for the classes reachable from
    /// one source.
    pub fn overrides(&self, source: &Source) -> OverrideMap {
        OverrideAnalyzer::new(&self.environment).overrides_of_source(source)
    }

    /// The (program point, snapshot) records of one definition, or `None`
    /// if it was not checked in this run.
    pub fn resolutions(
        &self,
        define: &QualifiedName,
    ) -> Option<Vec<(PositionKey, TypeSnapshot)>> {
        self.store.get(define)
    }
}

/// Run a full checking pass over `sources`.
///
/// Population must fully complete before checking starts, and checking must
/// fully complete before the store is readable; both barriers are this
/// function's control flow. Definitions are checked in parallel - bindings
/// never cross a definition boundary and the store is partitioned by
/// definition name, so workers share no mutable state.
pub fn check_program(
    sources: &[Source],
    config: &Configuration,
) -> Result<CheckedProgram, CheckError> {
    let _span = info_span!("check_program", sources = sources.len()).entered();

    let environment = Environment::populate(sources)?;
    let store = TypeResolutionStore::new();

    let work = checkable_defines(&environment, sources, config);
    debug!(defines = work.len(), "checking definitions");
    work.par_iter().try_for_each(|(define, task_config)| {
        TypeChecker::new(&environment, task_config, &store).check_define(define)
    })?;

    Ok(CheckedProgram {
        environment,
        store,
        config: *config,
    })
}

/// The definitions whose bodies participate in this run, each paired with
/// its effective configuration: everything from checkable sources, or
/// nothing in a declaration-only run. A source flagged for debugging gets
/// per-statement traces even when the run as a whole does not.
fn checkable_defines(
    environment: &Environment,
    sources: &[Source],
    config: &Configuration,
) -> Vec<(std::sync::Arc<vetch_env::Define>, Configuration)> {
    if config.declare {
        return Vec::new();
    }
    let mut work = Vec::new();
    for source in sources {
        if !source.is_checkable() {
            debug!(module = %source.module, "declaration-only source, bodies skipped");
            continue;
        }
        let task_config = Configuration {
            debug: config.debug || source.flags.contains(SourceFlags::DEBUG),
            ..*config
        };
        for define in environment.defines_of_source(source) {
            work.push((define, task_config));
        }
    }
    work
}
