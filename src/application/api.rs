//! API root
//!
//! `GraphqlApi` scans its convention root once on construction. Every
//! `register_data_source` call re-classifies that same snapshot for the new
//! data source and merges the result into the state left by earlier calls,
//! so registration order is significant.
//!
//! Files added to the root after construction are never picked up.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info};

use super::assembler::{create_unit, AppliedRegistration, IdClaims, ResolverAssembler};
use super::options::{resolve_entry, ApiOptions, LoadAllOptions, ResolverOptions};
use crate::domain::entities::Snapshot;
use crate::domain::ports::{
    Bundler, DataSourceHandle, FunctionSpec, ResolverHandle, ResourceGraph, StageHandle,
};
use crate::domain::services::grammar;
use crate::domain::services::{classify, PipelineAggregator, UnitBinding, UnitRegistry};
use crate::domain::value_objects::FieldKey;
use crate::error::{TrellisError, TrellisResult};
use crate::infrastructure::{DirectoryScanner, InMemoryResourceGraph, LocalFs};

/// API root: owns the snapshot, the per-field state and the resource graph
pub struct GraphqlApi<G: ResourceGraph = InMemoryResourceGraph> {
    options: ApiOptions,
    snapshot: Snapshot,
    aggregator: PipelineAggregator,
    units: UnitRegistry,
    data_sources: BTreeMap<String, DataSourceHandle>,
    assembler: ResolverAssembler,
    fs: LocalFs,
    graph: G,
}

impl<G: ResourceGraph> GraphqlApi<G> {
    /// Scan the discovery root and build an empty API.
    ///
    /// Fails with `DirectoryNotFound` if the root is missing, or
    /// `AmbiguousOrigin` if no root can be derived.
    pub fn new(options: ApiOptions, bundler: Box<dyn Bundler>, graph: G) -> TrellisResult<Self> {
        let root = options.discovery_root()?;
        let snapshot = DirectoryScanner::new().scan(&root)?;
        info!(root = %root.display(), entries = snapshot.len(), "Scanned resolver root");

        let assembler = ResolverAssembler::new(bundler, options.bundling);
        Ok(Self {
            options,
            snapshot,
            aggregator: PipelineAggregator::new(),
            units: UnitRegistry::new(),
            data_sources: BTreeMap::new(),
            assembler,
            fs: LocalFs::new(),
            graph,
        })
    }

    pub fn options(&self) -> &ApiOptions {
        &self.options
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn aggregator(&self) -> &PipelineAggregator {
        &self.aggregator
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn into_graph(self) -> G {
        self.graph
    }

    /// Register a data source and assemble everything the snapshot holds for it.
    ///
    /// Registering the same name again reuses the handle and creates nothing new.
    pub fn register_data_source(&mut self, name: &str) -> TrellisResult<DataSourceHandle> {
        self.register_data_source_with_report(name)
            .map(|(handle, _)| handle)
    }

    /// Like `register_data_source`, also reporting what was created
    pub fn register_data_source_with_report(
        &mut self,
        name: &str,
    ) -> TrellisResult<(DataSourceHandle, AppliedRegistration)> {
        let classification = classify(&self.snapshot, name);
        let plan = self
            .assembler
            .plan(
                name,
                &classification,
                &self.aggregator,
                &self.units,
                &self.graph,
            )?;

        let handle = self.ensure_data_source(name)?;
        let applied = self.assembler.apply(
            plan,
            &handle,
            &mut self.aggregator,
            &mut self.units,
            &mut self.graph,
        )?;

        info!(
            data_source = name,
            units = applied.units.len(),
            activated = applied.activated.len(),
            stages = applied.merged_stages,
            "Registered data source"
        );
        Ok((handle, applied))
    }

    /// Create a unit resolver from an explicit (non-discovered) handler file
    pub fn create_unit_resolver(
        &mut self,
        data_source: &DataSourceHandle,
        type_name: &str,
        field_name: &str,
        options: &ResolverOptions,
    ) -> TrellisResult<ResolverHandle> {
        let field = FieldKey::new(type_name, field_name);
        let entry = resolve_entry(
            &self.fs,
            options.entry_file.as_deref(),
            options.entry_dir.as_deref(),
            || self.options.default_dir(),
            &field.file_stem(),
        )?;

        if self.aggregator.is_active(&field) {
            return Err(TrellisError::ResolverKindConflict { field });
        }
        if !self.units.admit(&field, data_source.name(), &entry)? {
            if let Some(binding) = self.units.get(&field) {
                debug!(field = %field, "Unit resolver already created");
                return Ok(binding.handle.clone());
            }
        }
        IdClaims::new(&self.graph).resolver(&field)?;

        let code = self.assembler.bundle(&entry, options.bundling.as_ref())?;
        let handle = create_unit(&mut self.graph, data_source, &field, code)?;
        info!(
            field = %field,
            data_source = data_source.name(),
            entry = %entry.display(),
            "Created unit resolver"
        );
        self.units.insert(
            field,
            UnitBinding {
                data_source: data_source.name().to_string(),
                entry_path: entry,
                handle: handle.clone(),
            },
        );
        Ok(handle)
    }

    /// Create a standalone pipeline function from `<dir>/<name>.ts|js` or an
    /// explicit entry file. The function id is `name`.
    pub fn create_pipeline_stage(
        &mut self,
        data_source: &DataSourceHandle,
        name: &str,
        options: &ResolverOptions,
    ) -> TrellisResult<StageHandle> {
        let entry = resolve_entry(
            &self.fs,
            options.entry_file.as_deref(),
            options.entry_dir.as_deref(),
            || self.options.default_dir(),
            name,
        )?;
        IdClaims::new(&self.graph).function(name.to_string(), format!("stage '{name}'"))?;

        let code = self.assembler.bundle(&entry, options.bundling.as_ref())?;
        let handle = self.graph.create_function(FunctionSpec {
            id: name.to_string(),
            name: name.to_string(),
            data_source: data_source.clone(),
            code,
        })?;
        info!(
            stage = name,
            data_source = data_source.name(),
            entry = %entry.display(),
            "Created pipeline stage"
        );
        Ok(handle)
    }

    /// Create one unit resolver per flat `Type.field.ts|js` file in a directory.
    ///
    /// The directory defaults to the API's default directory. Subdirectories,
    /// tagged names and pipeline directories are not considered. When both
    /// extensions exist for one field, the `.ts` file is used.
    pub fn load_all_resolvers(
        &mut self,
        data_source: &DataSourceHandle,
        options: &LoadAllOptions,
    ) -> TrellisResult<Vec<ResolverHandle>> {
        let dir = match &options.entry_dir {
            Some(dir) => dir.clone(),
            None => self.options.default_dir()?,
        };
        let listing = DirectoryScanner::flat().scan(&dir)?;

        let mut found: BTreeMap<FieldKey, (usize, PathBuf)> = BTreeMap::new();
        for entry in listing.entries().iter().filter(|e| !e.is_directory()) {
            if let Some((field, ext)) = grammar::parse_flat_resolver(entry.name()) {
                let rank = ext.rank();
                let path = listing.absolute(entry);
                match found.get(&field) {
                    Some((existing, _)) if *existing <= rank => {}
                    _ => {
                        found.insert(field, (rank, path));
                    }
                }
            }
        }

        // Validate before creating anything
        let pending = {
            let mut ids = IdClaims::new(&self.graph);
            let mut pending = Vec::with_capacity(found.len());
            for (field, (_, path)) in found {
                if self.aggregator.is_active(&field) {
                    return Err(TrellisError::ResolverKindConflict { field });
                }
                if self.units.admit(&field, data_source.name(), &path)? {
                    ids.resolver(&field)?;
                    pending.push((field, path));
                }
            }
            pending
        };

        let mut bundled = Vec::with_capacity(pending.len());
        for (field, path) in pending {
            let code = self.assembler.bundle(&path, options.bundling.as_ref())?;
            bundled.push((field, path, code));
        }

        let mut handles = Vec::with_capacity(bundled.len());
        for (field, path, code) in bundled {
            let handle = create_unit(&mut self.graph, data_source, &field, code)?;
            self.units.insert(
                field,
                UnitBinding {
                    data_source: data_source.name().to_string(),
                    entry_path: path,
                    handle: handle.clone(),
                },
            );
            handles.push(handle);
        }

        info!(
            data_source = data_source.name(),
            dir = %dir.display(),
            created = handles.len(),
            "Loaded flat resolvers"
        );
        Ok(handles)
    }

    fn ensure_data_source(&mut self, name: &str) -> TrellisResult<DataSourceHandle> {
        if let Some(handle) = self.data_sources.get(name) {
            return Ok(handle.clone());
        }
        let handle = self.graph.add_data_source(name)?;
        self.data_sources.insert(name.to_string(), handle.clone());
        Ok(handle)
    }
}

impl<G: ResourceGraph> std::fmt::Debug for GraphqlApi<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlApi")
            .field("root", &self.snapshot.root())
            .field("entries", &self.snapshot.len())
            .field("pipelines", &self.aggregator.len())
            .field("units", &self.units.len())
            .finish()
    }
}
