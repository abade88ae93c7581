//! Bundle assembly.
//!
//! A bundle arrives as a manifest (one record per physical file) and a map
//! of metadata file names to parsed JSON. Two layouts exist:
//!
//! - [`Layout::Aggregate`]: one file per category (`project.json`,
//!   `biomaterial.json`, `process.json`, `protocol.json`, `file.json`),
//!   each but the project holding a list of documents.
//! - [`Layout::PerDocument`]: one file per document, named
//!   `<schema-name>_<index>.json`.
//!
//! Both carry a `links.json` whose `links` list wires the entities together.

use std::fmt;
use std::str::FromStr;

use hca_lookup::PropertyResolver;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entity::{Entity, address};
use crate::error::{BundleError, LinkError, TypeLookupError};
use crate::link::{Direction, Link};
use crate::manifest::{ManifestEntry, parse_manifest};
use crate::registry::{Category, EntityKind};

/// What to do when a document uses a deprecated schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationPolicy {
    /// Log a warning and build the entity anyway.
    #[default]
    Warn,
    Ignore,
    /// Fail construction.
    Error,
}

impl DeprecationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Ignore => "ignore",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for DeprecationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeprecationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown deprecation policy {other:?} (expected warn, ignore or error)")),
        }
    }
}

/// How a bundle's metadata documents are split into files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Aggregate,
    PerDocument,
}

/// Aggregate file name and list key per category.
const AGGREGATE_FILES: [(Category, &str, Option<&str>); 5] = [
    (Category::Project, "project.json", None),
    (Category::Biomaterial, "biomaterial.json", Some("biomaterials")),
    (Category::Process, "process.json", Some("processes")),
    (Category::Protocol, "protocol.json", Some("protocols")),
    (Category::File, "file.json", Some("files")),
];

impl Layout {
    /// `project.json` means aggregate, `project_0.json` per-document.
    pub fn detect(metadata: &IndexMap<String, Value>) -> Result<Self, BundleError> {
        if metadata.contains_key("project.json") {
            Ok(Self::Aggregate)
        } else if metadata.contains_key("project_0.json") {
            Ok(Self::PerDocument)
        } else {
            Err(BundleError::UnrecognizedLayout)
        }
    }

    /// Groups the metadata documents by category.
    fn documents<'a>(
        self,
        metadata: &'a IndexMap<String, Value>,
    ) -> Result<IndexMap<Category, Vec<&'a Value>>, BundleError> {
        let mut grouped: IndexMap<Category, Vec<&Value>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        match self {
            Self::Aggregate => {
                for (category, file, key) in AGGREGATE_FILES {
                    let Some(content) = metadata.get(file) else {
                        continue;
                    };
                    let documents = grouped.entry(category).or_default();
                    match key {
                        None => documents.push(content),
                        Some(key) => {
                            let list = content.get(key).and_then(Value::as_array).ok_or_else(|| {
                                BundleError::InvalidCategoryFile {
                                    file: file.to_owned(),
                                    key,
                                }
                            })?;
                            documents.extend(list);
                        }
                    }
                }
            }
            Self::PerDocument => {
                for (file_name, content) in metadata {
                    let Some(schema_name) = per_document_schema(file_name) else {
                        continue;
                    };
                    let kind = EntityKind::from_schema_name(schema_name).ok_or_else(|| TypeLookupError {
                        described_by: content
                            .get("describedBy")
                            .and_then(Value::as_str)
                            .unwrap_or(schema_name)
                            .to_owned(),
                    })?;
                    grouped.entry(kind.category()).or_default().push(content);
                }
            }
        }
        Ok(grouped)
    }
}

/// Extracts `schema` from `<schema>_<digits>.json`.
fn per_document_schema(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".json")?;
    let (schema, index) = stem.rsplit_once('_')?;
    if schema.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(schema)
}

/// Builds bundles with a configurable resolver and deprecation policy.
#[derive(Debug, Clone, Default)]
pub struct BundleLoader {
    resolver: PropertyResolver,
    deprecation: DeprecationPolicy,
}

impl BundleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: PropertyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_deprecation(mut self, deprecation: DeprecationPolicy) -> Self {
        self.deprecation = deprecation;
        self
    }

    pub fn resolver(&self) -> &PropertyResolver {
        &self.resolver
    }

    pub fn deprecation(&self) -> DeprecationPolicy {
        self.deprecation
    }

    /// Builds a bundle from its manifest records and metadata files.
    ///
    /// Fails on the first invalid document or link; no partial bundle is
    /// returned.
    pub fn load(
        &self,
        uuid: &str,
        version: &str,
        manifest: &[Value],
        metadata: &IndexMap<String, Value>,
    ) -> Result<Bundle, BundleError> {
        let bundle_uuid = Uuid::parse_str(uuid).map_err(|_| BundleError::InvalidUuid(uuid.to_owned()))?;
        let manifest = parse_manifest(manifest).map_err(BundleError::InvalidManifest)?;
        let layout = Layout::detect(metadata)?;
        debug!(bundle = %bundle_uuid, ?layout, files = metadata.len(), "loading bundle");

        let mut entities: IndexMap<Uuid, Entity> = IndexMap::new();
        for (category, documents) in layout.documents(metadata)? {
            for json in documents {
                let entity = Entity::from_json_with(json, &manifest, &self.resolver, self.deprecation)?;
                if entity.category() != category {
                    debug!(entity = %entity.address(), %category, "document filed under another category");
                }
                // A repeated id replaces the earlier document and takes the
                // later document's position.
                if let Some(previous) = entities.shift_remove(&entity.document_id()) {
                    warn!(entity = %previous.address(), "duplicate document id, keeping the later document");
                }
                entities.insert(entity.document_id(), entity);
            }
        }

        let records = metadata
            .get("links.json")
            .and_then(|links| links.get("links"))
            .and_then(Value::as_array)
            .ok_or(BundleError::MissingLinks)?;
        let mut links = Vec::new();
        for record in records {
            links.extend(Link::from_json(record).map_err(BundleError::InvalidLink)?);
        }

        for link in &links {
            let source_kind = linked_kind(&entities, link.source_id)?;
            let destination_kind = linked_kind(&entities, link.destination_id)?;
            if let Some(source) = entities.get_mut(&link.source_id) {
                source.connect(link.destination_id, destination_kind, Direction::Forward)?;
            }
            if let Some(destination) = entities.get_mut(&link.destination_id) {
                destination.connect(link.source_id, source_kind, Direction::Backward)?;
            }
        }
        debug!(
            bundle = %bundle_uuid,
            entities = entities.len(),
            links = links.len(),
            "bundle assembled"
        );

        Ok(Bundle {
            uuid: bundle_uuid,
            version: version.to_owned(),
            manifest,
            entities,
            links,
        })
    }
}

/// The kind of a link endpoint, which must exist and take part in links.
fn linked_kind(entities: &IndexMap<Uuid, Entity>, id: Uuid) -> Result<EntityKind, LinkError> {
    let entity = entities.get(&id).ok_or(LinkError::UnknownEntity(id))?;
    if !entity.is_linked() {
        return Err(LinkError::NotLinkable(address(entity.kind(), id)));
    }
    Ok(entity.kind())
}

/// An immutable, fully linked bundle. Owns every entity.
#[derive(Debug, Clone)]
pub struct Bundle {
    uuid: Uuid,
    version: String,
    manifest: IndexMap<String, ManifestEntry>,
    entities: IndexMap<Uuid, Entity>,
    links: Vec<Link>,
}

impl Bundle {
    /// Builds a bundle with the default loader.
    pub fn from_json(
        uuid: &str,
        version: &str,
        manifest: &[Value],
        metadata: &IndexMap<String, Value>,
    ) -> Result<Self, BundleError> {
        BundleLoader::default().load(uuid, version, manifest, metadata)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Manifest entries keyed by file name.
    pub fn manifest(&self) -> &IndexMap<String, ManifestEntry> {
        &self.manifest
    }

    /// Every entity keyed by document id, projects first, then
    /// biomaterials, processes, protocols and files.
    pub fn entities(&self) -> &IndexMap<Uuid, Entity> {
        &self.entities
    }

    pub fn entity(&self, id: Uuid) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// The links the graph was wired from.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values().filter(move |e| e.category() == category)
    }

    pub fn projects(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.by_category(Category::Project)
    }

    pub fn biomaterials(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.by_category(Category::Biomaterial)
    }

    pub fn processes(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.by_category(Category::Process)
    }

    pub fn protocols(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.by_category(Category::Protocol)
    }

    pub fn files(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.by_category(Category::File)
    }

    pub fn specimens(&self) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|e| e.kind() == EntityKind::SpecimenFromOrganism)
            .collect()
    }

    /// Biomaterials consumed by a sequencing process.
    pub fn sequencing_input(&self) -> Vec<&Entity> {
        self.biomaterials()
            .filter(|e| {
                e.as_biomaterial()
                    .is_some_and(|b| self.any_sequencing_process(b.to_processes.keys()))
            })
            .collect()
    }

    /// Sequence files produced by a sequencing process.
    pub fn sequencing_output(&self) -> Vec<&Entity> {
        self.files()
            .filter(|e| {
                e.as_file().is_some_and(|f| {
                    f.is_sequence_file() && self.any_sequencing_process(f.from_processes.keys())
                })
            })
            .collect()
    }

    fn any_sequencing_process<'a>(&self, mut ids: impl Iterator<Item = &'a Uuid>) -> bool {
        ids.any(|id| {
            self.entity(*id)
                .and_then(Entity::as_process)
                .is_some_and(|p| p.is_sequencing_process())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ProtocolDetail;
    use crate::error::EntityError;
    use crate::fixtures::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn id(s: &str) -> Uuid {
        s.parse().unwrap()
    }

    fn load(metadata: &IndexMap<String, Value>) -> Result<Bundle, BundleError> {
        Bundle::from_json(BUNDLE, BUNDLE_VERSION, &manifest_records(), metadata)
    }

    fn ids<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Vec<Uuid> {
        entities.into_iter().map(Entity::document_id).collect()
    }

    #[test]
    fn detect_layout() {
        assert_eq!(Layout::detect(&layout_a()).unwrap(), Layout::Aggregate);
        assert_eq!(Layout::detect(&layout_b()).unwrap(), Layout::PerDocument);
        let mut metadata = layout_a();
        metadata.shift_remove("project.json");
        assert!(matches!(Layout::detect(&metadata), Err(BundleError::UnrecognizedLayout)));
    }

    #[test]
    fn per_document_file_names() {
        assert_eq!(per_document_schema("donor_organism_0.json"), Some("donor_organism"));
        assert_eq!(per_document_schema("sequence_file_12.json"), Some("sequence_file"));
        assert_eq!(per_document_schema("links.json"), None);
        assert_eq!(per_document_schema("cell_suspension_x.json"), None);
        assert_eq!(per_document_schema("_0.json"), None);
    }

    #[test]
    fn layouts_yield_the_same_roots() {
        let roots = |bundle: &Bundle| -> BTreeSet<(String, Uuid)> {
            bundle
                .root_entities()
                .values()
                .map(|e| (e.schema_name().to_string(), e.document_id()))
                .collect()
        };
        let a = load(&layout_a()).unwrap();
        let b = load(&layout_b()).unwrap();
        assert_eq!(roots(&a), roots(&b));
        assert_eq!(
            roots(&a),
            BTreeSet::from([
                ("donor_organism".to_string(), id(DONOR)),
                ("supplementary_file".to_string(), id(SUPPLEMENTARY)),
            ])
        );
        assert_eq!(a.entities().len(), b.entities().len());
    }

    #[test]
    fn bundle_accessors() {
        let bundle = load(&layout_a()).unwrap();
        assert_eq!(bundle.uuid(), id(BUNDLE));
        assert_eq!(bundle.version(), BUNDLE_VERSION);
        assert_eq!(bundle.manifest().len(), 2);
        assert_eq!(bundle.links().len(), 8);
        assert_eq!(bundle.projects().count(), 1);
        assert_eq!(bundle.biomaterials().count(), 3);
        assert_eq!(bundle.processes().count(), 3);
        assert_eq!(bundle.protocols().count(), 2);
        assert_eq!(bundle.files().count(), 2);
        let first: Vec<Category> = bundle.entities().values().map(Entity::category).take(2).collect();
        assert_eq!(first, vec![Category::Project, Category::Biomaterial]);
    }

    #[test]
    fn sequencing_views() {
        let bundle = load(&layout_b()).unwrap();
        assert_eq!(ids(bundle.sequencing_output()), vec![id(FILE)]);
        assert_eq!(ids(bundle.sequencing_input()), vec![id(SUSPENSION)]);
        assert_eq!(ids(bundle.specimens()), vec![id(SPECIMEN)]);

        let protocol = bundle.entity(id(PROTOCOL)).unwrap().as_protocol().unwrap();
        assert!(matches!(
            protocol.detail,
            ProtocolDetail::Sequencing { paired_end: Some(true), .. }
        ));
        assert_eq!(
            bundle.entity(id(PROTOCOL)).unwrap().parent_ids().collect::<Vec<_>>(),
            vec![id(SEQUENCING)]
        );
    }

    #[test]
    fn no_sequencing_without_sequencing_protocol() {
        let mut metadata = layout_b();
        let links = metadata["links.json"]["links"].as_array_mut().unwrap();
        links[2]["protocols"] = json!([]);
        let bundle = load(&metadata).unwrap();
        assert!(bundle.sequencing_output().is_empty());
        assert!(bundle.sequencing_input().is_empty());
    }

    #[test]
    fn v5_links() {
        let mut metadata = layout_a();
        metadata["links.json"] = json!({"links": [
            {"source_id": DONOR, "source_type": "biomaterial", "destination_id": PROCESS, "destination_type": "process"},
            {"source_id": PROCESS, "source_type": "process", "destination_id": SPECIMEN, "destination_type": "biomaterial"}
        ]});
        let bundle = load(&metadata).unwrap();
        let specimen = bundle.entity(id(SPECIMEN)).unwrap().as_biomaterial().unwrap();
        assert_eq!(specimen.from_processes.keys().copied().collect::<Vec<_>>(), vec![id(PROCESS)]);
        let process = bundle.entity(id(PROCESS)).unwrap().as_process().unwrap();
        assert!(process.input_biomaterials.contains_key(&id(DONOR)));
        assert!(process.output_biomaterials.contains_key(&id(SPECIMEN)));
    }

    #[test]
    fn biomaterial_cannot_reference_protocol() {
        let mut metadata = layout_a();
        metadata["links.json"] = json!({"links": [{
            "source_id": DONOR, "source_type": "biomaterial",
            "destination_id": PROTOCOL, "destination_type": "sequencing_protocol"
        }]});
        let err = load(&metadata).unwrap_err();
        let BundleError::Link(LinkError::Disallowed { entity, other, direction }) = &err else {
            panic!("unexpected {err:?}");
        };
        assert_eq!(entity, &format!("donor_organism@{DONOR}"));
        assert_eq!(other, &format!("sequencing_protocol@{PROTOCOL}"));
        assert_eq!(*direction, Direction::Forward);
        assert!(err.to_string().contains("cannot reference"));
    }

    #[test]
    fn link_endpoints_must_exist_and_be_linked() {
        let missing = "00000000-0000-4000-8000-00000000dead";
        let mut metadata = layout_a();
        metadata["links.json"] = json!({"links": [{
            "source_id": DONOR, "source_type": "biomaterial",
            "destination_id": missing, "destination_type": "process"
        }]});
        assert!(matches!(
            load(&metadata),
            Err(BundleError::Link(LinkError::UnknownEntity(u))) if u == id(missing)
        ));

        metadata["links.json"] = json!({"links": [{
            "source_id": PROJECT, "source_type": "project",
            "destination_id": PROCESS, "destination_type": "process"
        }]});
        assert!(matches!(load(&metadata), Err(BundleError::Link(LinkError::NotLinkable(_)))));
    }

    #[test]
    fn links_file_is_required() {
        let mut metadata = layout_b();
        metadata.shift_remove("links.json");
        assert!(matches!(load(&metadata), Err(BundleError::MissingLinks)));

        metadata.insert("links.json".into(), json!({"schema_type": "links"}));
        assert!(matches!(load(&metadata), Err(BundleError::MissingLinks)));
    }

    #[test]
    fn file_without_manifest_entry_fails() {
        let manifest = vec![manifest_record("protocol.pdf", "9a9a9a9a-0000-4000-8000-000000000002")];
        let err = Bundle::from_json(BUNDLE, BUNDLE_VERSION, &manifest, &layout_a()).unwrap_err();
        assert!(matches!(
            err,
            BundleError::Entity(EntityError::MissingManifestEntry { ref file_name, .. }) if file_name == "R1.fastq.gz"
        ));
    }

    #[test]
    fn missing_category_files_are_empty() {
        let metadata = IndexMap::from([
            ("project.json".to_string(), project(PROJECT)),
            ("links.json".to_string(), json!({"links": []})),
        ]);
        let bundle = load(&metadata).unwrap();
        assert_eq!(bundle.entities().len(), 1);
        assert!(bundle.root_entities().is_empty());
    }

    #[test]
    fn category_file_without_list() {
        let mut metadata = layout_a();
        metadata["biomaterial.json"] = json!({"items": []});
        assert!(matches!(
            load(&metadata),
            Err(BundleError::InvalidCategoryFile { key: "biomaterials", .. })
        ));
    }

    #[test]
    fn invalid_bundle_uuid() {
        let err = Bundle::from_json("nope", BUNDLE_VERSION, &manifest_records(), &layout_a()).unwrap_err();
        assert!(matches!(err, BundleError::InvalidUuid(ref s) if s == "nope"));
    }

    #[test]
    fn unknown_schema_in_file_name() {
        let mut metadata = layout_b();
        metadata.insert("mystery_0.json".into(), json!({"describedBy": "https://example.org/1.0.0/mystery"}));
        assert!(matches!(load(&metadata), Err(BundleError::Entity(EntityError::TypeLookup(_)))));
    }

    #[test]
    fn deprecation_policy_applies_to_every_document() {
        let mut metadata = layout_b();
        metadata.insert("sequencing_process_0.json".into(), sequencing_process(SEQUENCING));
        let loader = BundleLoader::new().with_deprecation(DeprecationPolicy::Error);
        assert!(matches!(
            loader.load(BUNDLE, BUNDLE_VERSION, &manifest_records(), &metadata),
            Err(BundleError::Entity(EntityError::Deprecated(_)))
        ));

        let loader = BundleLoader::new().with_deprecation(DeprecationPolicy::Ignore);
        let bundle = loader
            .load(BUNDLE, BUNDLE_VERSION, &manifest_records(), &metadata)
            .unwrap();
        // The later document replaces the generic process with the same id.
        assert_eq!(bundle.entity(id(SEQUENCING)).unwrap().kind(), EntityKind::SequencingProcess);
        assert_eq!(bundle.processes().count(), 3);
    }

    #[test]
    fn duplicate_document_id_keeps_the_later_document_in_its_position() {
        let mut metadata = layout_b();
        let mut later = donor(DONOR);
        later["biomaterial_core"]["biomaterial_id"] = json!("donor-2");
        metadata.insert("donor_organism_1.json".to_string(), later);

        let bundle = load(&metadata).unwrap();
        assert_eq!(bundle.entities().len(), 11);
        assert_eq!(ids(bundle.biomaterials()), vec![id(SPECIMEN), id(SUSPENSION), id(DONOR)]);
        let donor = bundle.entity(id(DONOR)).unwrap().as_biomaterial().unwrap();
        assert_eq!(donor.biomaterial_id, "donor-2");
        // Links still attach to the surviving document.
        assert_eq!(donor.to_processes.keys().copied().collect::<Vec<_>>(), vec![id(PROCESS)]);
    }

    #[test]
    fn deprecation_policy_parsing() {
        assert_eq!("ERROR".parse::<DeprecationPolicy>().unwrap(), DeprecationPolicy::Error);
        assert!("loud".parse::<DeprecationPolicy>().is_err());
        assert_eq!(DeprecationPolicy::default().to_string(), "warn");
        let parsed: DeprecationPolicy = serde_json::from_value(json!("ignore")).unwrap();
        assert_eq!(parsed, DeprecationPolicy::Ignore);
    }

    #[test]
    fn bundle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Bundle>();
        assert_send_sync::<BundleLoader>();
    }
}
