/// Objects that implement reading and writing OPC packages.
///
/// This module provides the main OpcPackage type, which represents an Open Packaging
/// Convention package in memory. Parts are owned by the package and can be
/// edited, added and removed before the package is serialized again.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PackURI, PACKAGE_URI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;

/// Upper bound for numbered partname searches.
const MAX_PARTNAME_INDEX: u32 = 100_000;

/// Main API class for working with OPC packages.
pub struct OpcPackage {
    /// Package-level relationships
    rels: Relationships,

    /// All parts in the package, indexed by partname
    parts: HashMap<String, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: HashMap::new(),
        }
    }

    /// Open an OPC package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use deckgen::ooxml::opc::package::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("templates/quarterly-review.pptx").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut phys_reader = PhysPkgReader::open(path)?;
        Self::from_phys_reader(&mut phys_reader)
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut phys_reader = PhysPkgReader::new(reader)?;
        Self::from_phys_reader(&mut phys_reader)
    }

    /// Load an OPC package from an in-memory archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_phys_reader<R: Read + Seek>(phys_reader: &mut PhysPkgReader<R>) -> Result<Self> {
        let pkg_reader = PackageReader::from_phys_reader(phys_reader)?;
        Self::unmarshal(pkg_reader)
    }

    /// Convert serialized parts and relationships into the in-memory graph.
    fn unmarshal(mut pkg_reader: PackageReader) -> Result<Self> {
        let mut package = Self::new();

        for srel in pkg_reader.pkg_srels() {
            package.rels.add_relationship(
                srel.reltype.clone(),
                srel.target_ref.clone(),
                srel.r_id.clone(),
                srel.is_external(),
            );
        }

        for spart in pkg_reader.take_sparts() {
            let mut part = PartFactory::load(spart.partname, spart.content_type, spart.blob)?;
            for srel in spart.srels {
                let is_external = srel.is_external();
                part.rels_mut().add_relationship(
                    srel.reltype,
                    srel.target_ref,
                    srel.r_id,
                    is_external,
                );
            }
            package.add_part(part);
        }

        Ok(package)
    }

    /// The main document part (presentation.xml for PowerPoint packages).
    pub fn main_document_part(&self) -> Result<&dyn Part> {
        let partname = self.main_document_partname()?;
        self.get_part(&partname)
    }

    /// Partname of the main document part.
    pub fn main_document_partname(&self) -> Result<PackURI> {
        self.rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname.as_str())
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        self.parts
            .get_mut(partname.as_str())
            .map(|b| &mut **b as &mut dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        let partname = part.partname().to_string();
        self.parts.insert(partname, part);
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname.as_str())
    }

    /// Find the next available partname for a template with a `%d`
    /// placeholder, e.g. `/ppt/slides/slide%d.xml`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        (1..=MAX_PARTNAME_INDEX)
            .map(|n| template.replace("%d", &n.to_string()))
            .find(|candidate| !self.parts.contains_key(candidate))
            .ok_or_else(|| {
                OpcError::InvalidPackUri(format!("No free partname for template '{}'", template))
            })
            .and_then(|candidate| PackURI::new(candidate).map_err(OpcError::InvalidPackUri))
    }

    /// Partnames reachable from the package relationships by following
    /// internal relationships, in breadth-first order.
    pub fn reachable_partnames(&self) -> Vec<PackURI> {
        let mut seen: HashSet<PackURI> = HashSet::new();
        let mut order = Vec::with_capacity(self.parts.len());
        let mut queue: VecDeque<PackURI> = self
            .rels
            .iter()
            .filter(|rel| !rel.is_external())
            .filter_map(|rel| rel.target_partname().ok())
            .collect();

        while let Some(partname) = queue.pop_front() {
            if !seen.insert(partname.clone()) {
                continue;
            }
            let Some(part) = self.parts.get(partname.as_str()) else {
                continue;
            };
            queue.extend(
                part.rels()
                    .iter()
                    .filter(|rel| !rel.is_external())
                    .filter_map(|rel| rel.target_partname().ok()),
            );
            order.push(partname);
        }

        order
    }

    /// Drop every part that can no longer be reached from the package
    /// relationships. Returns the number of parts removed.
    pub fn prune_unreachable(&mut self) -> usize {
        let reachable: HashSet<String> = self
            .reachable_partnames()
            .into_iter()
            .map(|uri| uri.to_string())
            .collect();

        let before = self.parts.len();
        self.parts.retain(|partname, _| reachable.contains(partname));
        let removed = before - self.parts.len();
        if removed > 0 {
            tracing::debug!(removed, "pruned unreachable parts");
        }
        removed
    }

    /// Serialize the package to an in-memory archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }

    /// Serialize the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}
