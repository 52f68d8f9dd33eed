use std::collections::HashSet;

use roxmltree::{Document, Node, NodeId};

use crate::{
    pipe::Pipe,
    province::{Province, ProvinceKind},
    svg::{is_group, is_layer, is_path},
    Error,
};

/// Numbering for provinces whose source element has no `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvinceCounter(usize);

impl Default for ProvinceCounter {
    fn default() -> Self {
        Self(1)
    }
}

impl ProvinceCounter {
    pub fn value(&self) -> usize {
        self.0
    }

    pub fn assign(&mut self, declared: Option<&str>) -> String {
        let id = match declared {
            Some(id) => id.to_string(),
            None => format!("province_{}", self.0),
        };
        self.0 += 1;
        id
    }
}

fn path_data<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.attribute("d").filter(|d| !d.is_empty())
}

/// First pass: every group, in document order, becomes a province holding
/// all not yet claimed paths below it. Groups left with no paths are dropped.
pub fn extract_groups(
    document: &Document,
    flatten_layers: bool,
    counter: &mut ProvinceCounter,
    claimed: &mut HashSet<NodeId>,
) -> Vec<Province> {
    let mut provinces = vec![];

    for group in document.descendants().filter(is_group) {
        if flatten_layers && is_layer(&group) {
            trace!(id = ?group.attribute("id"), "skipping layer");
            continue;
        }

        let members: Vec<(NodeId, &str)> = group
            .descendants()
            .filter(|node| is_path(node) && !claimed.contains(&node.id()))
            .filter_map(|node| path_data(&node).map(|d| (node.id(), d)))
            .collect();

        if members.is_empty() {
            trace!(id = ?group.attribute("id"), "dropping group without paths");
            continue;
        }

        claimed.extend(members.iter().map(|(id, _)| *id));
        let id = counter.assign(group.attribute("id"));
        trace!("new group province: {id} ({} paths)", members.len());

        provinces.push(Province::new(
            id,
            ProvinceKind::Group,
            members.into_iter().map(|(_, d)| d.to_string()).collect(),
        ));
    }
    provinces
}

pub fn extract_singles(
    document: &Document,
    counter: &mut ProvinceCounter,
    claimed: &HashSet<NodeId>,
) -> Vec<Province> {
    document
        .descendants()
        .filter(|node| is_path(node) && !claimed.contains(&node.id()))
        .filter_map(|node| {
            let d = path_data(&node)?;
            let id = counter.assign(node.attribute("id"));
            trace!("new single province: {id}");
            Some(Province::new(id, ProvinceKind::Single, vec![d.to_string()]))
        })
        .collect()
}

pub fn extract_provinces(document: &Document, flatten_layers: bool) -> Vec<Province> {
    let mut counter = ProvinceCounter::default();
    let mut claimed = HashSet::new();

    let mut provinces = extract_groups(document, flatten_layers, &mut counter, &mut claimed);
    provinces.extend(extract_singles(document, &mut counter, &claimed));
    provinces
}

#[derive(Debug, Default)]
pub struct ExtractProvinces<'a> {
    flatten_layers: bool,
    _s: std::marker::PhantomData<&'a ()>,
}

impl<'a> ExtractProvinces<'a> {
    pub fn new(flatten_layers: bool) -> Self {
        Self {
            flatten_layers,
            _s: std::marker::PhantomData,
        }
    }
}

impl<'a> Pipe for ExtractProvinces<'a> {
    type Input = Document<'a>;
    type Output = Vec<Province>;

    type Error = Error;

    #[tracing::instrument(skip_all)]
    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, Self::Error> {
        let provinces = extract_provinces(&input, self.flatten_layers);
        debug!(
            groups = provinces.iter().filter(|p| p.kind == ProvinceKind::Group).count(),
            singles = provinces.iter().filter(|p| p.kind == ProvinceKind::Single).count(),
            "extracted provinces"
        );
        Ok(Some(provinces))
    }
}
