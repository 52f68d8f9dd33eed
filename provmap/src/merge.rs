use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{map::MapData, pipe::Pipe, Error};

/// Copies `owner` and `color` from `previous` onto provinces with the same
/// id. The first previous province with a given id wins. Returns how many
/// provinces were touched.
pub fn merge_edits(map: &mut MapData, previous: &MapData) -> usize {
    let mut edits: HashMap<&str, (&str, &str)> = HashMap::new();
    for province in &previous.provinces {
        edits
            .entry(province.id.as_str())
            .or_insert((province.owner.as_str(), province.color.as_str()));
    }

    let mut merged = 0;
    for province in map.provinces.iter_mut() {
        if let Some(&(owner, color)) = edits.get(province.id.as_str()) {
            province.owner = owner.to_string();
            province.color = color.to_string();
            merged += 1;
        }
    }
    merged
}

pub fn read_previous(path: impl AsRef<Path>) -> Result<MapData, Error> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

#[derive(Debug, Default)]
pub struct MergePrevious {
    previous: Option<PathBuf>,
}

impl MergePrevious {
    pub fn new(previous: Option<PathBuf>) -> Self {
        Self { previous }
    }
}

impl Pipe for MergePrevious {
    type Input = MapData;
    type Output = MapData;

    type Error = Error;

    #[tracing::instrument(skip_all, fields(previous = ?self.previous))]
    fn process(&mut self, mut input: Self::Input) -> Result<Option<Self::Output>, Self::Error> {
        let Some(path) = self.previous.as_deref() else {
            return Ok(Some(input));
        };
        if !path.exists() {
            debug!("no previous output to merge");
            return Ok(Some(input));
        }

        let previous = read_previous(path)?;
        let merged = merge_edits(&mut input, &previous);
        info!(merged, total = input.provinces.len(), "kept previous owner/color edits");
        Ok(Some(input))
    }
}
