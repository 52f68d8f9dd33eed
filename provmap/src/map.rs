use serde::{Deserialize, Serialize};

use crate::{pipe::Pipe, province::Province, Error};

pub const MAP_DATA_TYPE: &str = "map_data";
pub const COORDINATE_SYSTEM: &str = "SVG";
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub source_svg: String,
    pub coordinate_system: String,
    pub provinces_count: usize,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub metadata: Metadata,
    pub provinces: Vec<Province>,
}

impl MapData {
    pub fn new(source_svg: impl Into<String>, provinces: Vec<Province>) -> Self {
        Self {
            metadata: Metadata {
                kind: MAP_DATA_TYPE.to_string(),
                source_svg: source_svg.into(),
                coordinate_system: COORDINATE_SYSTEM.to_string(),
                provinces_count: provinces.len(),
                version: FORMAT_VERSION.to_string(),
            },
            provinces,
        }
    }
}

#[derive(Debug)]
pub struct AssembleMap {
    source_svg: String,
}

impl AssembleMap {
    pub fn new(source_svg: impl Into<String>) -> Self {
        Self {
            source_svg: source_svg.into(),
        }
    }
}

impl Pipe for AssembleMap {
    type Input = Vec<Province>;
    type Output = MapData;

    type Error = Error;

    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, Self::Error> {
        Ok(Some(MapData::new(std::mem::take(&mut self.source_svg), input)))
    }
}
