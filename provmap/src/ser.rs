use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::{map::MapData, pipe::Pipe, Error};

/// Pretty-printed JSON with two-space indentation.
pub fn write_map(mut writer: impl Write, map: &MapData) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, map)?;
    writer.flush()?;
    Ok(())
}

/// Writes the map document to a file and passes it on.
#[derive(Debug)]
pub struct WriteMapData {
    path: PathBuf,
}

impl WriteMapData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Pipe for WriteMapData {
    type Input = MapData;

    type Output = MapData;

    type Error = Error;

    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, Self::Error> {
        info!(
            "Writing {} provinces to {}",
            input.provinces.len(),
            self.path.display()
        );
        let file = std::fs::File::create(&self.path)?;
        write_map(BufWriter::new(file), &input)?;
        Ok(Some(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::province::{BoundingBox, Province, ProvinceKind};

    #[test]
    fn writes_indented_document() {
        let mut gaul = Province::new("gaul".into(), ProvinceKind::Group, vec!["M0 0".into()]);
        gaul.bounding_box = Some(BoundingBox::from_extrema(0.0, 0.0, 20.0, 20.0));
        let map = MapData::new("map.svg", vec![gaul]);

        let mut out = vec![];
        write_map(&mut out, &map).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("{\n  \"metadata\": {\n    \"type\": \"map_data\","));
        assert!(text.contains("\n      \"bounding_box\": {\n        \"min_x\": 0.0,"));
        assert!(text.contains("\"center_x\": 10.0"));

        let back: MapData = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn file_appears_only_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_data.json");

        let mut writer = WriteMapData::new(&path);
        assert!(!path.exists());

        let map = MapData::new(
            "map.svg",
            vec![Province::new("rome".into(), ProvinceKind::Single, vec!["M1 2".into()])],
        );
        let passed = writer.process(map.clone()).unwrap().unwrap();
        assert_eq!(passed, map);

        let written: MapData =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, map);
    }
}
