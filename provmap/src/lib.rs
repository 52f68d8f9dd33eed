#[macro_use]
extern crate tracing;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

pub mod bounds;
pub mod extract;
pub mod map;
pub mod merge;
pub mod pipe;
pub mod province;
pub mod ser;
pub mod svg;

pub use bounds::BoundsMode;
pub use map::{MapData, Metadata};
pub use province::{BoundingBox, Province, ProvinceKind};

use crate::{
    bounds::AttachBounds,
    extract::ExtractProvinces,
    map::AssembleMap,
    merge::MergePrevious,
    pipe::{Pipe, Producer},
    ser::WriteMapData,
    svg::{ParseSvg, SvgError},
};

pub const OUTPUT_SUFFIX: &str = "_data.json";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("svg file `{}` not found", .0.display())]
    InputNotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Svg(#[from] SvgError),
    #[error("map data (de)serialization failed")]
    Json(#[from] serde_json::Error),
    #[error("pipeline swallowed the document")]
    NoMapData,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub bounds: BoundsMode,
    pub flatten_layers: bool,
    /// Keep `owner`/`color` edits from an existing output file.
    pub merge: bool,
}

/// `maps/europe.svg` -> `maps/europe_data.json`.
pub fn output_path(input: impl AsRef<Path>) -> PathBuf {
    let mut name = OsString::from(input.as_ref().with_extension(""));
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

pub fn source_name(input: impl AsRef<Path>) -> String {
    input
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn provinces_from(
    content: &str,
    source_svg: String,
    options: &Options,
    sink: impl Pipe<Input = MapData, Output = MapData, Error = Error>,
) -> Result<MapData, Error> {
    let mut pipes = std::iter::once(content).feed(
        ParseSvg::default()
            .pipe(ExtractProvinces::new(options.flatten_layers))
            .pipe(AttachBounds::new(options.bounds))
            .pipe(AssembleMap::new(source_svg))
            .pipe(sink),
    );

    pipes.produce().ok_or(Error::NoMapData)?
}

fn read_input(input: &Path) -> Result<String, Error> {
    if !input.is_file() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }
    Ok(std::fs::read_to_string(input)?)
}

/// Parses SVG text into map data without touching the filesystem.
pub fn read_map_str(
    content: &str,
    source_svg: impl Into<String>,
    options: &Options,
) -> Result<MapData, Error> {
    provinces_from(content, source_svg.into(), options, Identity)
}

pub fn read_map(input: impl AsRef<Path>, options: &Options) -> Result<MapData, Error> {
    let input = input.as_ref();
    let content = read_input(input)?;
    provinces_from(&content, source_name(input), options, Identity)
}

/// The whole conversion: read `input`, extract, optionally merge with the
/// previous `output`, write `output`. Returns what was written.
#[tracing::instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn svg2provinces(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &Options,
) -> Result<MapData, Error> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let content = read_input(input)?;

    let sink = MergePrevious::new(options.merge.then(|| output.to_path_buf()))
        .pipe(WriteMapData::new(output));

    provinces_from(&content, source_name(input), options, sink)
}

#[derive(Debug, Default)]
struct Identity;

impl Pipe for Identity {
    type Input = MapData;
    type Output = MapData;

    type Error = Error;

    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, Self::Error> {
        Ok(Some(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_sits_next_to_input() {
        assert_eq!(output_path("EuropeSPD.svg"), PathBuf::from("EuropeSPD_data.json"));
        assert_eq!(
            output_path("maps/europe.v2.svg"),
            PathBuf::from("maps/europe.v2_data.json")
        );
        assert_eq!(output_path("noext"), PathBuf::from("noext_data.json"));
    }

    #[test]
    fn source_name_is_base_name() {
        assert_eq!(source_name("maps/europe.svg"), "europe.svg");
        assert_eq!(source_name("europe.svg"), "europe.svg");
    }

    #[test]
    fn scenario_group_and_single() {
        let map = read_map_str(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <g id="gaul"><path d="M0 0 L10 10"/><path d="M5 5 L20 20"/></g>
                 <path id="rome" d="M1 2 L3 4"/>
                 <path d=""/>
               </svg>"#,
            "test.svg",
            &Options::default(),
        )
        .unwrap();

        assert_eq!(map.metadata.provinces_count, 2);
        assert_eq!(map.metadata.source_svg, "test.svg");

        let gaul = &map.provinces[0];
        assert_eq!((gaul.id.as_str(), gaul.name.as_str()), ("gaul", "Gaul"));
        assert_eq!(gaul.kind, ProvinceKind::Group);
        assert_eq!(
            gaul.bounding_box,
            Some(BoundingBox::from_extrema(0.0, 0.0, 20.0, 20.0))
        );

        let rome = &map.provinces[1];
        assert_eq!(rome.kind, ProvinceKind::Single);
        assert_eq!(
            rome.bounding_box,
            Some(BoundingBox {
                min_x: 1.0,
                min_y: 2.0,
                max_x: 3.0,
                max_y: 4.0,
                center_x: 2.0,
                center_y: 3.0,
            })
        );
    }

    #[test]
    fn malformed_svg_is_fatal() {
        for content in [
            "<svg><g><path d=\"M0 0\"/></svg>",
            "",
            "this is a plain text file, not xml",
            r#"<svg xmlns="http://www.w3.org/2000/svg"/><path id="x" d="M0 0"/>"#,
        ] {
            let err = read_map_str(content, "bad.svg", &Options::default()).unwrap_err();
            assert!(matches!(err, Error::Svg(_)), "{content:?}: {err:?}");
        }
    }

    #[test]
    fn markup_inside_attributes_is_data() {
        let map = read_map_str(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="a&amp;b" title="x>y" d="M0 0 L2 2"/></svg>"#,
            "test.svg",
            &Options::default(),
        )
        .unwrap();
        assert_eq!(map.metadata.provinces_count, 1);
        assert_eq!(map.provinces[0].id, "a&b");
        assert_eq!(map.provinces[0].name, "A&B");
    }

    #[test]
    fn not_xml_leaves_previous_output_alone() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.svg");
        std::fs::write(&input, "this is a plain text file, not xml").unwrap();
        let output = output_path(&input);
        std::fs::write(&output, "edited").unwrap();

        let options = Options {
            merge: true,
            ..Options::default()
        };
        let err = svg2provinces(&input, &output, &options).unwrap_err();
        assert!(matches!(err, Error::Svg(_)), "{err:?}");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "edited");
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.svg");
        let output = output_path(&input);

        let err = svg2provinces(&input, &output, &Options::default()).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(ref path) if *path == input));
        assert!(!output.exists());
    }
}
