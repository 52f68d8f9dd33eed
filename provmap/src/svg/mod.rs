pub mod parse;

use roxmltree::{Document, Node, ParsingOptions};

use crate::{pipe::Pipe, Error};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("malformed svg: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Well-formed XML only: exactly one root element, no stray text around it.
/// Entities in attribute values are decoded.
pub fn parse_document(text: &str) -> Result<Document<'_>, SvgError> {
    // Inkscape and Illustrator exports carry a DOCTYPE
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    Ok(Document::parse_with_options(text, options)?)
}

pub fn is_group(node: &Node) -> bool {
    node.is_element() && node.has_tag_name((SVG_NS, "g"))
}

pub fn is_path(node: &Node) -> bool {
    node.is_element() && node.has_tag_name((SVG_NS, "path"))
}

pub fn is_layer(node: &Node) -> bool {
    node.attribute((INKSCAPE_NS, "groupmode")) == Some("layer")
}

#[derive(Debug, Default)]
pub struct ParseSvg<'a> {
    _s: std::marker::PhantomData<&'a ()>,
}

impl<'a> Pipe for ParseSvg<'a> {
    type Input = &'a str;
    type Output = Document<'a>;

    type Error = Error;

    #[tracing::instrument(skip_all, fields(len = input.len()))]
    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, Self::Error> {
        let document = parse_document(input)?;
        debug!(nodes = document.descendants().count(), "parsed svg");
        Ok(Some(document))
    }
}
