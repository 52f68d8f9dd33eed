use crate::{
    pipe::Pipe,
    province::{BoundingBox, Province},
    svg::parse::{build_path, number_tokens},
    Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsMode {
    /// Pairs up every number found in the path text, commands ignored.
    /// Arc radii, rotations and flags leak into the result.
    #[default]
    Lexical,
    /// Interprets the path commands and measures the actual curves.
    Geometric,
}

impl BoundsMode {
    pub fn bounding_box<S: AsRef<str>>(&self, paths: &[S]) -> Option<BoundingBox> {
        match self {
            BoundsMode::Lexical => lexical_bounds(paths),
            BoundsMode::Geometric => geometric_bounds(paths),
        }
    }
}

fn coordinate(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coordinate pairs of one path string, an odd trailing number is dropped.
/// Tokens too long to fit an `f64` count as unparseable.
fn lexical_points(path: &str) -> Vec<(f64, f64)> {
    number_tokens(path)
        .chunks_exact(2)
        .filter_map(|pair| Some((coordinate(pair[0])?, coordinate(pair[1])?)))
        .collect()
}

pub fn lexical_bounds<S: AsRef<str>>(paths: &[S]) -> Option<BoundingBox> {
    BoundingBox::enclosing(paths.iter().flat_map(|path| lexical_points(path.as_ref())))
}

// lyon works in f32, keep the shortest decimal form so 0.1 stays 0.1
fn widen(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(v as f64)
}

pub fn geometric_bounds<S: AsRef<str>>(paths: &[S]) -> Option<BoundingBox> {
    BoundingBox::enclosing(
        paths
            .iter()
            .filter_map(|d| build_path(d.as_ref()))
            .filter(|path| path.iter().next().is_some())
            .flat_map(|path| {
                let aabb = lyon_algorithms::aabb::bounding_box(&path);
                [
                    (widen(aabb.min.x), widen(aabb.min.y)),
                    (widen(aabb.max.x), widen(aabb.max.y)),
                ]
            }),
    )
}

#[derive(Debug, Default)]
pub struct AttachBounds {
    mode: BoundsMode,
}

impl AttachBounds {
    pub fn new(mode: BoundsMode) -> Self {
        Self { mode }
    }
}

impl Pipe for AttachBounds {
    type Input = Vec<Province>;
    type Output = Vec<Province>;

    type Error = Error;

    #[tracing::instrument(skip(self, input), fields(mode = ?self.mode))]
    fn process(&mut self, mut input: Self::Input) -> Result<Option<Self::Output>, Self::Error> {
        for province in input.iter_mut() {
            province.bounding_box = self.mode.bounding_box(province.paths.as_slice());
            if province.bounding_box.is_none() {
                debug!(id = %province.id, "no coordinates recovered");
            }
        }
        Ok(Some(input))
    }
}
