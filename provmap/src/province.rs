use serde::{Deserialize, Serialize};

pub const DEFAULT_OWNER: &str = "neutral";
pub const DEFAULT_COLOR: &str = "#CCCCCC";

const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvinceKind {
    Group,
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl BoundingBox {
    pub fn from_extrema(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
        }
    }

    pub fn enclosing(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let (min_x, min_y, max_x, max_y) = points.fold((x, y, x, y), |(x0, y0, x1, y1), (x, y)| {
            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
        });
        Some(Self::from_extrema(min_x, min_y, max_x, max_y))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub color: String,
    pub paths: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ProvinceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl Province {
    pub fn new(id: String, kind: ProvinceKind, paths: Vec<String>) -> Self {
        Self {
            name: display_name(&id),
            id,
            owner: DEFAULT_OWNER.to_string(),
            color: DEFAULT_COLOR.to_string(),
            paths,
            kind,
            bounding_box: None,
        }
    }

    /// Copy with the path data cut down for console display.
    pub fn preview(&self) -> Self {
        let mut preview = self.clone();
        if let Some(first) = self.paths.first() {
            let mut paths = vec![format!(
                "{}...",
                first.chars().take(PREVIEW_CHARS).collect::<String>()
            )];
            if self.paths.len() > 1 {
                paths.push(format!("... and {} more paths", self.paths.len() - 1));
            }
            preview.paths = paths;
        }
        preview
    }
}

/// `northern_gaul` -> `Northern Gaul`.
pub fn display_name(id: &str) -> String {
    title_case(&id.replace('_', " "))
}

/// A word starts after any uncased character (digits, punctuation, CJK).
/// Its first letter takes the titlecase form, the rest are lower-cased.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_cased = false;
    for c in s.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            push_titlecase(&mut out, c);
        }
        previous_cased = is_cased(c);
    }
    out
}

// letters with a distinct single-character titlecase form
const DIGRAPHS: [[char; 3]; 4] = [
    ['Ǆ', 'ǅ', 'ǆ'],
    ['Ǉ', 'ǈ', 'ǉ'],
    ['Ǌ', 'ǋ', 'ǌ'],
    ['Ǳ', 'ǲ', 'ǳ'],
];

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase() || DIGRAPHS.iter().any(|forms| forms[1] == c)
}

fn push_titlecase(out: &mut String, c: char) {
    if let Some(forms) = DIGRAPHS.iter().find(|forms| forms.contains(&c)) {
        out.push(forms[1]);
        return;
    }
    // `ß` -> `SS` -> `Ss`
    let mut upper = c.to_uppercase();
    out.extend(upper.next());
    out.extend(upper.flat_map(char::to_lowercase));
}
