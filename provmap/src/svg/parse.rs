use lyon_geom::{Angle, Point, Vector};
use lyon_path::{
    traits::{Build, SvgPathBuilder},
    ArcFlags, Path,
};
use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{map, opt, recognize},
    multi::many0,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

pub fn number_token(s: &str) -> IResult<&str, &str> {
    alt((
        recognize(tuple((opt(one_of("+-")), digit0, char('.'), digit1))),
        recognize(pair(opt(one_of("+-")), digit1)),
    ))(s)
}

/// Every numeric token of `s`, leftmost first, ignoring whatever lies
/// between them (command letters, commas, exponents...).
pub fn number_tokens(mut s: &str) -> Vec<&str> {
    let mut tokens = vec![];
    while !s.is_empty() {
        match number_token(s) {
            Ok((rest, token)) => {
                tokens.push(token);
                s = rest;
            }
            Err(_) => {
                let skip = s.chars().next().map_or(1, char::len_utf8);
                s = &s[skip..];
            }
        }
    }
    tokens
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    MoveTo(Point<f32>),
    RelMoveTo(Vector<f32>),
    LineTo(Point<f32>),
    RelLineTo(Vector<f32>),
    HorizontalLineTo(f32),
    RelHorizontalLineTo(f32),
    VerticalLineTo(f32),
    RelVerticalLineTo(f32),
    QuadBezierTo {
        ctrl: Point<f32>,
        to: Point<f32>,
    },
    RelQuadBezierTo {
        ctrl: Vector<f32>,
        to: Vector<f32>,
    },
    SmoothQuadBezierTo(Point<f32>),
    RelSmoothQuadBezierTo(Vector<f32>),
    CubicBezierTo {
        ctrl1: Point<f32>,
        ctrl2: Point<f32>,
        to: Point<f32>,
    },
    RelCubicBezierTo {
        ctrl1: Vector<f32>,
        ctrl2: Vector<f32>,
        to: Vector<f32>,
    },
    SmoothCubicBezierTo {
        ctrl2: Point<f32>,
        to: Point<f32>,
    },
    RelSmoothCubicBezierTo {
        ctrl2: Vector<f32>,
        to: Vector<f32>,
    },
    ArcTo {
        radii: Vector<f32>,
        x_rotation: Angle<f32>,
        flags: ArcFlags,
        to: Point<f32>,
    },
    RelArcTo {
        radii: Vector<f32>,
        x_rotation: Angle<f32>,
        flags: ArcFlags,
        to: Vector<f32>,
    },
    Close,
}

pub fn path_to_operations(svg: &str) -> IResult<&str, Vec<Vec<Operation>>> {
    preceded(multispace0, many0(terminated(parse_op, multispace0)))(svg)
}

pub(crate) fn parse_op(s: &str) -> IResult<&str, Vec<Operation>> {
    let (s, op) = one_of("mMlLhHvVqQtTcCsSaAzZ")(s)?;
    let (s, _) = multispace0(s)?;

    match op {
        'M' => map(args(read_point), |points| {
            // extra pairs after a moveto are implicit linetos
            let mut points = points.into_iter();
            let first = points.next().map(Operation::MoveTo);
            first
                .into_iter()
                .chain(points.map(Operation::LineTo))
                .collect::<Vec<_>>()
        })(s),
        'm' => map(args(read_vector), |vectors| {
            let mut vectors = vectors.into_iter();
            let first = vectors.next().map(Operation::RelMoveTo);
            first
                .into_iter()
                .chain(vectors.map(Operation::RelLineTo))
                .collect::<Vec<_>>()
        })(s),
        'L' => args(map(read_point, Operation::LineTo))(s),
        'l' => args(map(read_vector, Operation::RelLineTo))(s),
        'H' => args(map(float, Operation::HorizontalLineTo))(s),
        'h' => args(map(float, Operation::RelHorizontalLineTo))(s),
        'V' => args(map(float, Operation::VerticalLineTo))(s),
        'v' => args(map(float, Operation::RelVerticalLineTo))(s),
        'Q' => args(map(
            tuple((read_point, comma_wsp, read_point)),
            |(ctrl, _, to)| Operation::QuadBezierTo { ctrl, to },
        ))(s),
        'q' => args(map(
            tuple((read_vector, comma_wsp, read_vector)),
            |(ctrl, _, to)| Operation::RelQuadBezierTo { ctrl, to },
        ))(s),
        'T' => args(map(read_point, Operation::SmoothQuadBezierTo))(s),
        't' => args(map(read_vector, Operation::RelSmoothQuadBezierTo))(s),
        'C' => args(map(
            tuple((read_point, comma_wsp, read_point, comma_wsp, read_point)),
            |(ctrl1, _, ctrl2, _, to)| Operation::CubicBezierTo { ctrl1, ctrl2, to },
        ))(s),
        'c' => args(map(
            tuple((read_vector, comma_wsp, read_vector, comma_wsp, read_vector)),
            |(ctrl1, _, ctrl2, _, to)| Operation::RelCubicBezierTo { ctrl1, ctrl2, to },
        ))(s),
        'S' => args(map(
            tuple((read_point, comma_wsp, read_point)),
            |(ctrl2, _, to)| Operation::SmoothCubicBezierTo { ctrl2, to },
        ))(s),
        's' => args(map(
            tuple((read_vector, comma_wsp, read_vector)),
            |(ctrl2, _, to)| Operation::RelSmoothCubicBezierTo { ctrl2, to },
        ))(s),
        'A' => args(map(
            tuple((read_arc_params, read_point)),
            |((radii, x_rotation, flags), to)| Operation::ArcTo {
                radii,
                x_rotation,
                flags,
                to,
            },
        ))(s),
        'a' => args(map(
            tuple((read_arc_params, read_vector)),
            |((radii, x_rotation, flags), to)| Operation::RelArcTo {
                radii,
                x_rotation,
                flags,
                to,
            },
        ))(s),
        // 'Z' | 'z'
        _ => Ok((s, vec![Operation::Close])),
    }
}

/// One or more argument groups separated by optional comma/whitespace.
/// Hand-rolled because the separator may match nothing (`10-20`), which
/// `separated_list1` rejects.
fn args<'a, O>(
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<O>> {
    move |s| {
        let (mut s, first) = parser(s)?;
        let mut out = vec![first];
        loop {
            let (next, _) = comma_wsp(s)?;
            match parser(next) {
                Ok((rest, item)) => {
                    out.push(item);
                    s = rest;
                }
                Err(nom::Err::Error(_)) => return Ok((s, out)),
                Err(err) => return Err(err),
            }
        }
    }
}

fn comma_wsp(s: &str) -> IResult<&str, &str> {
    recognize(tuple((multispace0, opt(char(',')), multispace0)))(s)
}

fn read_vector(s: &str) -> IResult<&str, Vector<f32>> {
    let (s, (x, _, y)) = tuple((float, comma_wsp, float))(s)?;
    Ok((s, Vector::new(x, y)))
}

fn read_point(s: &str) -> IResult<&str, Point<f32>> {
    let (s, (x, _, y)) = tuple((float, comma_wsp, float))(s)?;
    Ok((s, Point::new(x, y)))
}

fn read_flag(s: &str) -> IResult<&str, bool> {
    map(one_of("01"), |flag| flag == '1')(s)
}

/// `rx ry x-axis-rotation large-arc-flag sweep-flag`, flags may be packed
/// together (`a10 10 0 0110 10`). Rotation is in degrees.
fn read_arc_params(s: &str) -> IResult<&str, (Vector<f32>, Angle<f32>, ArcFlags)> {
    let (s, (radii, _, rotation, _, large_arc, _, sweep, _)) = tuple((
        read_vector,
        comma_wsp,
        float,
        comma_wsp,
        read_flag,
        comma_wsp,
        read_flag,
        comma_wsp,
    ))(s)?;
    Ok((
        s,
        (
            radii,
            Angle::degrees(rotation),
            ArcFlags { large_arc, sweep },
        ),
    ))
}

/// Builds a lyon path from `d`. `None` when nothing parses or the data does
/// not start with a moveto.
pub fn build_path(path_string: &str) -> Option<Path> {
    let (rest, ops) = path_to_operations(path_string).ok()?;
    if !rest.is_empty() {
        warn!(rest, "ignoring unparsed path data");
    }

    let mut ops = ops.into_iter().flatten().peekable();
    if !matches!(
        ops.peek(),
        Some(Operation::MoveTo(_) | Operation::RelMoveTo(_))
    ) {
        return None;
    }

    let mut builder = Path::svg_builder();
    for op in ops {
        match op {
            Operation::MoveTo(to) => {
                SvgPathBuilder::move_to(&mut builder, to);
            }
            Operation::RelMoveTo(to) => {
                SvgPathBuilder::relative_move_to(&mut builder, to);
            }
            Operation::LineTo(to) => {
                SvgPathBuilder::line_to(&mut builder, to);
            }
            Operation::RelLineTo(to) => {
                SvgPathBuilder::relative_line_to(&mut builder, to);
            }
            Operation::HorizontalLineTo(x) => {
                SvgPathBuilder::horizontal_line_to(&mut builder, x);
            }
            Operation::RelHorizontalLineTo(dx) => {
                SvgPathBuilder::relative_horizontal_line_to(&mut builder, dx);
            }
            Operation::VerticalLineTo(y) => {
                SvgPathBuilder::vertical_line_to(&mut builder, y);
            }
            Operation::RelVerticalLineTo(dy) => {
                SvgPathBuilder::relative_vertical_line_to(&mut builder, dy);
            }
            Operation::QuadBezierTo { ctrl, to } => {
                SvgPathBuilder::quadratic_bezier_to(&mut builder, ctrl, to);
            }
            Operation::RelQuadBezierTo { ctrl, to } => {
                SvgPathBuilder::relative_quadratic_bezier_to(&mut builder, ctrl, to);
            }
            Operation::SmoothQuadBezierTo(to) => {
                SvgPathBuilder::smooth_quadratic_bezier_to(&mut builder, to);
            }
            Operation::RelSmoothQuadBezierTo(to) => {
                SvgPathBuilder::smooth_relative_quadratic_bezier_to(&mut builder, to);
            }
            Operation::CubicBezierTo { ctrl1, ctrl2, to } => {
                SvgPathBuilder::cubic_bezier_to(&mut builder, ctrl1, ctrl2, to);
            }
            Operation::RelCubicBezierTo { ctrl1, ctrl2, to } => {
                SvgPathBuilder::relative_cubic_bezier_to(&mut builder, ctrl1, ctrl2, to);
            }
            Operation::SmoothCubicBezierTo { ctrl2, to } => {
                SvgPathBuilder::smooth_cubic_bezier_to(&mut builder, ctrl2, to);
            }
            Operation::RelSmoothCubicBezierTo { ctrl2, to } => {
                SvgPathBuilder::smooth_relative_cubic_bezier_to(&mut builder, ctrl2, to);
            }
            Operation::ArcTo {
                radii,
                x_rotation,
                flags,
                to,
            } => {
                SvgPathBuilder::arc_to(&mut builder, radii, x_rotation, flags, to);
            }
            Operation::RelArcTo {
                radii,
                x_rotation,
                flags,
                to,
            } => {
                SvgPathBuilder::relative_arc_to(&mut builder, radii, x_rotation, flags, to);
            }
            Operation::Close => SvgPathBuilder::close(&mut builder),
        }
    }
    Some(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_follow_decimal_then_integer_order() {
        assert_eq!(number_tokens("M0 0 L10 10"), vec!["0", "0", "10", "10"]);
        assert_eq!(number_tokens("m-1.5,.25l+3-4"), vec!["-1.5", ".25", "+3", "-4"]);
        // a dot with no digits after it is not part of the number
        assert_eq!(number_tokens("L1. 2"), vec!["1", "2"]);
        assert_eq!(number_tokens("1.5.5"), vec!["1.5", ".5"]);
        assert_eq!(number_tokens("1e-5"), vec!["1", "-5"]);
        assert_eq!(number_tokens("+-3"), vec!["-3"]);
        assert!(number_tokens("M Z").is_empty());
        assert!(number_tokens("").is_empty());
    }

    #[test]
    fn tokens_skip_multibyte_text() {
        assert_eq!(number_tokens("é1 ö2"), vec!["1", "2"]);
    }

    #[test]
    fn moveto_pairs_become_implicit_lines() {
        let (rest, ops) = path_to_operations("M 1,2 3 4 5,6 z").unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            ops.into_iter().flatten().collect::<Vec<_>>(),
            vec![
                Operation::MoveTo(Point::new(1.0, 2.0)),
                Operation::LineTo(Point::new(3.0, 4.0)),
                Operation::LineTo(Point::new(5.0, 6.0)),
                Operation::Close,
            ]
        );
    }

    #[test]
    fn compact_numbers_and_arc_flags() {
        let (rest, ops) = path_to_operations("m10-20h5v-5a10 10 0 0110 10Z").unwrap();
        assert!(rest.is_empty());
        let ops: Vec<_> = ops.into_iter().flatten().collect();
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[0], Operation::RelMoveTo(Vector::new(10.0, -20.0)));
        assert_eq!(ops[2], Operation::RelVerticalLineTo(-5.0));
        match &ops[3] {
            Operation::RelArcTo {
                radii, flags, to, ..
            } => {
                assert_eq!(*radii, Vector::new(10.0, 10.0));
                assert!(!flags.large_arc);
                assert!(flags.sweep);
                assert_eq!(*to, Vector::new(10.0, 10.0));
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn unparsed_tail_is_returned() {
        let (rest, ops) = path_to_operations("M0 0 L1 1 X 9 9").unwrap();
        assert_eq!(rest, "X 9 9");
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn path_must_start_with_moveto() {
        assert!(build_path("L10 10").is_none());
        assert!(build_path("").is_none());
        assert!(build_path("M0 0 L10 10").is_some());
    }
}
