//! Surface construction from MCNP card text.
//!
//! A card reads `NAME [TR] MNEMONIC PARAMS...`, with `$` starting a comment.
//! A leading `*` or `+` on the name (reflecting / white boundary) is
//! accepted and ignored.
//!
//! [`parse_card`] reports every failure. [`process_line`] is the lenient
//! entry point used while building a model: soft failures (codes above
//! `-100`) are replaced by a [`NullSurface`] and logged, hard failures are
//! returned.

use mcsg_kernel_math::{Point3, Vec3};

use crate::{
    ArbPoly, Axis, Cone, CylCan, Cylinder, EllipticCyl, General, MBrect, NullSurface, Plane,
    Sphere, Surface, SurfaceError,
};

/// Highest vertex count of an `arbN` body (faces are written as digits).
const ARB_MAX_VERTICES: usize = 9;

/// A parsed surface card.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCard {
    /// Surface number.
    pub name: i32,
    /// Transform number, if one was given.
    pub transform: Option<i32>,
    /// The surface.
    pub surface: Surface,
}

struct Header<'a> {
    name: i32,
    transform: Option<i32>,
    key: &'a str,
    params: Vec<&'a str>,
}

fn strip_comment(line: &str) -> &str {
    match line.find('$') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn split_card(line: &str) -> Result<Header<'_>, SurfaceError> {
    let mut tokens = strip_comment(line).split_whitespace();
    let name = tokens
        .next()
        .map(|t| t.trim_start_matches(['*', '+']))
        .and_then(|t| t.parse::<i32>().ok())
        .filter(|&n| n > 0)
        .ok_or(SurfaceError::EmptyCard)?;

    let second = tokens.next().ok_or(SurfaceError::EmptyCard)?;
    let (transform, key) = match second.parse::<i32>() {
        Ok(tr) => (Some(tr), tokens.next().ok_or(SurfaceError::EmptyCard)?),
        Err(_) => (None, second),
    };
    Ok(Header {
        name,
        transform,
        key,
        params: tokens.collect(),
    })
}

fn parse_tokens(key: &str, tokens: &[&str]) -> Result<Surface, SurfaceError> {
    let mut params = Vec::with_capacity(tokens.len());
    for t in tokens {
        match t.parse::<f64>() {
            Ok(v) => params.push(v),
            Err(_) if !is_known_key(key) => {
                return Err(SurfaceError::UnknownKey(key.to_string()))
            }
            Err(_) => return Err(SurfaceError::BadNumber(t.to_string())),
        }
    }
    parse_surface(key, &params)
}

/// Parse a numbered card, reporting every failure.
pub fn parse_card(line: &str) -> Result<SurfaceCard, SurfaceError> {
    let h = split_card(line)?;
    let surface = parse_tokens(h.key, &h.params)?;
    Ok(SurfaceCard {
        name: h.name,
        transform: h.transform,
        surface,
    })
}

/// Parse a numbered card, substituting a [`NullSurface`] on soft failure.
pub fn process_line(line: &str) -> Result<SurfaceCard, SurfaceError> {
    let h = split_card(line)?;
    let surface = match parse_tokens(h.key, &h.params) {
        Ok(s) => s,
        Err(e) if e.is_hard() => return Err(e),
        Err(e) => {
            log::warn!(
                "surface {} ({}): {} [code {}]; using null surface",
                h.name,
                h.key,
                e,
                e.code()
            );
            Surface::Null(NullSurface)
        }
    };
    Ok(SurfaceCard {
        name: h.name,
        transform: h.transform,
        surface,
    })
}

/// Parse a definition without a surface number, e.g. `"k/y 2 1 4 1"`.
pub fn parse_definition(text: &str) -> Result<Surface, SurfaceError> {
    let tokens: Vec<&str> = strip_comment(text).split_whitespace().collect();
    let (key, rest) = tokens.split_first().ok_or(SurfaceError::EmptyCard)?;
    parse_tokens(key, rest)
}

fn is_known_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    matches!(
        key.as_str(),
        "p" | "px" | "py" | "pz" | "so" | "s" | "sx" | "sy" | "sz"
            | "c/x" | "c/y" | "c/z" | "cx" | "cy" | "cz"
            | "k/x" | "k/y" | "k/z" | "kx" | "ky" | "kz"
            | "e/x" | "e/y" | "e/z" | "ex" | "ey" | "ez"
            | "sq" | "gq" | "box" | "rpp" | "rcc" | "arb"
    ) || arb_vertex_count(&key).is_some()
}

fn arb_vertex_count(key: &str) -> Option<usize> {
    let digits = key.strip_prefix("arb")?;
    if digits.is_empty() {
        return Some(8);
    }
    digits
        .parse::<usize>()
        .ok()
        .filter(|n| (4..=ARB_MAX_VERTICES).contains(n))
}

fn axis_of(key: &str) -> Result<Axis, SurfaceError> {
    key.chars()
        .last()
        .and_then(Axis::from_suffix)
        .ok_or_else(|| SurfaceError::UnknownKey(key.to_string()))
}

/// Point with coordinates `(u, v)` on the two axes other than `axis`.
fn off_axis_point(axis: Axis, u: f64, v: f64) -> Point3 {
    let (a, b) = axis.others();
    Point3::from(a.unit() * u + b.unit() * v)
}

/// Build a surface from a mnemonic and its numeric parameters.
pub fn parse_surface(key: &str, params: &[f64]) -> Result<Surface, SurfaceError> {
    let key = key.to_ascii_lowercase();
    let n = params.len();
    let expect = |counts: &[usize]| {
        if counts.contains(&n) {
            Ok(())
        } else {
            Err(SurfaceError::ParameterCount {
                key: key.clone(),
                found: n,
            })
        }
    };
    let p = params;

    let surface: Surface = match key.as_str() {
        "p" => match n {
            4 => Plane::new(Vec3::new(p[0], p[1], p[2]), p[3])?.into(),
            9 => three_point_plane(
                Point3::new(p[0], p[1], p[2]),
                Point3::new(p[3], p[4], p[5]),
                Point3::new(p[6], p[7], p[8]),
            )?
            .into(),
            _ => {
                return Err(SurfaceError::ParameterCount {
                    key: key.clone(),
                    found: n,
                })
            }
        },
        "px" | "py" | "pz" => {
            expect(&[1])?;
            Plane::along_axis(axis_of(&key)?, p[0]).into()
        }
        "so" => {
            expect(&[1])?;
            Sphere::new(Point3::origin(), p[0])?.into()
        }
        "s" => {
            expect(&[4])?;
            Sphere::new(Point3::new(p[0], p[1], p[2]), p[3])?.into()
        }
        "sx" | "sy" | "sz" => {
            expect(&[2])?;
            let centre = Point3::from(axis_of(&key)?.unit() * p[0]);
            Sphere::new(centre, p[1])?.into()
        }
        "c/x" | "c/y" | "c/z" => {
            expect(&[3])?;
            let axis = axis_of(&key)?;
            Cylinder::new(off_axis_point(axis, p[0], p[1]), axis.unit(), p[2])?.into()
        }
        "cx" | "cy" | "cz" => {
            expect(&[1])?;
            Cylinder::new(Point3::origin(), axis_of(&key)?.unit(), p[0])?.into()
        }
        "k/x" | "k/y" | "k/z" => {
            expect(&[4, 5])?;
            let flag = p.get(4).map_or(0, |f| sheet_flag(*f));
            let apex = Point3::new(p[0], p[1], p[2]);
            Cone::from_tan_sq(apex, axis_of(&key)?.unit(), p[3], flag)?.into()
        }
        "kx" | "ky" | "kz" => {
            expect(&[2, 3])?;
            let axis = axis_of(&key)?;
            let flag = p.get(2).map_or(0, |f| sheet_flag(*f));
            Cone::from_tan_sq(Point3::from(axis.unit() * p[0]), axis.unit(), p[1], flag)?.into()
        }
        "e/x" | "e/y" | "e/z" => {
            expect(&[2, 4])?;
            let axis = axis_of(&key)?;
            let (centre, a, b) = if n == 4 {
                (off_axis_point(axis, p[0], p[1]), p[2], p[3])
            } else {
                (Point3::origin(), p[0], p[1])
            };
            EllipticCyl::new(centre, axis.unit(), axis.others().0.unit(), a, b)?.into()
        }
        "ex" | "ey" | "ez" => {
            expect(&[2])?;
            let axis = axis_of(&key)?;
            EllipticCyl::new(Point3::origin(), axis.unit(), axis.others().0.unit(), p[0], p[1])?
                .into()
        }
        "sq" | "gq" => {
            expect(&[10])?;
            let mut c = [0.0; 10];
            c.copy_from_slice(p);
            if key == "sq" {
                General::from_sq(&c).into()
            } else {
                General::from_gq(&c).into()
            }
        }
        "box" => {
            expect(&[12])?;
            let v = |i: usize| Vec3::new(p[i], p[i + 1], p[i + 2]);
            MBrect::new(Point3::from(v(0)), [v(3), v(6), v(9)])?.into()
        }
        "rpp" => {
            expect(&[6])?;
            MBrect::from_bounds(Point3::new(p[0], p[2], p[4]), Point3::new(p[1], p[3], p[5]))?
                .into()
        }
        "rcc" => {
            expect(&[7])?;
            CylCan::new(
                Point3::new(p[0], p[1], p[2]),
                Vec3::new(p[3], p[4], p[5]),
                p[6],
            )?
            .into()
        }
        other => match arb_vertex_count(other) {
            Some(nv) => parse_arb(&key, nv, p)?.into(),
            None => return Err(SurfaceError::UnknownKey(key.clone())),
        },
    };
    Ok(surface)
}

fn sheet_flag(f: f64) -> i32 {
    if f > 0.0 {
        1
    } else if f < 0.0 {
        -1
    } else {
        0
    }
}

/// Plane through three points, oriented so the origin is on the negative
/// side. If the plane passes through the origin, points far along `+z`,
/// then `+y`, then `+x` decide instead.
fn three_point_plane(a: Point3, b: Point3, c: Point3) -> Result<Plane, SurfaceError> {
    let plane = Plane::from_points(&a, &b, &c)?;
    let probe = if plane.dist().abs() > mcsg_kernel_math::ZERO_TOL {
        -plane.dist()
    } else {
        let n = plane.normal();
        // far points along +z, +y, +x must land on the positive side
        [n.z, n.y, n.x]
            .into_iter()
            .find(|v| v.abs() > mcsg_kernel_math::ZERO_TOL)
            .map_or(0.0, |v| -v)
    };
    Ok(if probe > 0.0 { plane.flipped() } else { plane })
}

fn parse_arb(key: &str, nv: usize, p: &[f64]) -> Result<ArbPoly, SurfaceError> {
    let face_count = if key == "arb" {
        (p.len() == 30).then_some(6)
    } else {
        p.len().checked_sub(3 * nv).filter(|&f| f >= 4)
    };
    let Some(face_count) = face_count else {
        return Err(SurfaceError::ParameterCount {
            key: key.to_string(),
            found: p.len(),
        });
    };

    let vertices: Vec<Point3> = (0..nv)
        .map(|i| Point3::new(p[3 * i], p[3 * i + 1], p[3 * i + 2]))
        .collect();
    let mut faces = Vec::with_capacity(face_count);
    for &code in &p[3 * nv..] {
        if code.fract() != 0.0 || code < 0.0 {
            return Err(SurfaceError::BadNumber(code.to_string()));
        }
        if code == 0.0 {
            continue;
        }
        let digits = format!("{}", code as u64);
        let mut face = Vec::with_capacity(digits.len());
        for ch in digits.chars() {
            let d = ch.to_digit(10).unwrap_or(0) as usize;
            if d == 0 || d > nv {
                return Err(SurfaceError::Degenerate(format!(
                    "arb face {digits} names vertex {d}"
                )));
            }
            face.push(d - 1);
        }
        faces.push(face);
    }
    ArbPoly::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadratic::eqn_equal;
    use crate::{SurfaceKind, SurfaceOps};
    use approx::assert_abs_diff_eq;

    fn def(text: &str) -> Surface {
        parse_definition(text).unwrap()
    }

    #[test]
    fn test_planes() {
        let s = def("px 80");
        assert_eq!(s.kind(), SurfaceKind::Plane);
        assert_eq!(s.side(&Point3::new(81.0, 0.0, 0.0)), 1);
        assert!(def("p 1 0 0 80").same_surface(&s, 1e-9));
        // three points on z = 5; origin ends up on the negative side
        let t = def("p 0 0 5 1 0 5 0 1 5");
        assert_eq!(t.side(&Point3::origin()), -1);
        let u = def("p 0 0 5 0 1 5 1 0 5");
        assert!(t.same_surface(&u, 1e-9));
    }

    #[test]
    fn test_three_point_plane_through_origin() {
        // plane x = y: no z component in the normal, so +y decides
        let s = def("p 0 0 0 1 1 0 0 0 1");
        assert_eq!(s.side(&Point3::new(0.0, 100.0, 0.0)), 1);
        assert_eq!(s.side(&Point3::new(100.0, 0.0, 0.0)), -1);
        // either point order gives the same orientation
        assert!(s.same_surface(&def("p 0 0 0 0 0 1 1 1 0"), 1e-9));

        // plane x = z: +z decides
        let t = def("p 0 0 0 0 1 0 1 0 1");
        assert_eq!(t.side(&Point3::new(0.0, 0.0, 100.0)), 1);
        assert_eq!(t.side(&Point3::new(100.0, 0.0, 0.0)), -1);
        assert!(t.same_surface(&def("p 0 0 0 1 0 1 0 1 0"), 1e-9));

        // plane x = 0 through the origin: only +x is left
        let u = def("p 0 0 0 0 1 0 0 0 1");
        assert_eq!(u.side(&Point3::new(100.0, 0.0, 0.0)), 1);
    }

    #[test]
    fn test_spheres_cylinders() {
        assert_abs_diff_eq!(def("so 5.0").distance(&Point3::origin()), 5.0);
        assert_eq!(def("sy 3 1").side(&Point3::new(0.0, 3.5, 0.0)), -1);
        let c = def("c/z 3 5 50");
        assert_eq!(c.side(&Point3::new(3.0, 5.0, -100.0)), -1);
        assert_abs_diff_eq!(c.distance(&Point3::new(3.0, 60.0, 0.0)), 5.0, epsilon = 1e-12);
        let cx = def("c/x 1 2 3");
        assert_eq!(cx.side(&Point3::new(-9.0, 1.0, 2.0)), -1);
    }

    #[test]
    fn test_cones() {
        let k = def("k/y 2 1 4 1");
        let Surface::Cone(cone) = &k else {
            panic!("expected a cone");
        };
        assert_eq!(cone.cut_flag(), 1);
        assert_abs_diff_eq!(cone.centre().x, 2.0);
        let ky = def("ky 1 1");
        assert_eq!(ky.side(&Point3::new(0.0, -5.0, 0.0)), -1);
    }

    #[test]
    fn test_elliptic_round_trip() {
        let parsed = def("ez 5.0 4.0");
        let built = EllipticCyl::new(Point3::origin(), Vec3::z(), Vec3::x(), 5.0, 4.0).unwrap();
        assert!(eqn_equal(
            &parsed.base_eqn().unwrap(),
            &built.base_eqn().unwrap(),
            1e-5
        ));
        let ey = def("e/y 1.0 1.0");
        assert_eq!(ey.side(&Point3::new(0.5, 20.0, 0.5)), -1);
    }

    #[test]
    fn test_gq_sq() {
        let g = def("gq 1 1 1 0 0 0 0 0 0 -25");
        assert_abs_diff_eq!(g.distance(&Point3::new(10.0, 0.0, 0.0)), 5.0, epsilon = 1e-6);
        let s = def("sq 1 1 1 0 0 0 -25 0 0 0");
        assert!(g.same_surface(&s, 1e-9));
    }

    #[test]
    fn test_macrobodies() {
        let b = def("rpp -1 1 -2 2 -3 3");
        assert_eq!(b.kind(), SurfaceKind::MBrect);
        assert_eq!(b.side(&Point3::origin()), -1);
        let bx = def("box -1 -2 -3 2 0 0 0 4 0 0 0 6");
        assert!(b.same_surface(&bx, 1e-9));
        let r = def("rcc 0 0 0 0 0 10 2");
        assert_eq!(r.side(&Point3::new(0.0, 0.0, 11.0)), 1);
    }

    #[test]
    fn test_arb() {
        let text = "arb 0 0 0 1 0 0 1 1 0 0 1 0 0 0 1 1 0 1 1 1 1 0 1 1 \
                    1234 5678 1265 3487 2376 1485";
        let a = def(text);
        assert_eq!(a.kind(), SurfaceKind::ArbPoly);
        assert_eq!(a.side(&Point3::new(0.5, 0.5, 0.5)), -1);
        // tetrahedron
        let tet = def("arb4 0 0 0 1 0 0 0 1 0 0 0 1 123 124 134 234");
        assert_eq!(tet.side(&Point3::new(0.1, 0.1, 0.1)), -1);
        assert_eq!(tet.side(&Point3::new(1.0, 1.0, 1.0)), 1);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(parse_definition("zz 1 2").unwrap_err().code(), -101);
        assert_eq!(parse_definition("").unwrap_err().code(), -100);
        assert_eq!(parse_definition("px abc").unwrap_err().code(), -2);
        assert_eq!(parse_definition("px 1 2").unwrap_err().code(), -1);
        assert_eq!(parse_definition("so -1").unwrap_err().code(), -3);
        assert_eq!(parse_definition("qq abc").unwrap_err().code(), -101);
    }

    #[test]
    fn test_cards() {
        let c = parse_card("12 px 4.5 $ front face").unwrap();
        assert_eq!(c.name, 12);
        assert_eq!(c.transform, None);
        let t = parse_card("*7 3 cz 2").unwrap();
        assert_eq!(t.name, 7);
        assert_eq!(t.transform, Some(3));
        assert!(matches!(parse_card("px 4"), Err(SurfaceError::EmptyCard)));
        assert!(matches!(parse_card("5"), Err(SurfaceError::EmptyCard)));
    }

    #[test]
    fn test_process_line_substitutes_null() {
        let c = process_line("9 so -4").unwrap();
        assert_eq!(c.name, 9);
        assert!(c.surface.is_null());
        assert!(process_line("9 blob 1").is_err());
        assert!(process_line("9 so 4").unwrap().surface.kind() == SurfaceKind::Sphere);
    }
}
