use cgmath::prelude::*;
use cgmath::{Deg, Point3, Vector3};

use rusty_csg_tracer::float::*;
use rusty_csg_tracer::primitive::trace_scene;
use rusty_csg_tracer::{prefab, CsgOp, Intersections, Primitive, Ray};

fn operands() -> Vec<(Primitive, Primitive)> {
    vec![
        (
            Primitive::sphere(),
            Primitive::cube().scale_uniform(0.7).translate(0.5, 0.2, 0.0),
        ),
        (
            Primitive::cube().rotate(Vector3::new(1.0, 1.0, 0.0), Deg(30.0)),
            Primitive::torus(1.6, 0.4).scale_uniform(0.6),
        ),
        (
            Primitive::sphere().scale(1.5, 0.5, 1.0),
            Primitive::sphere().translate(0.0, 0.4, 0.0),
        ),
    ]
}

/// Rays fanning out from a point away from every operand
fn rays() -> Vec<Ray> {
    let orig = Point3::new(0.31, 0.17, 6.0);
    let mut rays = Vec::new();
    for i in 0..9 {
        for j in 0..9 {
            let target = Point3::new(-1.6 + 0.4 * i.to_float(), -1.6 + 0.4 * j.to_float(), 0.0);
            rays.push(Ray::from_point(orig, target));
        }
    }
    rays
}

fn sorted_ts(hits: &Intersections) -> Vec<Float> {
    let mut list = hits.clone().sorted();
    std::iter::from_fn(|| list.pop()).map(|h| h.t).collect()
}

#[test]
fn crossings_are_even_and_bounded() {
    for (a, b) in operands() {
        for ray in rays() {
            let n_a = trace_scene(&a, &ray).len();
            let n_b = trace_scene(&b, &ray).len();
            assert_eq!(n_a % 2, 0);
            assert_eq!(n_b % 2, 0);
            for &op in &[CsgOp::Union, CsgOp::Intersection, CsgOp::Difference] {
                let csg = Primitive::csg(op, a.clone(), b.clone());
                let n = trace_scene(&csg, &ray).len();
                assert_eq!(n % 2, 0, "{:?} gave {} crossings", op, n);
                assert!(n <= n_a + n_b);
            }
        }
    }
}

#[test]
fn union_nearest_is_nearest_operand() {
    for (a, b) in operands() {
        let union = Primitive::union(a.clone(), b.clone());
        for ray in rays() {
            let t_a = trace_scene(&a, &ray).nearest().map(|h| h.t);
            let t_b = trace_scene(&b, &ray).nearest().map(|h| h.t);
            let t_u = trace_scene(&union, &ray).nearest().map(|h| h.t);
            let expected = match (t_a, t_b) {
                (Some(ta), Some(tb)) => Some(ta.min(tb)),
                (ta, tb) => ta.or(tb),
            };
            match (t_u, expected) {
                (Some(tu), Some(te)) => assert!((tu - te).abs() < 1e-9),
                (None, None) => (),
                other => panic!("union mismatch {:?}", other),
            }
        }
    }
}

#[test]
fn difference_with_disjoint_operand_is_unchanged() {
    let a = Primitive::sphere();
    let b = Primitive::sphere().translate(5.0, 0.0, 0.0);
    let difference = Primitive::difference(a.clone(), b);
    for ray in rays() {
        let expected = sorted_ts(&trace_scene(&a, &ray));
        let found = sorted_ts(&trace_scene(&difference, &ray));
        assert_eq!(expected.len(), found.len());
        for (e, f) in expected.iter().zip(&found) {
            assert!((e - f).abs() < 1e-9);
        }
    }
}

#[test]
fn intersection_with_itself_keeps_the_surface() {
    let a = Primitive::sphere().scale(1.0, 2.0, 1.0);
    let both = Primitive::intersection(a.clone(), a.clone());
    for ray in rays() {
        let expected = sorted_ts(&trace_scene(&a, &ray));
        let found = sorted_ts(&trace_scene(&both, &ray));
        assert_eq!(expected.len(), found.len());
        for (e, f) in expected.iter().zip(&found) {
            assert!((e - f).abs() < 1e-9);
        }
    }
}

#[test]
fn difference_normals_face_out_of_the_result() {
    let difference = Primitive::difference(
        Primitive::cube(),
        Primitive::sphere().scale_uniform(0.8).translate(0.0, 0.0, 1.0),
    );
    for ray in rays() {
        let dir = ray.dir.normalize();
        let list = trace_scene(&difference, &ray).sorted();
        // Alternating entry and exit along the ray
        for (i, hit) in list.iter().enumerate() {
            let facing = hit.normal.dot(dir);
            if i % 2 == 0 {
                assert!(facing < 0.0, "entry {} faces away", i);
            } else {
                assert!(facing > 0.0, "exit {} faces towards", i);
            }
        }
    }
}

#[test]
fn nested_prefab_has_even_crossings() {
    let solid = prefab::hollow_sphere_cube().rotate(Vector3::unit_y(), Deg(20.0));
    for ray in rays() {
        assert_eq!(trace_scene(&solid, &ray).len() % 2, 0);
    }
}

#[test]
fn rays_skimming_a_cube_edge_cross_evenly() {
    let cube = Primitive::cube();
    let difference = Primitive::difference(
        Primitive::cube(),
        Primitive::sphere().translate(5.0, 0.0, 0.0),
    );
    for k in -5..=5 {
        let x = 1.0 + 1e-6 * k.to_float() - 0.006;
        let ray = Ray::new(Point3::new(x, 0.3, 5.0), Vector3::new(0.001, 0.0, -1.0));
        let n = trace_scene(&cube, &ray).len();
        assert!(n == 0 || n == 2, "{} crossings at x = {}", n, x);
        assert_eq!(trace_scene(&difference, &ray).len() % 2, 0);
    }
}
