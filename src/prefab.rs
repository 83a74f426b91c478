//! Ready made CSG solids used by the demo scenes.

use cgmath::Point3;

use crate::color::Color;
use crate::primitive::Primitive;
use crate::scene::Scene;

/// Unit sphere with a groove cut around its equator by a torus.
/// The carved ring is flattened and pushed outwards to float around the sphere.
pub fn carved_sphere() -> Primitive {
    let sphere = Primitive::sphere().with_color(Color::new(0.2, 0.2, 0.8));
    let torus = Primitive::torus(1.6, 0.4)
        .scale_uniform(0.75)
        .with_color(Color::new(0.8, 0.5, 0.2));
    let ring = Primitive::intersection(sphere.clone(), torus.clone()).scale(1.5, 0.5, 1.5);
    Primitive::union(Primitive::difference(sphere, torus), ring)
}

/// Spherical shell clipped by a cube with holes bored along each axis
pub fn hollow_sphere_cube() -> Primitive {
    let rod = |x, y, z| Primitive::sphere().scale(x, y, z);
    let axes = Primitive::union(
        rod(200.0, 0.55, 0.55),
        Primitive::union(rod(0.55, 200.0, 0.55), rod(0.55, 0.55, 200.0)),
    );
    let cube = Primitive::cube()
        .scale_uniform(0.7)
        .with_color(Color::new(0.2, 0.5, 0.8));
    let shell = Primitive::difference(Primitive::sphere(), Primitive::sphere().scale_uniform(0.85));
    Primitive::intersection(Primitive::difference(cube, axes), shell)
}

/// Carved sphere next to the hollow cube above a reflective floor
pub fn demo_scene() -> Scene {
    let floor = Primitive::square()
        .rotate(cgmath::Vector3::unit_x(), cgmath::Deg(-90.0))
        .scale_uniform(4.0)
        .translate(0.0, -1.2, 0.0)
        .with_color(Color::new(0.8, 0.8, 0.8))
        .with_reflectivity(0.3);
    Scene::new()
        .with_primitive(floor)
        .with_primitive(carved_sphere().translate(-1.3, 0.0, 0.0))
        .with_primitive(
            hollow_sphere_cube()
                .rotate(cgmath::Vector3::unit_y(), cgmath::Deg(30.0))
                .translate(1.3, 0.0, 0.0),
        )
        .with_light(Point3::new(-3.0, 6.0, 5.0))
        .with_light(Point3::new(4.0, 3.0, 4.0))
        .with_background(Color::new(0.1, 0.1, 0.15))
}

/// Single carved sphere lit from the front
pub fn carved_sphere_scene() -> Scene {
    Scene::new()
        .with_primitive(carved_sphere())
        .with_light(Point3::new(2.0, 5.0, 5.0))
        .with_background(Color::new(0.1, 0.1, 0.15))
}
