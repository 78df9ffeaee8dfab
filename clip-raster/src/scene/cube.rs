use nalgebra_glm::{vec2, Vec3};

use super::{Color, Mesh, Triangle};

pub const PINK: Color = Color::new(255, 192, 203, 255);
pub const YELLOW: Color = Color::new(255, 255, 0, 255);
pub const VIOLET: Color = Color::new(98, 88, 124, 255);

/// Creates a textured cube centered at the origin with 12 counter-clockwise triangles and a
/// distinct color per face. Each face maps the full texture.
///
/// # Arguments
/// * `half_size` - Half of the edge length of the cube.
/// * `angle_x` - Local rotation around the x-axis in radians.
/// * `angle_y` - Local rotation around the y-axis in radians.
pub fn create_cube(half_size: f32, angle_x: f32, angle_y: f32) -> Mesh {
    let (l, r) = (-half_size, half_size);
    let (b, t) = (-half_size, half_size);
    let (front, back) = (half_size, -half_size);

    // every face is given by its top-left, bottom-left, bottom-right and top-right corner as
    // seen from the outside of the cube
    let faces: [([Vec3; 4], Color); 6] = [
        // south
        (
            [
                Vec3::new(l, t, front),
                Vec3::new(l, b, front),
                Vec3::new(r, b, front),
                Vec3::new(r, t, front),
            ],
            PINK,
        ),
        // east
        (
            [
                Vec3::new(r, t, front),
                Vec3::new(r, b, front),
                Vec3::new(r, b, back),
                Vec3::new(r, t, back),
            ],
            Color::GREEN,
        ),
        // north
        (
            [
                Vec3::new(r, t, back),
                Vec3::new(r, b, back),
                Vec3::new(l, b, back),
                Vec3::new(l, t, back),
            ],
            Color::BLUE,
        ),
        // west
        (
            [
                Vec3::new(l, t, back),
                Vec3::new(l, b, back),
                Vec3::new(l, b, front),
                Vec3::new(l, t, front),
            ],
            Color::RED,
        ),
        // top
        (
            [
                Vec3::new(l, t, back),
                Vec3::new(l, t, front),
                Vec3::new(r, t, front),
                Vec3::new(r, t, back),
            ],
            YELLOW,
        ),
        // bottom
        (
            [
                Vec3::new(l, b, front),
                Vec3::new(l, b, back),
                Vec3::new(r, b, back),
                Vec3::new(r, b, front),
            ],
            VIOLET,
        ),
    ];

    let mut mesh = Mesh::new();
    for ([tl, bl, br, tr], color) in faces.iter() {
        mesh.add_triangle(Triangle::from_positions(tl, bl, tr, *color).with_tex_coords(
            vec2(0.0, 0.0),
            vec2(0.0, 1.0),
            vec2(1.0, 0.0),
        ));
        mesh.add_triangle(Triangle::from_positions(bl, br, tr, *color).with_tex_coords(
            vec2(0.0, 1.0),
            vec2(1.0, 1.0),
            vec2(1.0, 0.0),
        ));
    }

    mesh.rotate(angle_x, angle_y);

    mesh
}
