use log::{debug, error, trace};
use nalgebra_glm::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

use crate::{
    clipper::clip_triangles_by_all_planes,
    math::{ndc_to_window, perspective_divide, signed_area_2d},
    rasterizer::{
        draw_triangle_wireframe, fill_affine_textured_triangle, fill_perspective_textured_triangle,
        fill_triangle, DepthBuffer, Frame, ScreenVertex, Texture,
    },
    Color, Error, Mesh, Result, StatsNode, StatsNodeTrait, Triangle,
};

/// The way the inside of the triangles is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Every triangle is filled with its flat color.
    Solid,

    /// Texture coordinates are interpolated linearly in screen space.
    Affine,

    /// Texture coordinates are interpolated perspective correct.
    #[default]
    Perspective,
}

impl RenderMode {
    /// Returns a short lowercase name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Solid => "solid",
            RenderMode::Affine => "affine",
            RenderMode::Perspective => "perspective",
        }
    }

    /// Returns true if the mode samples a texture.
    #[inline]
    pub fn is_textured(&self) -> bool {
        !matches!(self, RenderMode::Solid)
    }
}

/// The snapshot of all switches that influence how a frame is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub mode: RenderMode,

    /// Draws the outline of each rasterized triangle on top of the fill.
    pub wireframe: bool,

    /// Skips triangles that are clockwise after projection.
    pub backface_culling: bool,

    /// Enables the depth test. Only used by [`RenderMode::Perspective`].
    pub depth_test: bool,

    pub wireframe_color: Color,

    /// The color the frame is cleared to before rendering.
    pub clear_color: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Perspective,
            wireframe: false,
            backface_culling: true,
            depth_test: true,
            wireframe_color: Color::MAGENTA,
            clear_color: Color::BLACK,
        }
    }
}

/// Resulting stats about the rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// The number of triangles of the rendered meshes.
    pub num_triangles: usize,

    /// The number of triangles that remained after clipping.
    pub num_clipped: usize,

    /// The number of triangles removed by backface culling.
    pub num_culled: usize,

    /// The number of triangles passed to the rasterizer.
    pub num_rasterized: usize,
}

impl std::ops::Add<Self> for RenderStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            num_triangles: self.num_triangles + rhs.num_triangles,
            num_clipped: self.num_clipped + rhs.num_clipped,
            num_culled: self.num_culled + rhs.num_culled,
            num_rasterized: self.num_rasterized + rhs.num_rasterized,
        }
    }
}

impl std::ops::AddAssign<Self> for RenderStats {
    fn add_assign(&mut self, rhs: Self) {
        self.num_triangles += rhs.num_triangles;
        self.num_clipped += rhs.num_clipped;
        self.num_culled += rhs.num_culled;
        self.num_rasterized += rhs.num_rasterized;
    }
}

/// Renders meshes into an owned frame and depth buffer.
pub struct Renderer {
    frame: Frame,
    depth_buffer: DepthBuffer,

    stats_transform: StatsNode,
    stats_clip: StatsNode,
    stats_raster: StatsNode,
}

impl Renderer {
    /// Creates a new renderer.
    ///
    /// # Arguments
    /// * `width` - The width of the frame in pixels.
    /// * `height` - The height of the frame in pixels.
    /// * `stats` - The stats node into which the renderer registers all its times.
    pub fn new(width: usize, height: usize, stats: StatsNode) -> Self {
        Self {
            frame: Frame::new_empty(width, height),
            depth_buffer: DepthBuffer::new(width, height),
            stats_transform: stats.get_child("transform"),
            stats_clip: stats.get_child("clip"),
            stats_raster: stats.get_child("raster"),
        }
    }

    /// Returns the frame of the last rendering.
    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Returns the depth buffer of the last rendering.
    #[inline]
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    /// Clears the frame and the depth buffer and renders the given mesh.
    ///
    /// # Arguments
    /// * `mesh` - The mesh to render.
    /// * `mvp` - The model-view-projection matrix that maps the mesh into clip space.
    /// * `texture` - The texture for the textured render modes.
    /// * `settings` - The settings for this frame.
    pub fn render(
        &mut self,
        mesh: &Mesh,
        mvp: &Mat4,
        texture: Option<&dyn Texture>,
        settings: &RenderSettings,
    ) -> Result<RenderStats> {
        let texture = match (settings.mode.is_textured(), texture) {
            (true, None) => {
                error!(
                    "Render mode {} requires a texture",
                    settings.mode.name()
                );
                return Err(Error::MissingTexture);
            }
            (true, Some(texture)) => Some(texture),
            (false, _) => None,
        };

        self.frame.clear(settings.clear_color);
        self.depth_buffer.clear();

        let mut stats = RenderStats {
            num_triangles: mesh.len(),
            ..Default::default()
        };

        let clip_space: Vec<Triangle> = {
            let _t = self.stats_transform.register_timing();
            mesh.triangles().iter().map(|t| t.transformed(mvp)).collect()
        };

        let clipped = {
            let _t = self.stats_clip.register_timing();
            clip_triangles_by_all_planes(&clip_space)
        };
        stats.num_clipped = clipped.len();

        {
            let _t = self.stats_raster.register_timing();

            for triangle in clipped.iter() {
                if self.rasterize_triangle(triangle, texture, settings) {
                    stats.num_rasterized += 1;
                } else {
                    stats.num_culled += 1;
                }
            }
        }

        debug!(
            "Rendered {} triangles: {} after clipping, {} culled",
            stats.num_triangles, stats.num_clipped, stats.num_culled
        );

        Ok(stats)
    }

    /// Projects the clipped triangle onto the frame and rasterizes it. Returns false if the
    /// triangle has been culled.
    ///
    /// # Arguments
    /// * `triangle` - The triangle in clip space, i.e., within the view frustum.
    /// * `texture` - The texture, which must be present for the textured render modes.
    /// * `settings` - The settings for this frame.
    fn rasterize_triangle(
        &mut self,
        triangle: &Triangle,
        texture: Option<&dyn Texture>,
        settings: &RenderSettings,
    ) -> bool {
        let ndc = triangle.vertices.map(|v| perspective_divide(&v.pos));

        if settings.backface_culling {
            let [p0, p1, p2] = ndc.map(|p| Vec2::new(p.x(), p.y()));
            if signed_area_2d(&p0, &p1, &p2) < 0f32 {
                trace!("Culled triangle {:?}", triangle.vertices);
                return false;
            }
        }

        let width = self.frame.get_width() as f32;
        let height = self.frame.get_height() as f32;

        let mut screen = [ScreenVertex::default(); 3];
        for ((s, p), v) in screen.iter_mut().zip(ndc.iter()).zip(triangle.vertices.iter()) {
            let window = ndc_to_window(p, width, height);
            *s = ScreenVertex::new(window.x, window.y, v.u(), v.v(), p.w());
        }

        let points = screen.map(|s| Vec2::new(s.x, s.y));

        match (settings.mode, texture) {
            (RenderMode::Affine, Some(texture)) => {
                fill_affine_textured_triangle(&mut self.frame, &screen, texture);
            }
            (RenderMode::Perspective, Some(texture)) => {
                let depth_buffer = if settings.depth_test {
                    Some(&mut self.depth_buffer)
                } else {
                    None
                };

                fill_perspective_textured_triangle(&mut self.frame, &screen, texture, depth_buffer);
            }
            _ => {
                fill_triangle(&mut self.frame, &points, triangle.color);
            }
        }

        if settings.wireframe {
            draw_triangle_wireframe(&mut self.frame, &points, settings.wireframe_color);
        }

        true
    }
}

#[cfg(test)]
mod test {
    use nalgebra_glm::{perspective, translate, Vec3};

    use crate::{create_cube, ImageTexture, Stats, PINK};

    use super::*;

    const SIZE: usize = 128;

    /// Returns the model-view-projection matrix of a camera at the origin looking along -z onto
    /// an object moved by the given z offset.
    fn create_mvp(z: f32) -> Mat4 {
        let projection = perspective(1f32, 90f32.to_radians(), 0.1, 1000.0);

        projection * translate(&Mat4::identity(), &Vec3::new(0.0, 0.0, z))
    }

    fn create_renderer() -> Renderer {
        Renderer::new(SIZE, SIZE, Stats::new_root())
    }

    fn create_texture() -> ImageTexture {
        ImageTexture::checkerboard(64, 8, Color::WHITE, Color::BLUE).unwrap()
    }

    /// Returns the number of pixels that differ from the given clear color.
    fn count_drawn_pixels(frame: &Frame, clear_color: Color) -> usize {
        frame
            .get_pixels()
            .chunks_exact(4)
            .filter(|p| *p != clear_color.to_bytes())
            .count()
    }

    #[test]
    fn test_render_solid_cube() {
        let mut renderer = create_renderer();
        let cube = create_cube(64.0, 0.0, 0.0);
        let settings = RenderSettings {
            mode: RenderMode::Solid,
            ..Default::default()
        };

        let stats = renderer
            .render(&cube, &create_mvp(-200.0), None, &settings)
            .unwrap();

        assert_eq!(stats.num_triangles, 12);
        assert_eq!(stats.num_clipped, 12);
        assert_eq!(stats.num_culled + stats.num_rasterized, stats.num_clipped);
        assert!(stats.num_culled >= 6);

        // the face towards the camera covers the center of the frame
        assert_eq!(renderer.frame().get_pixel(45, 60), PINK);
        assert_eq!(renderer.frame().get_pixel(80, 80), PINK);
        assert_eq!(renderer.frame().get_pixel(2, 2), Color::BLACK);
    }

    #[test]
    fn test_backface_culling_reduces_work() {
        let mut renderer = create_renderer();
        let cube = create_cube(64.0, 0.4, 0.7);
        let texture = create_texture();

        let culled = renderer
            .render(
                &cube,
                &create_mvp(-200.0),
                Some(&texture),
                &RenderSettings::default(),
            )
            .unwrap();

        let settings = RenderSettings {
            backface_culling: false,
            ..Default::default()
        };
        let not_culled = renderer
            .render(&cube, &create_mvp(-200.0), Some(&texture), &settings)
            .unwrap();

        assert_eq!(not_culled.num_culled, 0);
        assert_eq!(not_culled.num_rasterized, 12);
        assert!(culled.num_rasterized < not_culled.num_rasterized);
    }

    #[test]
    fn test_depth_test_keeps_nearest_face() {
        let mut renderer = create_renderer();
        let cube = create_cube(64.0, 0.0, 0.0);
        let texture = create_texture();
        let settings = RenderSettings {
            backface_culling: false,
            ..Default::default()
        };

        renderer
            .render(&cube, &create_mvp(-200.0), Some(&texture), &settings)
            .unwrap();

        // the front face is at a distance of 200 - 64 from the camera
        let depth = renderer.depth_buffer().get(45, 60);
        assert!((depth - 136.0).abs() < 0.5, "Depth is {}", depth);

        let depth = renderer.depth_buffer().get(2, 2);
        assert_eq!(depth, DepthBuffer::EMPTY);
    }

    #[test]
    fn test_missing_texture() {
        let mut renderer = create_renderer();
        let cube = create_cube(64.0, 0.0, 0.0);

        for mode in [RenderMode::Affine, RenderMode::Perspective] {
            let settings = RenderSettings {
                mode,
                ..Default::default()
            };

            let result = renderer.render(&cube, &create_mvp(-200.0), None, &settings);
            assert!(matches!(result, Err(Error::MissingTexture)));
        }
    }

    #[test]
    fn test_triangle_behind_camera() {
        let mut renderer = create_renderer();

        let mesh: Mesh = [Triangle::from_positions(
            &Vec3::new(-10.0, -10.0, 50.0),
            &Vec3::new(10.0, -10.0, 50.0),
            &Vec3::new(0.0, 10.0, 50.0),
            Color::RED,
        )]
        .into_iter()
        .collect();

        let settings = RenderSettings {
            mode: RenderMode::Solid,
            backface_culling: false,
            ..Default::default()
        };
        let stats = renderer
            .render(&mesh, &create_mvp(0.0), None, &settings)
            .unwrap();

        assert_eq!(stats.num_clipped, 0);
        assert_eq!(count_drawn_pixels(renderer.frame(), Color::BLACK), 0);
    }

    #[test]
    fn test_triangle_through_near_plane() {
        let mut renderer = create_renderer();
        let texture = create_texture();

        // a floor reaching from behind the camera into the distance
        let mesh: Mesh = [
            Triangle::from_positions(
                &Vec3::new(-50.0, -10.0, 20.0),
                &Vec3::new(50.0, -10.0, 20.0),
                &Vec3::new(0.0, -10.0, -300.0),
                Color::RED,
            )
            .with_tex_coords(
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.5, 4.0),
            ),
        ]
        .into_iter()
        .collect();

        let settings = RenderSettings {
            backface_culling: false,
            ..Default::default()
        };
        let stats = renderer
            .render(&mesh, &create_mvp(0.0), Some(&texture), &settings)
            .unwrap();

        assert!(stats.num_clipped >= 1);
        assert!(count_drawn_pixels(renderer.frame(), Color::BLACK) > 0);

        // every written depth lies between the near and the far plane
        for depth in renderer.depth_buffer().depths() {
            if *depth != DepthBuffer::EMPTY {
                assert!(*depth >= 0.09 && *depth <= 1000.1, "Depth {}", depth);
            }
        }
    }

    #[test]
    fn test_wireframe_overlay() {
        let mut renderer = create_renderer();
        let cube = create_cube(64.0, 0.3, 0.3);
        let texture = create_texture();
        let settings = RenderSettings {
            mode: RenderMode::Affine,
            wireframe: true,
            ..Default::default()
        };

        renderer
            .render(&cube, &create_mvp(-200.0), Some(&texture), &settings)
            .unwrap();

        let num_wire_pixels = renderer
            .frame()
            .get_pixels()
            .chunks_exact(4)
            .filter(|p| *p == Color::MAGENTA.to_bytes())
            .count();
        assert!(num_wire_pixels > 100);
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let mut renderer = create_renderer();
        let cube = create_cube(64.0, 0.0, 0.0);
        let settings = RenderSettings {
            mode: RenderMode::Solid,
            clear_color: Color::GREEN,
            ..Default::default()
        };

        renderer
            .render(&cube, &create_mvp(-200.0), None, &settings)
            .unwrap();
        assert!(count_drawn_pixels(renderer.frame(), Color::GREEN) > 0);

        // the cube is out of sight
        renderer
            .render(&cube, &create_mvp(2000.0), None, &settings)
            .unwrap();
        assert_eq!(count_drawn_pixels(renderer.frame(), Color::GREEN), 0);
        assert!(renderer
            .depth_buffer()
            .depths()
            .iter()
            .all(|d| *d == DepthBuffer::EMPTY));
    }

    #[test]
    fn test_render_stats_sum() {
        let a = RenderStats {
            num_triangles: 1,
            num_clipped: 2,
            num_culled: 3,
            num_rasterized: 4,
        };

        let mut b = a + a;
        assert_eq!(b.num_clipped, 4);

        b += a;
        assert_eq!(
            b,
            RenderStats {
                num_triangles: 3,
                num_clipped: 6,
                num_culled: 9,
                num_rasterized: 12,
            }
        );
    }
}
