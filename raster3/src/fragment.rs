//! Fragment shader: lights fragment colors and writes the final pixels.

use glam::{Mat4, Vec3, Vec4};

use crate::{
    canvas::Canvas,
    raster::{Fragment, FragmentColors},
    types::{AmbientLight, Color, PointLight, Scene},
    vertex::PolygonView,
};

/// Lambertian factor, `max(0, n . l)`.
pub fn lambert(normal: Vec3, light_direction: Vec3) -> f32 {
    normal.dot(light_direction).max(0.0)
}

/// Multiplies each normalized channel of `color` by the matching channel of
/// `light`, clamping to 1.0 before scaling back to `0..=255`.
pub fn apply_light(color: Color, light: Vec4) -> Color {
    Color::from_normalized(color.to_normalized() * light)
}

#[derive(Debug, Clone)]
struct ViewPointLight {
    /// View space position.
    position: Vec3,
    /// Normalized color times intensity.
    factor: Vec4,
    light: PointLight,
}

/// Scene lights prepared for one frame.
#[derive(Debug, Clone)]
pub struct Lighting {
    ambient: Vec4,
    point_lights: Vec<ViewPointLight>,
}

impl Lighting {
    pub fn ambient_only(ambient: AmbientLight) -> Self {
        Self {
            ambient: ambient.color.to_normalized() * ambient.intensity,
            point_lights: Vec::new(),
        }
    }

    /// Moves the scene's point lights into view space.
    pub fn new(scene: &Scene, view: Mat4) -> Self {
        let point_lights = scene
            .point_lights
            .iter()
            .map(|light| ViewPointLight {
                position: view.transform_point3(light.position),
                factor: light.color.to_normalized() * light.intensity,
                light: light.clone(),
            })
            .collect();

        Self {
            point_lights,
            ..Self::ambient_only(scene.ambient)
        }
    }

    pub fn ambient(&self) -> Vec4 {
        self.ambient
    }

    /// Ambient plus every point light, seen from a surface at `position` facing `normal` (view space).
    pub fn at(&self, position: Vec3, normal: Vec3) -> Vec4 {
        self.point_lights.iter().fold(self.ambient, |total, point| {
            let to_light = point.position - position;
            let distance = to_light.length();
            let Some(direction) = to_light.try_normalize() else {
                return total;
            };
            total + point.factor * point.light.attenuation(distance) * lambert(normal, direction)
        })
    }
}

/// Writes fragments to the canvas.
pub struct FragmentShader<'a> {
    lighting: &'a Lighting,
    polygons: &'a [PolygonView],
    point_lights: bool,
}

impl<'a> FragmentShader<'a> {
    /// `polygons` is the frame's polygon table that [`Fragment::polygon`] indexes.
    /// With `point_lights` off only the ambient light is applied.
    pub fn new(lighting: &'a Lighting, polygons: &'a [PolygonView], point_lights: bool) -> Self {
        Self {
            lighting,
            polygons,
            point_lights,
        }
    }

    fn light_for(&self, fragment: &Fragment) -> Vec4 {
        match fragment.polygon.and_then(|index| self.polygons.get(index)) {
            Some(polygon) if self.point_lights => self.lighting.at(polygon.center, polygon.normal),
            _ => self.lighting.ambient(),
        }
    }

    /// Lights and writes every fragment in order, so later fragments win.
    pub fn shade(&self, canvas: &mut Canvas, fragments: &[Fragment]) {
        profiling::scope!("FragmentShader::shade");

        for fragment in fragments {
            let light = self.light_for(fragment);
            match &fragment.colors {
                FragmentColors::Flat(color) => {
                    let color = apply_light(*color, light);
                    for coord in &fragment.coords {
                        canvas.put_pixel(coord.x, coord.y, color);
                    }
                }
                FragmentColors::Gradient(_) => {
                    for (coord, color) in fragment.iter() {
                        canvas.put_pixel(coord.x, coord.y, apply_light(color, light));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;

    #[test]
    fn ambient_scales_and_clamps() {
        let color = Color::new(200, 100, 50, 255);

        let half = Lighting::ambient_only(AmbientLight {
            color: Color::WHITE,
            intensity: 0.5,
        });
        assert_eq!(apply_light(color, half.ambient()), Color::new(100, 50, 25, 128));

        let double = Lighting::ambient_only(AmbientLight {
            color: Color::WHITE,
            intensity: 2.0,
        });
        assert_eq!(apply_light(color, double.ambient()), Color::new(255, 200, 100, 255));

        let red = Lighting::ambient_only(AmbientLight {
            color: Color::RED,
            intensity: 1.0,
        });
        assert_eq!(apply_light(color, red.ambient()), Color::new(200, 0, 0, 255));
    }

    #[test]
    fn point_light_falloff_and_facing() {
        let mut scene = Scene::new();
        scene.ambient.intensity = 0.0;
        let mut light = PointLight::new(Vec3::new(0.0, 0.0, 2.0), Color::WHITE, 1.0);
        light.linear = 0.5;
        scene.add_point_light(light);

        let lighting = Lighting::new(&scene, Mat4::IDENTITY);

        // 1 / (1 + 0.5 * 2), facing the light head on
        let facing = lighting.at(Vec3::ZERO, Vec3::Z);
        assert!((facing - Vec4::splat(0.5)).abs().max_element() < 1e-6);

        let away = lighting.at(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(away, Vec4::ZERO);

        assert_eq!(lambert(Vec3::X, Vec3::Y), 0.0);
    }

    #[test]
    fn shade_writes_in_order() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        let lighting = Lighting::ambient_only(AmbientLight::default());
        let fragments = [
            Fragment {
                coords: vec![IVec2::new(0, 0), IVec2::new(1, 0)],
                colors: FragmentColors::Flat(Color::RED),
                polygon: None,
            },
            Fragment {
                coords: vec![IVec2::new(1, 0), IVec2::new(5, 5)],
                colors: FragmentColors::Gradient(vec![Color::BLUE, Color::GREEN]),
                polygon: None,
            },
        ];

        FragmentShader::new(&lighting, &[], true).shade(&mut canvas, &fragments);

        assert_eq!(canvas.pixel(0, 0), Some(Color::RED));
        assert_eq!(canvas.pixel(1, 0), Some(Color::BLUE));
    }

    #[test]
    fn point_lights_only_reach_polygon_fragments() {
        let mut scene = Scene::new();
        scene.ambient.intensity = 0.25;
        scene.add_point_light(PointLight::new(Vec3::new(0.0, 0.0, 1.0), Color::WHITE, 0.5));
        let lighting = Lighting::new(&scene, Mat4::IDENTITY);
        let polygons = [PolygonView {
            primitive: 0,
            normal: Vec3::Z,
            center: Vec3::ZERO,
        }];

        let fragment = Fragment {
            coords: vec![IVec2::ZERO],
            colors: FragmentColors::Flat(Color::WHITE),
            polygon: None,
        };

        let mut canvas = Canvas::new(2, 2).unwrap();
        let shader = FragmentShader::new(&lighting, &polygons, true);
        shader.shade(&mut canvas, &[fragment.clone()]);
        assert_eq!(canvas.pixel(0, 0), Some(Color::new(64, 64, 64, 64)));

        shader.shade(&mut canvas, &[fragment.clone().with_polygon(0)]);
        assert_eq!(canvas.pixel(0, 0), Some(Color::new(191, 191, 191, 191)));

        FragmentShader::new(&lighting, &polygons, false).shade(&mut canvas, &[fragment.with_polygon(0)]);
        assert_eq!(canvas.pixel(0, 0), Some(Color::new(64, 64, 64, 64)));
    }
}
