use anyhow::{ensure, Context};
use glam::{Mat4, Vec3};
use raster3::types::{Camera, CameraProjection, Color, Handedness, Instance, ModelBuilder, Polygon, Transformation};
use raster3_test::{count_pixels, pixel, TestRunner};

#[test]
pub fn triangle() -> anyhow::Result<()> {
    // (handedness, clockwise, visible)
    let tests = [
        (Handedness::Left, true, true),
        (Handedness::Left, false, false),
        (Handedness::Right, true, false),
        (Handedness::Right, false, true),
    ];

    let color = Color::rgb(64, 128, 192);

    for (handedness, clockwise, visible) in tests {
        let mut runner = TestRunner::builder().handedness(handedness).build()?;

        let mut builder = ModelBuilder::new(vec![
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(-0.5, -0.5, 0.0),
        ])
        .with_polygon(Polygon::new([0, 1, 2], color));
        if clockwise {
            builder = builder.with_flip_winding_order();
        }
        let model = builder.build().context("Failed to create model")?;

        runner
            .scene
            .add_instance(Instance::new(model.into(), Transformation::IDENTITY));
        runner.set_camera_data(Camera {
            projection: CameraProjection::Raw(Mat4::IDENTITY),
            view: Mat4::IDENTITY,
        });

        let (frame, stats) = runner.render_frame()?;

        let expected: [u8; 4] = if visible { color.into() } else { [0; 4] };
        ensure!(
            pixel(&frame, 0, 0) == Some(expected),
            "{handedness:?} clockwise={clockwise}: expected {expected:?} at the center, got {:?}",
            pixel(&frame, 0, 0)
        );
        ensure!(stats.polygons_culled == usize::from(!visible));
        ensure!((count_pixels(&frame, color.into()) > 0) == visible);
    }

    Ok(())
}

#[test]
pub fn empty_scene_is_cleared() -> anyhow::Result<()> {
    let mut runner = TestRunner::builder().size(16)?.build()?;

    let (frame, stats) = runner.render_frame()?;

    ensure!(frame.dimensions() == (16, 16));
    ensure!(count_pixels(&frame, [0; 4]) == 16 * 16);
    ensure!(stats == Default::default());
    ensure!(runner.surface.presented() == 1);
    ensure!(runner.with_canvas(|canvas| canvas.depth(-8, 7)) == Some(f32::INFINITY));

    Ok(())
}

#[test]
pub fn resize_applies_next_frame() -> anyhow::Result<()> {
    let mut runner = TestRunner::builder().size(16)?.build()?;

    runner.resize(32, 8)?;
    let (frame, _) = runner.render_frame()?;
    ensure!(frame.dimensions() == (32, 8));

    ensure!(runner.resize(0, 8).is_err());
    let (frame, _) = runner.render_frame()?;
    ensure!(frame.dimensions() == (32, 8));

    Ok(())
}

#[test]
pub fn partly_visible_triangle_near_the_eye() -> anyhow::Result<()> {
    let mut runner = TestRunner::builder().size(64)?.build()?;

    let color = Color::rgb(200, 40, 40);
    // The last vertex projects hundreds of viewport widths to the right.
    let model = ModelBuilder::new(vec![
        Vec3::new(-1.0, -1.0, -10.0),
        Vec3::new(1.0, -1.0, -10.0),
        Vec3::new(20.0, 1.0, -0.2),
    ])
    .with_polygon(Polygon::new([0, 1, 2], color))
    .build()?;
    runner
        .scene
        .add_instance(Instance::new(model.into(), Transformation::IDENTITY));
    runner.set_camera_data(Camera {
        projection: CameraProjection::Perspective {
            vfov: 90.0,
            near: 0.1,
            far: 100.0,
        },
        view: Mat4::IDENTITY,
    });

    let (frame, stats) = runner.render_frame()?;

    ensure!(stats.vertices_dropped == 0);
    ensure!(stats.polygons_rasterized == 1);
    ensure!(pixel(&frame, 0, -4) == Some(color.into()));
    ensure!(pixel(&frame, 18, -3) == Some(color.into()));
    ensure!(pixel(&frame, 0, 0) == Some([0; 4]));

    Ok(())
}
