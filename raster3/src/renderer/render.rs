use crate::{
    canvas::Canvas,
    fragment::{FragmentShader, Lighting},
    raster::{draw_line, fill_polygon_flat, fill_polygon_gradient, DepthTest, Fragment},
    renderer::{ready::ready, RendererData},
    statistics::FrameStatistics,
    surface::Surface,
    types::{DrawMode, RenderOptions, Scene},
    vertex::{PolygonView, ScreenPrimitive, VertexOutput, VertexShader},
    RenderError, Renderer,
};

/// Vertex pairs forming the boundary of a triangle.
const EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];

/// Fragments collected over one frame.
#[derive(Default)]
struct FrameFragments {
    geometry: Vec<Fragment>,
    /// Written after all geometry so they stay on top.
    outlines: Vec<Fragment>,
    /// View space polygon data for the whole frame, indexed by [`Fragment::polygon`].
    polygons: Vec<PolygonView>,
}

pub fn render(renderer: &Renderer, scene: &Scene, surface: &mut dyn Surface) -> Result<FrameStatistics, RenderError> {
    profiling::scope!("Renderer::render");

    // Held for the whole frame so frames run to completion one at a time.
    let mut data = renderer.data.lock();
    ready(&renderer.instructions, &mut data);

    let RendererData {
        canvas,
        camera,
        options,
    } = &mut *data;

    canvas.clear();

    let mut stats = FrameStatistics::default();
    let mut frame = FrameFragments::default();
    let vertex_shader = VertexShader::new(camera, canvas.width(), canvas.height(), options.backface_culling);

    {
        profiling::scope!("Geometry");
        for instance in &scene.instances {
            stats.instances += 1;
            let output = vertex_shader.shade(instance, &mut stats);
            rasterize(canvas, options, &output, &mut frame, &mut stats);
            frame.polygons.extend(output.polygons);
        }
    }

    stats.fragments = frame.geometry.iter().chain(&frame.outlines).map(Fragment::len).sum();

    {
        profiling::scope!("Shading");
        let shaded = options.draw_mode == DrawMode::Shaded;
        let lighting = if shaded {
            Lighting::new(scene, camera.view())
        } else {
            Lighting::ambient_only(scene.ambient)
        };
        let shader = FragmentShader::new(&lighting, &frame.polygons, shaded);
        shader.shade(canvas, &frame.geometry);
        shader.shade(canvas, &frame.outlines);
    }

    canvas.present(surface)?;

    log::debug!(
        "Rendered {} instances: {} polygons rasterized, {} culled, {} degenerate, {} lines, {} fragments",
        stats.instances,
        stats.polygons_rasterized,
        stats.polygons_culled,
        stats.polygons_degenerate,
        stats.lines_rasterized,
        stats.fragments
    );

    Ok(stats)
}

/// Turns one instance's primitives into fragments according to the draw mode.
fn rasterize(
    canvas: &mut Canvas,
    options: &RenderOptions,
    output: &VertexOutput,
    frame: &mut FrameFragments,
    stats: &mut FrameStatistics,
) {
    profiling::scope!("rasterize");

    // Polygon indices in the output are local to the instance.
    let polygon_base = frame.polygons.len();

    for primitive in &output.primitives {
        match *primitive {
            ScreenPrimitive::Triangle {
                vertices,
                colors,
                polygon,
            } => {
                stats.polygons_rasterized += 1;
                let screen = output.gather(vertices);

                let fragment = match options.draw_mode {
                    DrawMode::Wireframe => {
                        for [a, b] in EDGES {
                            frame.geometry.push(draw_line(
                                canvas,
                                [screen[a], screen[b]],
                                [colors[a], colors[b]],
                                DepthTest::Enabled,
                            ));
                        }
                        continue;
                    }
                    DrawMode::Filled | DrawMode::Shaded => {
                        fill_polygon_flat(canvas, screen, colors[0], DepthTest::Enabled)
                    }
                    DrawMode::Gradient => fill_polygon_gradient(canvas, screen, colors, DepthTest::Enabled),
                };
                frame.geometry.push(fragment.with_polygon(polygon_base + polygon));

                if options.outlines {
                    for [a, b] in EDGES {
                        frame.outlines.push(draw_line(
                            canvas,
                            [screen[a], screen[b]],
                            [options.outline_color; 2],
                            DepthTest::Disabled,
                        ));
                    }
                }
            }
            ScreenPrimitive::Segment { vertices, colors } => {
                stats.lines_rasterized += 1;
                frame
                    .geometry
                    .push(draw_line(canvas, output.gather(vertices), colors, DepthTest::Enabled));
            }
        }
    }
}
