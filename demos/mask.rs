use euclid::{default::Transform2D, point2, vec2, Angle};
use raskter::{build_span_index, rasterize_mask, RasterBuffer};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 384;

/// A five-pointed star centred on the origin, unit outer radius.
fn star() -> Vec<[f32; 2]> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { 1.0 } else { 0.45 };
            let a = std::f32::consts::PI * i as f32 / 5.0 - std::f32::consts::FRAC_PI_2;
            [r * a.cos(), r * a.sin()]
        })
        .collect()
}

fn outline(points: &[[f32; 2]], transform: &Transform2D<f32>) -> Vec<[f32; 2]> {
    points
        .iter()
        .map(|p| {
            let p = transform.transform_point(point2(p[0], p[1]));
            [p.x, p.y]
        })
        .collect()
}

fn write_png(path: &str, coverage: &[f32]) {
    use std::fs::File;
    use std::io::BufWriter;

    let file = File::create(path).unwrap();
    let w = &mut BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, WIDTH, HEIGHT);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();

    let pixels: Vec<u8> =
        coverage.iter().map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8).collect();
    writer.write_image_data(&pixels).unwrap();
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Rotate a little, then place in normalized buffer space keeping the
    // star's aspect on the wide buffer.
    let place = |radius: f32| {
        Transform2D::rotation(Angle::degrees(12.0))
            .then_scale(radius * HEIGHT as f32 / WIDTH as f32, radius)
            .then_translate(vec2(0.5, 0.5))
    };
    let shape = star();
    let base = outline(&shape, &place(0.3));
    let feather = outline(&shape, &place(0.42));

    let mut data = vec![0.0; (WIDTH * HEIGHT) as usize];
    let mut buffer = RasterBuffer::new(&mut data, WIDTH as i32, HEIGHT as i32).unwrap();

    let start = std::time::Instant::now();
    rasterize_mask(&base, &feather, &mut buffer).unwrap();
    let index = build_span_index(&base, WIDTH as i32, HEIGHT as i32).unwrap();
    let elapsed = start.elapsed();

    log::info!(
        "mask {}x{}: {} base spans, took {}ms",
        WIDTH,
        HEIGHT,
        index.span_count(),
        elapsed.as_secs_f32() * 1000.
    );

    write_png("mask.png", &data);
}
