use crate::model::Color;

/// The in-memory paint target: a tightly packed RGBA8 buffer sized to the
/// on-screen canvas. All painting and snapshotting goes through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[0] = fill.r;
            chunk[1] = fill.g;
            chunk[2] = fill.b;
            chunk[3] = fill.a;
        }
        Self { width, height, pixels }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self { width, height, pixels }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = ((y * self.width + x) * 4) as usize;
        Color {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    /// Writes one pixel, silently dropping positions outside the buffer.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[idx] = color.r;
        self.pixels[idx + 1] = color.g;
        self.pixels[idx + 2] = color.b;
        self.pixels[idx + 3] = color.a;
    }

    /// Floods the whole buffer with one colour.
    pub fn fill(&mut self, color: Color) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = color.r;
            chunk[1] = color.g;
            chunk[2] = color.b;
            chunk[3] = color.a;
        }
    }

    /// Overwrites this surface with the contents of `other`, reusing the
    /// existing allocation where possible.
    pub fn copy_from(&mut self, other: &Surface) {
        self.width = other.width;
        self.height = other.height;
        self.pixels.clear();
        self.pixels.extend_from_slice(&other.pixels);
    }

    /// Source-over blends an equally sized RGBA image onto this surface.
    /// Used when a restored drawing is painted back over the background fill.
    pub fn blend_over(&mut self, top: &[u8]) {
        assert_eq!(top.len(), self.pixels.len());
        for (dst, src) in self.pixels.chunks_exact_mut(4).zip(top.chunks_exact(4)) {
            let blended = blend_pixel(
                Color { r: dst[0], g: dst[1], b: dst[2], a: dst[3] },
                Color { r: src[0], g: src[1], b: src[2], a: src[3] },
            );
            dst[0] = blended.r;
            dst[1] = blended.g;
            dst[2] = blended.b;
            dst[3] = blended.a;
        }
    }
}

fn blend_pixel(bottom: Color, top: Color) -> Color {
    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Color::rgba(0, 0, 0, 0);
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}
