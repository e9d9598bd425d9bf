//! 验证码图像预处理
//!
//! ## 处理流水线
//!
//! 1. 解码彩色图片（失败返回 None）
//! 2. 双轴 3 倍放大（Catmull-Rom 三次插值，低分辨率验证码放大后字形更清晰）
//! 3. 按墨色区间 `[target - tolerance, target + tolerance]` 生成二值掩码，
//!    三个通道都落在区间内的像素才被选中（把验证码特有的墨色从噪声背景里抠出来）
//! 4. 2×2 结构元闭运算，填补笔画中的小断口
//! 5. 反色（OCR 引擎要的是白底黑字）
//!
//! 整个函数不抛出任何错误：内部任何失败都折叠为 None，由调用方换一张图重试。
//! 同一份输入字节 + 同一组参数，输出掩码逐字节一致。

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};

/// 放大倍数
const SCALE_FACTOR: u32 = 3;

/// 验证码图像预处理器
#[derive(Debug, Clone, Copy)]
pub struct CaptchaPreprocessor {
    target_color: u8,
    tolerance: u8,
}

impl Default for CaptchaPreprocessor {
    fn default() -> Self {
        Self {
            target_color: 102,
            tolerance: 25,
        }
    }
}

impl CaptchaPreprocessor {
    pub fn new(target_color: u8, tolerance: u8) -> Self {
        Self {
            target_color,
            tolerance,
        }
    }

    /// 把原始图片字节变成适合 OCR 的二值掩码
    pub fn preprocess(&self, image_bytes: &[u8]) -> Option<GrayImage> {
        let decoded = image::load_from_memory(image_bytes).ok()?;
        let rgb: RgbImage = decoded.to_rgb8();

        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let scaled = imageops::resize(
            &rgb,
            width * SCALE_FACTOR,
            height * SCALE_FACTOR,
            FilterType::CatmullRom,
        );

        let lower = self.target_color.saturating_sub(self.tolerance);
        let upper = self.target_color.saturating_add(self.tolerance);

        // 区间两端都是闭区间，三个通道必须同时命中
        let mut mask = GrayImage::new(scaled.width(), scaled.height());
        for (x, y, pixel) in scaled.enumerate_pixels() {
            let selected = pixel.0.iter().all(|&c| c >= lower && c <= upper);
            mask.put_pixel(x, y, Luma([if selected { 255 } else { 0 }]));
        }

        let mut closed = erode_2x2(&dilate_2x2(&mask));

        // 反色：选中的墨迹变成黑字，背景变成白底
        for pixel in closed.pixels_mut() {
            pixel.0[0] = 255 - pixel.0[0];
        }

        Some(closed)
    }
}

/// 2×2 结构元膨胀
fn dilate_2x2(src: &GrayImage) -> GrayImage {
    morph_2x2(src, |a, b| a.max(b))
}

/// 2×2 结构元腐蚀
fn erode_2x2(src: &GrayImage) -> GrayImage {
    morph_2x2(src, |a, b| a.min(b))
}

/// 对每个像素取其 2×2 邻域（右、下方向，边界截断）上的极值
fn morph_2x2(src: &GrayImage, fold: fn(u8, u8) -> u8) -> GrayImage {
    let (width, height) = src.dimensions();
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut value = src.get_pixel(x, y).0[0];
            for (dx, dy) in [(1, 0), (0, 1), (1, 1)] {
                let nx = (x + dx).min(width - 1);
                let ny = (y + dy).min(height - 1);
                value = fold(value, src.get_pixel(nx, ny).0[0]);
            }
            out.put_pixel(x, y, Luma([value]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    /// 生成一张内存 PNG：背景纯白，中间一块目标墨色
    fn sample_captcha_png() -> Vec<u8> {
        let mut img = RgbImage::from_pixel(20, 10, Rgb([255, 255, 255]));
        for y in 3..7 {
            for x in 5..15 {
                img.put_pixel(x, y, Rgb([102, 102, 102]));
            }
        }
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("内存 PNG 编码不应失败");
        bytes
    }

    #[test]
    fn test_preprocess_rejects_garbage_bytes() {
        let pre = CaptchaPreprocessor::default();
        assert!(pre.preprocess(b"definitely not an image").is_none());
        assert!(pre.preprocess(&[]).is_none());
    }

    #[test]
    fn test_preprocess_scales_three_times() {
        let pre = CaptchaPreprocessor::default();
        let mask = pre.preprocess(&sample_captcha_png()).expect("应成功预处理");
        assert_eq!(mask.dimensions(), (60, 30));
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let bytes = sample_captcha_png();
        let pre = CaptchaPreprocessor::new(102, 25);
        let first = pre.preprocess(&bytes).expect("第一次预处理应成功");
        let second = pre.preprocess(&bytes).expect("第二次预处理应成功");
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_ink_becomes_dark_on_light_background() {
        let pre = CaptchaPreprocessor::default();
        let mask = pre.preprocess(&sample_captcha_png()).expect("应成功预处理");
        // 墨色块中心（放大 3 倍后）应是黑字，角落应是白底
        assert_eq!(mask.get_pixel(30, 15).0[0], 0);
        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_out_of_band_color_is_background() {
        // 容差 25 时，墨色 180 不在 [77, 127] 区间内，整张图应全白
        let mut img = RgbImage::from_pixel(8, 8, Rgb([180, 180, 180]));
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("内存 PNG 编码不应失败");

        let pre = CaptchaPreprocessor::default();
        let mask = pre.preprocess(&bytes).expect("应成功预处理");
        assert!(mask.pixels().all(|p| p.0[0] == 255));
    }
}
