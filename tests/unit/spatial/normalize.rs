//! Tests for trimming, resampling and aspect ratio bucketing

#[cfg(test)]
mod tests {
    use gaze::GazeError;
    use gaze::spatial::PixelBuffer;
    use gaze::spatial::normalize::{
        InterpolationPolicy, aspect_bucket, aspect_ratio, resample, rounded_aspect_ratio, trim,
    };
    use image::Rgba;
    use image::imageops::FilterType;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    // Tests trailing rows and columns are removed down to a multiple of n
    // Verified by trimming from the leading edge instead
    #[test]
    fn test_trim_removes_remainder() {
        let buffer = gradient(103, 57);
        let trimmed = trim(&buffer, 10).unwrap();

        assert_eq!(trimmed.dimensions(), (100, 50));
        assert_eq!(trimmed.get_pixel(0, 0), buffer.get_pixel(0, 0));
        assert_eq!(trimmed.get_pixel(99, 49), buffer.get_pixel(99, 49));
    }

    // Tests divisible buffers come back unchanged
    // Verified by always trimming one extra column
    #[test]
    fn test_trim_divisible_is_identity() {
        let buffer = gradient(40, 20);
        assert_eq!(trim(&buffer, 4).unwrap(), buffer);
    }

    // Tests trimming twice equals trimming once
    // Verified by subtracting n on every call
    #[test]
    fn test_trim_idempotent() {
        let buffer = gradient(77, 31);
        for n in 1..=9 {
            let once = trim(&buffer, n).unwrap();
            let twice = trim(&once, n).unwrap();
            assert_eq!(once, twice, "trim not idempotent for n = {n}");
        }
    }

    // Tests a divisor of zero is rejected
    // Verified by removing the zero guard
    #[test]
    fn test_trim_zero_divisor() {
        let result = trim(&gradient(10, 10), 0);
        assert!(matches!(result, Err(GazeError::InvalidDimensions { .. })));
    }

    // Tests a dimension smaller than n trims to nothing
    // Verified by clamping trimmed size to one
    #[test]
    fn test_trim_smaller_than_divisor() {
        let trimmed = trim(&gradient(3, 12), 5).unwrap();
        assert_eq!(trimmed.dimensions(), (0, 10));
    }

    // Tests resampling reaches the exact requested size with every policy
    // Verified by swapping width and height in the resize call
    #[test]
    fn test_resample_exact_dimensions() {
        let buffer = gradient(64, 48);
        for policy in [
            InterpolationPolicy::Nearest,
            InterpolationPolicy::Triangle,
            InterpolationPolicy::CatmullRom,
            InterpolationPolicy::Gaussian,
            InterpolationPolicy::Lanczos3,
        ] {
            let resized = resample(&buffer, 13, 29, policy).unwrap();
            assert_eq!(resized.dimensions(), (13, 29), "{policy:?}");
        }
    }

    // Tests a solid buffer stays solid after nearest-neighbour scaling
    // Verified by sampling outside the source buffer
    #[test]
    fn test_resample_solid_color_preserved() {
        let buffer = PixelBuffer::from_pixel(10, 10, Rgba([200, 10, 30, 255]));
        let resized = resample(&buffer, 37, 5, InterpolationPolicy::Nearest).unwrap();
        assert!(resized.pixels().all(|p| *p == Rgba([200, 10, 30, 255])));
    }

    // Tests zero target dimensions are rejected
    // Verified by removing the dimension guard
    #[test]
    fn test_resample_zero_target() {
        let buffer = gradient(8, 8);
        assert!(resample(&buffer, 0, 8, InterpolationPolicy::Nearest).is_err());
        assert!(resample(&buffer, 8, 0, InterpolationPolicy::Nearest).is_err());
    }

    // Tests an empty source cannot be scaled up
    // Verified by removing the source guard
    #[test]
    fn test_resample_empty_source() {
        let buffer = PixelBuffer::new(0, 4);
        let result = resample(&buffer, 4, 4, InterpolationPolicy::Nearest);
        assert!(matches!(result, Err(GazeError::InvalidDimensions { .. })));
    }

    // Tests aspect ratios are bucketed to one decimal place
    // Verified by bucketing to two decimals
    #[test]
    fn test_aspect_bucket_rounding() {
        assert_eq!(aspect_bucket(100, 50), 20);
        assert_eq!(aspect_bucket(104, 100), 10);
        assert_eq!(aspect_bucket(4, 3), 13);
        assert_eq!(aspect_bucket(16, 9), 18);
        assert_eq!(aspect_bucket(10, 0), 0);
        assert!((rounded_aspect_ratio(4, 3) - 1.3).abs() < 1e-9);
        assert!((aspect_ratio(3, 2) - 1.5).abs() < 1e-9);
    }

    // Tests policies map onto the codec's filters
    // Verified by mapping nearest to triangle
    #[test]
    fn test_policy_filter_mapping() {
        assert_eq!(InterpolationPolicy::default(), InterpolationPolicy::Nearest);
        assert_eq!(InterpolationPolicy::Nearest.filter(), FilterType::Nearest);
        assert_eq!(InterpolationPolicy::Lanczos3.filter(), FilterType::Lanczos3);
        assert_eq!(InterpolationPolicy::CatmullRom.filter(), FilterType::CatmullRom);
    }
}
