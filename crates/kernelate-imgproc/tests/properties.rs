use kernelate_image::{Image, ImageSize};
use kernelate_imgproc::{
    convolve, kernels, BorderPolicy, ConvolveError, ConvolveOptions, ExecutionStrategy, Kernel,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn checker_image(size: ImageSize) -> Image<u8, 4> {
    let mut data = Vec::with_capacity(size.area() * 4);
    for y in 0..size.height {
        for x in 0..size.width {
            let v = if (x + y) % 2 == 0 { 225 } else { 16 };
            data.extend_from_slice(&[v, 255 - v, 100, 128]);
        }
    }
    Image::new(size, data).unwrap()
}

#[test]
fn output_keeps_input_size() -> Result<(), ConvolveError> {
    init_logger();

    for side in [1, 3, 5, 7] {
        let kernel = kernels::box_blur(side).unwrap();
        for size in [[7, 7], [16, 9], [3, 12]] {
            let src = checker_image(size.into());
            let dst = convolve(&src, &kernel, &ConvolveOptions::new())?;
            assert_eq!(dst.size(), src.size());
        }
    }
    Ok(())
}

#[test]
fn border_is_background_not_source() -> Result<(), ConvolveError> {
    init_logger();

    let size = ImageSize {
        width: 9,
        height: 8,
    };
    let src = checker_image(size);
    let kernel = kernels::box_blur(5).unwrap();
    let radius = kernel.radius();

    let dst = convolve(&src, &kernel, &ConvolveOptions::new())?;

    for y in 0..size.height {
        for x in 0..size.width {
            let border =
                x < radius || y < radius || x + radius >= size.width || y + radius >= size.height;
            if border {
                assert_eq!(dst.pixel(x, y), Some(&[0u8, 0, 0, 0][..]), "({x}, {y})");
            }
        }
    }
    Ok(())
}

#[test]
fn box_blur_checkerboard() -> Result<(), ConvolveError> {
    init_logger();

    // even cells are [225, 30, 100], odd cells [16, 239, 100]
    // sqrt(225) = 15, sqrt(30) = 5, sqrt(16) = 4, sqrt(239) = 15, sqrt(100) = 10
    let src = checker_image([5, 5].into());
    let kernel = kernels::box_blur(3).unwrap();
    let dst = convolve(&src, &kernel, &ConvolveOptions::new())?;

    // even center, 5 even and 4 odd neighbours
    // red: (5 * 15 + 4 * 4) / 9 = 10, green: (5 * 5 + 4 * 15) / 9 = 9
    assert_eq!(dst.pixel(2, 2), Some(&[10u8, 9, 10, 255][..]));
    // odd center, 4 even and 5 odd neighbours
    // red: (4 * 15 + 5 * 4) / 9 = 8, green: (4 * 5 + 5 * 15) / 9 = 10
    assert_eq!(dst.pixel(1, 2), Some(&[8u8, 10, 10, 255][..]));
    Ok(())
}

#[test]
fn zero_sum_kernel_is_black() -> Result<(), ConvolveError> {
    init_logger();

    let size = ImageSize {
        width: 6,
        height: 6,
    };
    let src = checker_image(size);
    let kernel = Kernel::new(vec![vec![0, 1, 0], vec![1, -4, 1], vec![0, 1, 0]]).unwrap();
    assert!(kernel.is_degenerate());

    let options = ConvolveOptions::new().with_border(BorderPolicy::CopyThrough);
    let dst = convolve(&src, &kernel, &options)?;

    for y in 1..size.height - 1 {
        for x in 1..size.width - 1 {
            assert_eq!(dst.pixel(x, y), Some(&[0u8, 0, 0, 255][..]));
        }
    }
    assert_eq!(dst.pixel(0, 0), src.pixel(0, 0));
    Ok(())
}

#[test]
fn max_val_override() -> Result<(), ConvolveError> {
    init_logger();

    let src = Image::<u8, 4>::from_size_pixel([3, 3].into(), [64, 64, 64, 255])?;
    let kernel = Kernel::with_max_val(vec![vec![1; 3]; 3], 18).unwrap();

    // 9 * sqrt(64) / 18 = 4
    let dst = convolve(&src, &kernel, &ConvolveOptions::new())?;
    assert_eq!(dst.pixel(1, 1), Some(&[4u8, 4, 4, 255][..]));
    Ok(())
}

#[test]
fn strategies_are_identical() -> Result<(), ConvolveError> {
    init_logger();

    let src = checker_image([40, 23].into());
    let kernel = kernels::sharpen().unwrap();

    let reference = convolve(
        &src,
        &kernel,
        &ConvolveOptions::new().with_strategy(ExecutionStrategy::Serial),
    )?;
    for threads in 1..=4 {
        let options = ConvolveOptions::new().with_strategy(ExecutionStrategy::Fixed(threads));
        assert_eq!(convolve(&src, &kernel, &options)?, reference);
    }
    Ok(())
}
