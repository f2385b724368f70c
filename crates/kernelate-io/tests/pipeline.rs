use kernelate_image::Image;
use kernelate_imgproc::{convolve, kernels, BorderPolicy, ConvolveOptions};
use kernelate_io::{
    read_image_any_rgba8, read_kernel_json, write_image_png_rgba8, write_kernel_json, IoError,
};

#[test]
fn convolve_png_with_kernel_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let input_path = tmp_dir.path().join("input.png");
    let kernel_path = tmp_dir.path().join("kernel.json");
    let output_path = tmp_dir.path().join("output.png");

    let data = (0..6 * 5)
        .flat_map(|i| [(i * 8) as u8, 255 - (i * 8) as u8, 64, 200])
        .collect();
    let input = Image::<u8, 4>::new([6, 5].into(), data)?;
    write_image_png_rgba8(&input_path, &input)?;
    write_kernel_json(&kernel_path, &kernels::identity(3)?)?;

    let src = read_image_any_rgba8(&input_path)?;
    let kernel = read_kernel_json(&kernel_path)?;
    let dst = convolve(
        &src,
        &kernel,
        &ConvolveOptions::new().with_border(BorderPolicy::CopyThrough),
    )?;
    write_image_png_rgba8(&output_path, &dst)?;

    let output = read_image_any_rgba8(&output_path)?;
    assert_eq!(output.size(), input.size());
    for y in 0..5 {
        for x in 0..6 {
            let inp = input.pixel(x, y).unwrap();
            let out = output.pixel(x, y).unwrap();
            if x == 0 || y == 0 || x == 5 || y == 4 {
                assert_eq!(out, inp);
            } else {
                let expected: Vec<u8> = inp[..3]
                    .iter()
                    .map(|&v| (v as f64).sqrt().floor() as u8)
                    .chain([255])
                    .collect();
                assert_eq!(out, &expected[..]);
            }
        }
    }
    Ok(())
}

#[test]
fn bad_kernel_fails_before_processing() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let kernel_path = tmp_dir.path().join("even.json");
    std::fs::write(&kernel_path, r#"{"K": [[1, 2], [3, 4]], "MaxVal": 10}"#)?;

    let res = read_kernel_json(&kernel_path);
    match res {
        Err(IoError::KernelDecodeError(e)) => {
            assert!(e.to_string().contains("invalid kernel shape"))
        }
        other => panic!("expected a decode error, got {other:?}"),
    }
    Ok(())
}
