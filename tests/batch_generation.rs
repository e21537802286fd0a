use std::process::Command;
use tempfile::TempDir;

const DEFAULT_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

fn run_generator(args: &[&str]) -> std::process::Output {
    let output = Command::new(env!("CARGO_BIN_EXE_pwa-icon-gen"))
        .args(args)
        .output()
        .expect("Failed to run pwa-icon-gen");

    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("pwa-icon-gen failed with status: {}", output.status);
    }

    output
}

/// Default run: 8 decodable PNGs, one progress line each, fixed summary.
#[test]
fn default_batch_generates_full_icon_set() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    let output = run_generator(&["-o", out_dir.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Generating Habit Tracker 2026 PWA Icons..."));
    assert!(stdout.contains("All icons generated successfully!"));
    assert_eq!(
        stdout.matches("✓").count(),
        8,
        "expected one progress line per icon:\n{stdout}"
    );

    for size in DEFAULT_SIZES {
        let path = out_dir.join(format!("icon-{size}x{size}.png"));
        assert!(path.exists(), "missing {}", path.display());

        let img = image::open(&path)
            .unwrap_or_else(|e| panic!("can't decode {}: {e}", path.display()))
            .to_rgba8();
        assert_eq!(img.dimensions(), (size, size));

        // Rounded corner clipped, center opaque.
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(size / 2, size / 2)[3], 255);
    }

    // Nothing beyond the 8 icons is written by default.
    let entries = std::fs::read_dir(&out_dir).unwrap().count();
    assert_eq!(entries, 8);
}

#[test]
fn custom_size_list_limits_the_batch() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    run_generator(&["-o", out_dir.to_str().unwrap(), "--sizes", "64"]);

    let img = image::open(out_dir.join("icon-64x64.png"))
        .expect("can't decode icon-64x64.png")
        .to_rgba8();
    assert_eq!(img.dimensions(), (64, 64));
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 1);
}

/// An edge length of zero is rejected at the CLI boundary instead of
/// reaching the renderer.
#[test]
fn zero_size_is_rejected_with_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    let output = Command::new(env!("CARGO_BIN_EXE_pwa-icon-gen"))
        .args(["-o", out_dir.to_str().unwrap(), "--sizes", "0"])
        .output()
        .expect("Failed to run pwa-icon-gen");

    assert!(!output.status.success(), "a zero size must not succeed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value '0'"),
        "expected a usage error, got:\n{stderr}"
    );
    assert!(!out_dir.exists(), "no output should be written");
}

#[test]
fn manifest_flag_writes_icons_fragment() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    run_generator(&[
        "-o",
        out_dir.to_str().unwrap(),
        "--manifest",
        "--sizes",
        "72,96",
    ]);

    let content = std::fs::read_to_string(out_dir.join("manifest-icons.json"))
        .expect("manifest-icons.json should exist");
    let parsed: serde_json::Value =
        serde_json::from_str(&content).expect("manifest fragment should be valid JSON");

    let icons = parsed["icons"].as_array().expect("icons array");
    assert_eq!(icons.len(), 2);
    assert_eq!(icons[0]["src"], "icons/icon-72x72.png");
    assert_eq!(icons[0]["type"], "image/png");
    assert_eq!(icons[1]["sizes"], "96x96");
}

/// A bad caption font must not abort the batch; the icon is simply written
/// without its caption and the failure is logged.
#[test]
fn unreadable_caption_font_is_non_fatal() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    let output = run_generator(&[
        "-o",
        out_dir.to_str().unwrap(),
        "--sizes",
        "192",
        "--font",
        "/nonexistent/caption-font.ttf",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Could not add text to 192x192"),
        "missing font diagnostic:\n{stdout}"
    );
    assert!(out_dir.join("icon-192x192.png").exists());
}
