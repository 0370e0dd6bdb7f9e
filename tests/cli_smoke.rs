use std::path::PathBuf;

use paceframe::{FontSet, OverlayStyle};

#[test]
fn cli_preview_writes_png() {
    if FontSet::load(&OverlayStyle::default()).is_err() {
        eprintln!("skipping: no usable system font");
        return;
    }

    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let records_path = dir.join("records.json");
    let out_path = dir.join("preview.png");
    let _ = std::fs::remove_file(&out_path);

    let json = r#"[
        {"heart_rate": 142, "speed": 2.8, "cadence": 86, "distance": 1230.0, "power": 210,
         "position_lat": 477218588, "position_long": -894784853},
        {"heart_rate": 144, "speed": 3.1, "cadence": 88, "distance": 1233.0, "power": 215,
         "position_lat": 477218688, "position_long": -894784753},
        {"heart_rate": 145, "speed": 3.0, "distance": 1236.0}
    ]"#;
    std::fs::write(&records_path, json).unwrap();

    let exe = PathBuf::from(env!("CARGO_BIN_EXE_paceframe"));
    let status = std::process::Command::new(exe)
        .args([
            "preview",
            "--records",
            records_path.to_string_lossy().as_ref(),
            "--offset",
            "0:01",
            "--width",
            "96",
            "--height",
            "64",
            "--out",
            out_path.to_string_lossy().as_ref(),
        ])
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_path.is_file());
    // PNG magic bytes.
    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}
