use std::path::PathBuf;

use super::*;
use crate::foundation::core::FrameIndex;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_namer").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn address() -> FrameAddress {
    FrameAddress {
        index: FrameIndex(21578),
        label: "00:11:59.985".to_string(),
    }
}

#[test]
fn file_name_layout() {
    assert_eq!(
        artifact_file_name("tape", &address(), Mode::Original, None),
        "tape_F21578_original_00:11:59.985.png"
    );
    assert_eq!(
        artifact_file_name("tape", &address(), Mode::DeinterlaceOnly, Some(3)),
        "tape_F21578_deinterlace-only_00:11:59.985_3.png"
    );
}

#[test]
fn next_free_path_picks_first_gap_free_suffix() {
    let dir = scratch("next_free");
    assert_eq!(next_free_path(&dir, "x"), (dir.join("x.png"), None));

    std::fs::write(dir.join("x.png"), b"").unwrap();
    for n in 0..5 {
        std::fs::write(dir.join(format!("x_{n}.png")), b"").unwrap();
    }
    assert_eq!(next_free_path(&dir, "x"), (dir.join("x_5.png"), Some(5)));
}

#[test]
fn write_never_overwrites_and_leaves_no_temp_files() {
    let dir = scratch("write");
    let frame = FrameBuffer::filled(4, 2, [10, 20, 30, 255]);

    let a = write_png_artifact(&dir, "tape", &address(), Mode::Single, &frame).unwrap();
    let b = write_png_artifact(&dir, "tape", &address(), Mode::Single, &frame).unwrap();
    let c = write_png_artifact(&dir, "tape", &address(), Mode::Single, &frame).unwrap();

    assert_eq!(a.disambiguator, None);
    assert_eq!(b.disambiguator, Some(0));
    assert_eq!(c.disambiguator, Some(1));
    assert!(
        c.path
            .to_string_lossy()
            .ends_with("tape_F21578_single_00:11:59.985_1.png")
    );
    assert_eq!(a.mode_suffix, "single");

    let decoded = image::open(&a.path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.get_pixel(3, 1).0, [10, 20, 30, 255]);

    let leftovers: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn concurrent_writers_get_distinct_names() {
    let dir = scratch("concurrent");
    let frame = FrameBuffer::filled(2, 2, [0, 0, 0, 255]);

    let paths: Vec<PathBuf> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    write_png_artifact(&dir, "tape", &address(), Mode::Composite, &frame)
                        .unwrap()
                        .path
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let unique: std::collections::BTreeSet<_> = paths.iter().collect();
    assert_eq!(unique.len(), 8);
    let (_, next) = next_free_path(&dir, &artifact_stem("tape", &address(), Mode::Composite));
    assert_eq!(next, Some(7));
}
